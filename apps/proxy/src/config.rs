//! Configuration module for the TMDB proxy.
//!
//! Loads configuration from `config.toml` with environment variable overrides.
//! The resulting [`Config`] is immutable and shared across handlers behind an `Arc`.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Environment variable read when `tmdb.api_key` is not set by any other source.
const LEGACY_API_KEY_VAR: &str = "TMDB_API_KEY";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// TMDB API configuration
#[derive(Clone, Deserialize)]
pub struct TmdbConfig {
    /// Bearer token (TMDB "API Read Access Token").
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Custom Debug implementation to avoid exposing api_key
impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Defaults applied to outbound requests when the caller leaves them out.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            region: default_region(),
        }
    }
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` in current directory (optional)
    /// 3. Environment variables with `TMDB_PROXY_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `TMDB_PROXY_SERVER__PORT=9000` sets `server.port`
    /// - `TMDB_PROXY_DEFAULTS__LANGUAGE=fr-FR` sets `defaults.language`
    ///
    /// `TMDB_API_KEY` is honoured as a fallback for `tmdb.api_key`.
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("tmdb.base_url", "https://api.themoviedb.org")?
            .set_default("tmdb.timeout_secs", 30)?
            .set_default("defaults.language", "en-US")?
            .set_default("defaults.region", "US")?
            .add_source(File::with_name(config_path).required(false))
            // TMDB_PROXY_SERVER__PORT=9000 -> server.port = 9000
            .add_source(
                Environment::with_prefix("TMDB_PROXY")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = config.try_deserialize()?;

        if config.tmdb.api_key.is_none() {
            config.tmdb.api_key = std::env::var(LEGACY_API_KEY_VAR).ok();
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), AppError> {
        if self.tmdb.api_key.is_none() {
            tracing::warn!("TMDB API key not configured - upstream requests will be rejected");
        }

        if self.defaults.language.trim().is_empty() {
            return Err(AppError::Internal(
                "defaults.language cannot be empty".to_string(),
            ));
        }

        if self.defaults.region.trim().is_empty() {
            return Err(AppError::Internal(
                "defaults.region cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::{IpAddr, Ipv4Addr, SocketAddr};
        let ip: IpAddr = self.server.host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid host '{}', using 0.0.0.0", self.server.host);
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });
        SocketAddr::new(ip, self.server.port)
    }
}
