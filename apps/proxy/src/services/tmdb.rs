//! TMDB (The Movie Database) upstream client.
//!
//! Performs authenticated GET requests against the TMDB API and returns the raw
//! JSON payload untouched. Filtering is the caller's business.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::upstream::{Upstream, UpstreamError, UpstreamRequest};
use crate::config::TmdbConfig;
use crate::error::{AppError, Result};

/// TMDB API client authenticating with a bearer token.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client with the given bearer token, base URL and timeout.
    ///
    /// Returns an error if the token is empty or if the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Internal(
                "TMDB API key cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a client from the `[tmdb]` configuration section.
    pub fn from_config(config: &TmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Internal("TMDB API key not configured".to_string()))?;

        Self::new(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create a new TMDB client wrapped in Arc for shared access.
    pub fn new_shared(config: &TmdbConfig) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::from_config(config)?))
    }

    /// Absolute URL for an upstream path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Upstream for TmdbClient {
    async fn fetch(&self, request: &UpstreamRequest) -> std::result::Result<Value, UpstreamError> {
        let url = self.url_for(&request.path);
        tracing::debug!(path = %request.path, language = ?request.language, "Fetching from TMDB");

        let response = self
            .client
            .get(&url)
            .query(&request.query_pairs())
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path = %request.path, status = %status, "TMDB returned error status");
            return Err(UpstreamError::status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            UpstreamError::transport(format!(
                "Failed to parse TMDB response from {}: {}",
                request.path, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(
            "test-key".to_string(),
            "https://api.themoviedb.org/",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_url_for_strips_trailing_slash() {
        assert_eq!(
            client().url_for("/3/movie/550"),
            "https://api.themoviedb.org/3/movie/550"
        );
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = TmdbClient::new("".to_string(), "http://localhost", Duration::from_secs(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_whitespace_api_key_rejected() {
        let result = TmdbClient::new("   ".to_string(), "http://localhost", Duration::from_secs(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let result = TmdbClient::from_config(&TmdbConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config() {
        let config = TmdbConfig {
            api_key: Some("token".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let client = TmdbClient::from_config(&config).unwrap();
        assert_eq!(client.url_for("/4/list/1"), "http://127.0.0.1:9/4/list/1");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        // Port 9 (discard) is closed on any sane test host.
        let client = TmdbClient::new(
            "token".to_string(),
            "http://127.0.0.1:9",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client
            .fetch(&UpstreamRequest::new("/3/configuration"))
            .await
            .unwrap_err();
        assert_eq!(err.status, None);
        assert!(!err.message.is_empty());
    }
}
