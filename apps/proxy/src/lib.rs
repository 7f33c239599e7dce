//! TMDB Proxy Library
//!
//! Browser-facing proxy for the TMDB API: injects the bearer credential and
//! request defaults, and filters adult or private content out of responses.
//! This library exposes modules for use in integration tests.

use axum::response::Json;
use serde::Serialize;
use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod locale;
pub mod services;
pub mod visibility;

use config::Config;
use services::Upstream;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    pub fn new(config: Config, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
        }
    }

    /// Get a reference to the upstream client.
    pub fn upstream(&self) -> &dyn Upstream {
        self.upstream.as_ref()
    }
}

#[derive(Serialize)]
pub struct ApiResponse {
    pub message: String,
    pub version: String,
}

pub async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "TMDB Proxy is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
