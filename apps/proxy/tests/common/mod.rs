//! Test infrastructure for TMDB proxy integration tests.
//!
//! Provides a `TestApp` wrapper around `axum_test::TestServer` backed by a
//! scripted upstream that records every request it receives.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tmdb_proxy::config::{Config, DefaultsConfig, ServerConfig, TmdbConfig};
use tmdb_proxy::services::{Upstream, UpstreamError, UpstreamRequest};
use tmdb_proxy::{api, AppState};

/// Upstream stand-in returning queued responses in order.
///
/// Once the queue is drained every further fetch fails with a transport error,
/// so an unexpected extra call shows up as a 500 in the test.
#[derive(Default)]
pub struct FakeUpstream {
    responses: Mutex<VecDeque<Result<Value, UpstreamError>>>,
    requests: Mutex<Vec<UpstreamRequest>>,
}

impl FakeUpstream {
    /// Queue a successful JSON response.
    pub fn respond(&self, payload: Value) {
        self.responses.lock().unwrap().push_back(Ok(payload));
    }

    /// Queue an upstream failure.
    pub fn fail(&self, error: UpstreamError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The only request seen; panics if there were zero or several.
    pub fn single_request(&self) -> UpstreamRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream call");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::transport("no scripted upstream response")))
    }
}

/// Test application wrapper around axum_test::TestServer.
pub struct TestApp {
    server: TestServer,
    upstream: Arc<FakeUpstream>,
}

impl TestApp {
    /// Create a new test application with default configuration.
    pub fn new() -> Self {
        Self::with_defaults(DefaultsConfig::default())
    }

    /// Create a test application with custom request defaults.
    pub fn with_defaults(defaults: DefaultsConfig) -> Self {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: Vec::new(),
            },
            tmdb: TmdbConfig {
                api_key: Some("test-token".to_string()),
                ..Default::default()
            },
            defaults,
        };

        let upstream = Arc::new(FakeUpstream::default());
        let state = AppState::new(config, upstream.clone());

        // Same router as main.rs, minus the CORS and trace layers
        let server = TestServer::new(api::router(state)).expect("Failed to create test server");

        Self { server, upstream }
    }

    /// Get a reference to the test server.
    pub fn server(&self) -> &TestServer {
        &self.server
    }

    /// Get a reference to the scripted upstream.
    pub fn upstream(&self) -> &FakeUpstream {
        &self.upstream
    }
}
