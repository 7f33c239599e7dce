//! Upstream collaborator seam.
//!
//! Handlers never talk to reqwest directly: they describe the outbound call
//! with an [`UpstreamRequest`] and hand it to an [`Upstream`] implementation.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure to obtain a JSON payload from the upstream API.
///
/// Covers transport failures (`status` is `None`) and non-2xx responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct UpstreamError {
    pub status: Option<u16>,
    pub message: String,
}

impl UpstreamError {
    /// Error for a response that arrived with a non-success status.
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            message: format!("Request failed with status code {}", status),
        }
    }

    /// Error for a request that never produced a response, or whose body was unreadable.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

/// Descriptor of one outbound GET against the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Path below the API base URL, including the version prefix (e.g. `/3/movie/550`).
    pub path: String,
    /// Query parameters other than `language`, in the order they are sent.
    pub params: Vec<(String, String)>,
    /// Locale sent as the `language` parameter.
    pub language: Option<String>,
}

impl UpstreamRequest {
    /// Create a request for the given path with no parameters.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the locale.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Append a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Append a query parameter only when a value is present.
    pub fn param_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Look up the first value sent for `key`. `language` is served from the locale.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == "language" {
            return self.language.as_deref();
        }
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full query string as sent on the wire, `language` first.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.language
            .as_deref()
            .map(|language| ("language", language))
            .into_iter()
            .chain(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }
}

/// Anything that can resolve an [`UpstreamRequest`] into a JSON document.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Perform the GET and parse the body as JSON.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError>;
}
