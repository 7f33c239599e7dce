//! Application services for the TMDB proxy.

pub mod tmdb;
pub mod upstream;

pub use tmdb::TmdbClient;
pub use upstream::{Upstream, UpstreamError, UpstreamRequest};
