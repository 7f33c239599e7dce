//! HTTP surface of the proxy.
//!
//! Every route in [`endpoints::ENDPOINTS`] is served by the same handler; any
//! other path or method is refused with 403.

pub mod endpoints;
pub mod params;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::locale::fetch_with_locale_fallback;
use crate::visibility;
use crate::AppState;
use endpoints::{Endpoint, ENDPOINTS};
use params::Params;

/// Query string as extracted; a rejection is turned into a JSON 400 by the handler.
type RawQuery = std::result::Result<Query<HashMap<String, String>>, QueryRejection>;

/// Build the application router: `/health`, the endpoint table, and the default-deny fallback.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new().route(
        "/health",
        get(crate::health_check).fallback(endpoint_not_allowed),
    );

    for endpoint in ENDPOINTS {
        router = router.route(
            endpoint.route,
            get(
                move |State(state): State<AppState>, query: RawQuery| proxy(endpoint, state, query),
            )
            .fallback(endpoint_not_allowed),
        );
    }

    router.fallback(endpoint_not_allowed).with_state(state)
}

/// GET handler shared by every table row.
///
/// Builds the upstream request, fetches it, and runs the row's visibility gate.
async fn proxy(
    endpoint: &'static Endpoint,
    state: AppState,
    query: RawQuery,
) -> Result<Json<Value>> {
    let Query(query) = query?;
    let params = Params::new(&query);
    let defaults = &state.config.defaults;
    let request = endpoint.request(&params, defaults)?;
    let include_adult = params.include_adult();

    tracing::debug!(
        route = endpoint.route,
        path = %request.path,
        include_adult,
        "Proxying request"
    );

    let upstream = state.upstream();
    let payload = if endpoint.locale_fallback {
        fetch_with_locale_fallback(upstream, &request, &defaults.language).await?
    } else {
        upstream.fetch(&request).await?
    };

    let Some(kind) = endpoint.kind else {
        return Ok(Json(payload));
    };

    let outcome = visibility::evaluate(kind, payload, include_adult);
    tracing::debug!(
        route = endpoint.route,
        kind = kind.as_str(),
        denied = outcome.is_denied(),
        "Visibility filter applied"
    );

    outcome
        .into_result()
        .map(Json)
        .map_err(AppError::AccessDenied)
}

/// Fallback for unknown paths and non-GET methods.
async fn endpoint_not_allowed() -> AppError {
    AppError::EndpointNotAllowed
}
