//! Locale fallback for genre listings.
//!
//! TMDB returns `name: null` for every genre when a locale has no translations.
//! In that case the listing is fetched once more in the default locale.

use serde_json::Value;

use crate::services::{Upstream, UpstreamError, UpstreamRequest};

/// Whether a genre listing fetched in `requested` should be re-fetched in `default`.
///
/// True only when the locales differ and the listing is non-empty with every
/// `name` null or missing.
pub fn needs_locale_fallback(payload: &Value, requested: &str, default: &str) -> bool {
    if requested == default {
        return false;
    }
    match payload.get("genres").and_then(Value::as_array) {
        Some(genres) if !genres.is_empty() => genres
            .iter()
            .all(|genre| genre.get("name").map_or(true, Value::is_null)),
        _ => false,
    }
}

/// Fetch `request`, retrying at most once in `default_locale` when the names
/// came back untranslated. Errors are returned as-is, never retried.
pub async fn fetch_with_locale_fallback(
    upstream: &dyn Upstream,
    request: &UpstreamRequest,
    default_locale: &str,
) -> Result<Value, UpstreamError> {
    let payload = upstream.fetch(request).await?;

    let requested = request.language.as_deref().unwrap_or(default_locale);
    if !needs_locale_fallback(&payload, requested, default_locale) {
        return Ok(payload);
    }

    tracing::debug!(
        path = %request.path,
        requested = %requested,
        fallback = %default_locale,
        "Genre names missing, retrying with default locale"
    );

    let retry = request.clone().language(default_locale);
    upstream.fetch(&retry).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct Scripted {
        responses: Mutex<VecDeque<Result<Value, UpstreamError>>>,
        seen: Mutex<Vec<Option<String>>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Value, UpstreamError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn languages(&self) -> Vec<Option<String>> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Upstream for Scripted {
        async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
            self.seen.lock().unwrap().push(request.language.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(UpstreamError::transport("no scripted response")))
        }
    }

    fn genres_request(language: &str) -> UpstreamRequest {
        UpstreamRequest::new("/3/genre/movie/list").language(language)
    }

    #[test]
    fn test_needs_fallback_all_null() {
        let payload = json!({"genres": [{"id": 1, "name": null}, {"id": 2}]});
        assert!(needs_locale_fallback(&payload, "xx-XX", "en-US"));
    }

    #[test]
    fn test_no_fallback_for_default_locale() {
        let payload = json!({"genres": [{"id": 1, "name": null}]});
        assert!(!needs_locale_fallback(&payload, "en-US", "en-US"));
    }

    #[test]
    fn test_no_fallback_when_some_names_present() {
        let payload = json!({"genres": [{"id": 1, "name": null}, {"id": 2, "name": "Drame"}]});
        assert!(!needs_locale_fallback(&payload, "fr-FR", "en-US"));
    }

    #[test]
    fn test_no_fallback_for_empty_or_missing_list() {
        assert!(!needs_locale_fallback(&json!({"genres": []}), "fr-FR", "en-US"));
        assert!(!needs_locale_fallback(&json!({}), "fr-FR", "en-US"));
    }

    #[tokio::test]
    async fn test_retries_once_with_default_locale() {
        let upstream = Scripted::new(vec![
            Ok(json!({"genres": [{"id": 28, "name": null}]})),
            Ok(json!({"genres": [{"id": 28, "name": "Action"}]})),
        ]);

        let payload = fetch_with_locale_fallback(&upstream, &genres_request("xx-XX"), "en-US")
            .await
            .unwrap();

        assert_eq!(payload, json!({"genres": [{"id": 28, "name": "Action"}]}));
        assert_eq!(
            upstream.languages(),
            vec![Some("xx-XX".to_string()), Some("en-US".to_string())]
        );
    }

    #[tokio::test]
    async fn test_second_response_returned_even_if_still_null() {
        let upstream = Scripted::new(vec![
            Ok(json!({"genres": [{"id": 28, "name": null}]})),
            Ok(json!({"genres": [{"id": 28, "name": null}]})),
            Ok(json!({"genres": [{"id": 28, "name": "unused"}]})),
        ]);

        let payload = fetch_with_locale_fallback(&upstream, &genres_request("xx-XX"), "en-US")
            .await
            .unwrap();

        assert_eq!(payload, json!({"genres": [{"id": 28, "name": null}]}));
        assert_eq!(upstream.languages().len(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_when_translated() {
        let upstream = Scripted::new(vec![Ok(json!({"genres": [{"id": 28, "name": "Acción"}]}))]);

        fetch_with_locale_fallback(&upstream, &genres_request("es-ES"), "en-US")
            .await
            .unwrap();

        assert_eq!(upstream.languages().len(), 1);
    }

    #[tokio::test]
    async fn test_errors_not_retried() {
        let upstream = Scripted::new(vec![
            Err(UpstreamError::status(503)),
            Ok(json!({"genres": []})),
        ]);

        let err = fetch_with_locale_fallback(&upstream, &genres_request("xx-XX"), "en-US")
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(503));
        assert_eq!(upstream.languages().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_error_surfaces() {
        let upstream = Scripted::new(vec![
            Ok(json!({"genres": [{"id": 28, "name": null}]})),
            Err(UpstreamError::status(500)),
        ]);

        let err = fetch_with_locale_fallback(&upstream, &genres_request("xx-XX"), "en-US")
            .await
            .unwrap_err();

        assert_eq!(err, UpstreamError::status(500));
    }
}
