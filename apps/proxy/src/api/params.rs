//! Query parameter access for inbound requests.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::visibility::resolve_include_adult;

/// Canonical name of the adult-content opt-in parameter.
pub const INCLUDE_ADULT_PARAM: &str = "includeAdult";

/// Read-only view over the inbound query string.
///
/// Empty values are treated as absent, so `?page=` falls back to the default.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    raw: &'a HashMap<String, String>,
}

impl<'a> Params<'a> {
    pub fn new(raw: &'a HashMap<String, String>) -> Self {
        Self { raw }
    }

    /// Non-empty value of `key`.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.raw
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Value of `key`, or `default` when absent.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Value of `key`, or a 400 naming the missing parameter.
    pub fn required(&self, key: &str) -> Result<&'a str> {
        self.get(key).ok_or_else(|| {
            AppError::BadRequest(format!("Missing required query parameter: {}", key))
        })
    }

    /// Resolved `includeAdult` flag. The raw value is looked up without the
    /// empty-as-absent rule since any non-`"true"` value means the same thing.
    pub fn include_adult(&self) -> bool {
        resolve_include_adult(self.raw.get(INCLUDE_ADULT_PARAM).map(String::as_str))
    }

    /// Discover `sort_by`: `{sort_by}.{sort_direction}`.
    pub fn sort_by(&self) -> String {
        format!(
            "{}.{}",
            self.get("sort_by").unwrap_or("popularity"),
            self.get("sort_direction").unwrap_or("desc")
        )
    }

    /// Keyword ids for discover. Each `|`-separated token is cut at its first
    /// `%`, dropping the label the frontend appends (`"9715%superhero"` -> `"9715"`).
    pub fn keywords(&self) -> Option<String> {
        self.get("keywords").map(|raw| {
            raw.split('|')
                .map(|keyword| keyword.split('%').next().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("|")
        })
    }
}

/// Percent-encode a caller-supplied value for use as a single path segment.
///
/// `.` and `..` are refused: URL normalisation would otherwise collapse them
/// and move the request to a different upstream path.
pub fn path_segment(value: &str) -> Result<String> {
    if value == "." || value == ".." {
        return Err(AppError::BadRequest(format!(
            "Invalid path identifier: {}",
            value
        )));
    }
    Ok(urlencoding::encode(value).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_value_is_absent() {
        let map = raw(&[("page", "")]);
        let params = Params::new(&map);
        assert_eq!(params.get("page"), None);
        assert_eq!(params.get_or("page", "1"), "1");
    }

    #[test]
    fn test_required_missing() {
        let map = raw(&[]);
        let err = Params::new(&map).required("id").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("id")));
    }

    #[test]
    fn test_include_adult() {
        let map = raw(&[("includeAdult", "true")]);
        assert!(Params::new(&map).include_adult());

        let map = raw(&[("includeAdult", "yes")]);
        assert!(!Params::new(&map).include_adult());

        let map = raw(&[("include_adult", "true")]);
        assert!(!Params::new(&map).include_adult());
    }

    #[test]
    fn test_sort_by_defaults() {
        let map = raw(&[]);
        assert_eq!(Params::new(&map).sort_by(), "popularity.desc");

        let map = raw(&[("sort_by", "vote_average"), ("sort_direction", "asc")]);
        assert_eq!(Params::new(&map).sort_by(), "vote_average.asc");
    }

    #[test]
    fn test_keywords_strip_labels() {
        let map = raw(&[("keywords", "9715%superhero|180547%marvel")]);
        assert_eq!(
            Params::new(&map).keywords().as_deref(),
            Some("9715|180547")
        );

        let map = raw(&[("keywords", "818")]);
        assert_eq!(Params::new(&map).keywords().as_deref(), Some("818"));

        let map = raw(&[]);
        assert_eq!(Params::new(&map).keywords(), None);
    }

    #[test]
    fn test_path_segment_encodes_separators() {
        assert_eq!(path_segment("550").unwrap(), "550");
        assert_eq!(path_segment("../account").unwrap(), "..%2Faccount");
        assert_eq!(path_segment("...").unwrap(), "...");
    }

    #[test]
    fn test_path_segment_rejects_dot_segments() {
        for value in [".", ".."] {
            let err = path_segment(value).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(msg) if msg.contains(value)));
        }
    }
}
