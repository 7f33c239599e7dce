//! Endpoint table.
//!
//! One row per inbound route: how to build the upstream request from the query
//! string, and which visibility gate (if any) the response goes through.

use crate::config::DefaultsConfig;
use crate::error::Result;
use crate::services::UpstreamRequest;
use crate::visibility::{CompositeShape, ResourceKind};

use super::params::{path_segment, Params};

type BuildFn = fn(&Params<'_>, &DefaultsConfig) -> Result<UpstreamRequest>;

/// A proxied GET route.
pub struct Endpoint {
    /// Inbound path.
    pub route: &'static str,
    /// Gate applied to the upstream payload; `None` passes it through.
    pub kind: Option<ResourceKind>,
    /// Re-fetch in the default locale when genre names come back untranslated.
    pub locale_fallback: bool,
    build: BuildFn,
}

impl Endpoint {
    const fn passthrough(route: &'static str, build: BuildFn) -> Self {
        Self {
            route,
            kind: None,
            locale_fallback: false,
            build,
        }
    }

    const fn filtered(route: &'static str, kind: ResourceKind, build: BuildFn) -> Self {
        Self {
            route,
            kind: Some(kind),
            locale_fallback: false,
            build,
        }
    }

    const fn genres(route: &'static str, build: BuildFn) -> Self {
        Self {
            route,
            kind: None,
            locale_fallback: true,
            build,
        }
    }

    /// Build the upstream request for this route.
    pub fn request(&self, params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
        (self.build)(params, defaults)
    }
}

/// Every route the proxy serves. Anything else is refused.
pub static ENDPOINTS: &[Endpoint] = &[
    // General
    Endpoint::passthrough("/get-api-configuration", api_configuration),
    Endpoint::genres("/get-movie-genres", movie_genres),
    Endpoint::genres("/get-tv-genres", tv_genres),
    // Home
    Endpoint::filtered("/get-now-playing-movies", ResourceKind::ListResult, now_playing_movies),
    Endpoint::filtered("/get-trending-all", ResourceKind::ListResult, trending_all),
    Endpoint::filtered("/get-popular-movies", ResourceKind::ListResult, popular_movies),
    Endpoint::filtered("/get-popular-tvs", ResourceKind::ListResult, popular_tvs),
    Endpoint::filtered("/get-popular-people", ResourceKind::ListResult, popular_people),
    // Discover
    Endpoint::filtered("/discover-movies", ResourceKind::ListResult, discover_movies),
    Endpoint::filtered("/discover-tvs", ResourceKind::ListResult, discover_tvs),
    Endpoint::passthrough("/get-movie-providers", movie_providers),
    Endpoint::passthrough("/get-tv-providers", tv_providers),
    Endpoint::passthrough("/search-keywords", search_keywords),
    // Details
    Endpoint::filtered("/get-movie-details", ResourceKind::SingleDetail, movie_details),
    Endpoint::filtered("/get-tv-details", ResourceKind::SingleDetail, tv_details),
    Endpoint::passthrough("/get-tv-season-details", tv_season_details),
    Endpoint::filtered(
        "/get-person-details",
        ResourceKind::CompositeDetail(CompositeShape::Filmography),
        person_details,
    ),
    Endpoint::filtered(
        "/get-collection-details",
        ResourceKind::CompositeDetail(CompositeShape::Collection),
        collection_details,
    ),
    Endpoint::filtered("/get-list-details", ResourceKind::ListingResource, list_details),
    // Search
    Endpoint::filtered("/search-movies", ResourceKind::ListResult, search_movies),
    Endpoint::filtered("/search-tvs", ResourceKind::ListResult, search_tvs),
    Endpoint::filtered("/search-people", ResourceKind::ListResult, search_people),
];

// =============================================================================
// Request builders
// =============================================================================

fn language(params: &Params<'_>, defaults: &DefaultsConfig) -> String {
    params.get_or("language", &defaults.language)
}

fn api_configuration(_: &Params<'_>, _: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/configuration").param(
        "append_to_response",
        "countries,jobs,languages,timezones,primary_translations",
    ))
}

fn movie_genres(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/genre/movie/list").language(language(params, defaults)))
}

fn tv_genres(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/genre/tv/list").language(language(params, defaults)))
}

fn now_playing_movies(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/movie/now_playing")
        .language(language(params, defaults))
        .param("region", params.get_or("region", &defaults.region))
        .param_opt("page", params.get("page")))
}

fn trending_all(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    let time_window = path_segment(params.get("time_window").unwrap_or("day"))?;
    Ok(UpstreamRequest::new(format!("/3/trending/all/{}", time_window))
        .language(language(params, defaults))
        .param("page", params.get_or("page", "1")))
}

fn popular_movies(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/movie/popular")
        .language(language(params, defaults))
        .param("region", params.get_or("region", &defaults.region))
        .param_opt("page", params.get("page")))
}

fn popular_tvs(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/tv/popular")
        .language(language(params, defaults))
        .param_opt("page", params.get("page")))
}

fn popular_people(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/person/popular")
        .language(language(params, defaults))
        .param_opt("page", params.get("page")))
}

/// Filters shared by movie and TV discovery. `date_field` is the upstream
/// field the `from_date`/`to_date` range applies to.
fn discover(
    path: &str,
    date_field: &str,
    params: &Params<'_>,
    defaults: &DefaultsConfig,
) -> UpstreamRequest {
    UpstreamRequest::new(path)
        .language(language(params, defaults))
        .param("watch_region", params.get_or("watch_region", &defaults.region))
        .param("page", params.get_or("page", "1"))
        .param("include_adult", params.include_adult().to_string())
        .param("sort_by", params.sort_by())
        .param_opt("with_watch_monetization_types", params.get("watch_types"))
        .param_opt("vote_count.gte", params.get("vote_count"))
        .param_opt("vote_average.gte", params.get("vote_min"))
        .param_opt("vote_average.lte", params.get("vote_max"))
        .param_opt("with_runtime.gte", params.get("duration_min"))
        .param_opt("with_runtime.lte", params.get("duration_max"))
        .param_opt(format!("{}.gte", date_field), params.get("from_date"))
        .param_opt(format!("{}.lte", date_field), params.get("to_date"))
        .param_opt("with_genres", params.get("genres"))
        .param_opt("with_keywords", params.keywords())
        .param_opt("with_watch_providers", params.get("watch_providers"))
}

fn discover_movies(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(discover("/3/discover/movie", "release_date", params, defaults)
        .param("include_video", params.get_or("include_video", "true")))
}

fn discover_tvs(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(discover("/3/discover/tv", "first_air_date", params, defaults))
}

fn movie_providers(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/watch/providers/movie")
        .language(language(params, defaults))
        .param("watch_region", params.get_or("watch_region", &defaults.region)))
}

fn tv_providers(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/watch/providers/tv")
        .language(language(params, defaults))
        .param("watch_region", params.get_or("watch_region", &defaults.region)))
}

fn search_keywords(params: &Params<'_>, _: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(UpstreamRequest::new("/3/search/keyword")
        .param("query", params.get_or("query", ""))
        .param("page", params.get_or("page", "1")))
}

fn movie_details(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    let id = path_segment(params.required("id")?)?;
    Ok(UpstreamRequest::new(format!("/3/movie/{}", id))
        .language(language(params, defaults))
        .param("include_image_language", "null")
        .param(
            "append_to_response",
            "images,videos,keywords,lists,recommendations,reviews,watch/providers,release_dates,external_ids,credits",
        ))
}

fn tv_details(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    let id = path_segment(params.required("id")?)?;
    Ok(UpstreamRequest::new(format!("/3/tv/{}", id))
        .language(language(params, defaults))
        .param(
            "append_to_response",
            "aggregate_credits,content_ratings,external_ids,images,keywords,lists,recommendations,reviews,videos,watch/providers",
        )
        .param("include_image_language", "null"))
}

fn tv_season_details(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    let tv = path_segment(params.required("tv")?)?;
    let season = path_segment(params.required("season")?)?;
    Ok(UpstreamRequest::new(format!("/3/tv/{}/season/{}", tv, season))
        .language(language(params, defaults))
        .param("include_image_language", "en,null")
        .param("include_video_language", "en,null")
        .param(
            "append_to_response",
            "account_states,aggregate_credits,images,videos",
        ))
}

fn person_details(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    let id = path_segment(params.required("id")?)?;
    Ok(UpstreamRequest::new(format!("/3/person/{}", id))
        .language(language(params, defaults))
        .param("append_to_response", "combined_credits,external_ids,images"))
}

fn collection_details(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    let id = path_segment(params.required("id")?)?;
    Ok(UpstreamRequest::new(format!("/3/collection/{}", id))
        .language(language(params, defaults))
        .param("include_image_language", "null")
        .param("append_to_response", "images"))
}

fn list_details(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    let id = path_segment(params.required("id")?)?;
    Ok(UpstreamRequest::new(format!("/4/list/{}", id))
        .language(language(params, defaults))
        .param("page", params.get_or("page", "1")))
}

fn search(path: &str, params: &Params<'_>, defaults: &DefaultsConfig) -> UpstreamRequest {
    UpstreamRequest::new(path)
        .language(language(params, defaults))
        .param("include_adult", params.include_adult().to_string())
        .param("query", params.get_or("query", ""))
        .param("page", params.get_or("page", "1"))
}

fn search_movies(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(search("/3/search/movie", params, defaults))
}

fn search_tvs(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(search("/3/search/tv", params, defaults))
}

fn search_people(params: &Params<'_>, defaults: &DefaultsConfig) -> Result<UpstreamRequest> {
    Ok(search("/3/search/person", params, defaults))
}
