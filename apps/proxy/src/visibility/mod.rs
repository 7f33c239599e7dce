//! Content visibility filtering for upstream payloads.
//!
//! Every filtering endpoint hands its already-fetched payload to [`evaluate`],
//! which picks the gate for the endpoint's [`ResourceKind`] and returns a
//! [`FilterOutcome`]. Gates are pure: no I/O, no logging, no shared state.

mod gates;

use serde_json::Value;

pub use gates::{filter_items, gate_composite, gate_list, gate_listing, gate_single, is_adult};

/// Default for the include-adult flag when the caller does not opt in.
pub const DEFAULT_INCLUDE_ADULT: bool = false;

/// Resolve the raw `includeAdult` query value.
///
/// Only the exact string `"true"` opts in; anything else, including a missing
/// parameter, yields [`DEFAULT_INCLUDE_ADULT`].
pub fn resolve_include_adult(raw: Option<&str>) -> bool {
    match raw {
        Some("true") => true,
        _ => DEFAULT_INCLUDE_ADULT,
    }
}

/// Shape of a payload made of sub-items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeShape {
    /// A single embedded `parts` list (collections).
    Collection,
    /// Two embedded role lists, `combined_credits.cast` and `combined_credits.crew` (people).
    Filmography,
}

/// Shape category of an upstream payload, selecting which gate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Paged list with a `results` array.
    ListResult,
    /// One resource carrying its own `adult` flag.
    SingleDetail,
    /// Resource bundling a list of sub-items.
    CompositeDetail(CompositeShape),
    /// User list with a `public` flag alongside `results`.
    ListingResource,
}

impl ResourceKind {
    /// Short name for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ListResult => "list_result",
            ResourceKind::SingleDetail => "single_detail",
            ResourceKind::CompositeDetail(CompositeShape::Collection) => "collection",
            ResourceKind::CompositeDetail(CompositeShape::Filmography) => "filmography",
            ResourceKind::ListingResource => "listing",
        }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    AdultContentBlocked,
    PrivateResourceBlocked,
}

impl DenyReason {
    /// Human-readable message returned to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::AdultContentBlocked => {
                "Access denied. This content is marked as adult content and is not available with your current settings."
            }
            DenyReason::PrivateResourceBlocked => {
                "Access denied. This list is private and cannot be viewed."
            }
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of one filtering decision.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// Payload returned unchanged.
    Pass(Value),
    /// Payload returned with one or more lists reduced.
    Filtered(Value),
    /// Whole request refused.
    Denied(DenyReason),
}

impl FilterOutcome {
    /// Collapse into the payload to send, or the reason to refuse.
    pub fn into_result(self) -> Result<Value, DenyReason> {
        match self {
            FilterOutcome::Pass(payload) | FilterOutcome::Filtered(payload) => Ok(payload),
            FilterOutcome::Denied(reason) => Err(reason),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, FilterOutcome::Denied(_))
    }
}

/// Run the gate for `kind` over `payload`.
pub fn evaluate(kind: ResourceKind, payload: Value, include_adult: bool) -> FilterOutcome {
    match kind {
        ResourceKind::ListResult => gate_list(payload, include_adult),
        ResourceKind::SingleDetail => gate_single(payload, include_adult),
        ResourceKind::CompositeDetail(shape) => gate_composite(payload, shape, include_adult),
        ResourceKind::ListingResource => gate_listing(payload, include_adult),
    }
}
