//! Per-kind gate rules.
//!
//! Field access is explicit: each gate names the JSON pointers it reads. A
//! missing list field counts as an empty list and is never inserted; a missing
//! or non-boolean `adult` counts as `false`; a missing `public` counts as public.

use serde_json::Value;

use super::{CompositeShape, DenyReason, FilterOutcome};

const RESULTS: &str = "/results";
const PARTS: &str = "/parts";
const CAST: &str = "/combined_credits/cast";
const CREW: &str = "/combined_credits/crew";

/// Whether a payload or list item is flagged as adult content.
pub fn is_adult(item: &Value) -> bool {
    item.get("adult").and_then(Value::as_bool).unwrap_or(false)
}

/// Drop adult items unless `include_adult` is set. Order is preserved and the
/// input is left untouched.
pub fn filter_items(items: &[Value], include_adult: bool) -> Vec<Value> {
    if include_adult {
        return items.to_vec();
    }
    items.iter().filter(|item| !is_adult(item)).cloned().collect()
}

fn list_at<'a>(payload: &'a Value, pointer: &str) -> Option<&'a Vec<Value>> {
    payload.pointer(pointer).and_then(Value::as_array)
}

/// Filter the array at `pointer` in place. Returns `false` when there is no array there.
fn filter_list_at(payload: &mut Value, pointer: &str, include_adult: bool) -> bool {
    match payload.pointer_mut(pointer).and_then(Value::as_array_mut) {
        Some(items) => {
            let kept = filter_items(items, include_adult);
            *items = kept;
            true
        }
        None => false,
    }
}

/// Paged list responses: reduce `results`.
pub fn gate_list(mut payload: Value, include_adult: bool) -> FilterOutcome {
    if include_adult {
        return FilterOutcome::Pass(payload);
    }
    if filter_list_at(&mut payload, RESULTS, include_adult) {
        FilterOutcome::Filtered(payload)
    } else {
        FilterOutcome::Pass(payload)
    }
}

/// Single resources: refuse the whole thing when it is adult-flagged.
pub fn gate_single(payload: Value, include_adult: bool) -> FilterOutcome {
    if !include_adult && is_adult(&payload) {
        return FilterOutcome::Denied(DenyReason::AdultContentBlocked);
    }
    FilterOutcome::Pass(payload)
}

/// Resources bundling sub-items.
///
/// Collections are refused outright when every part is adult. Filmographies
/// are only ever reduced, even when nothing survives.
pub fn gate_composite(payload: Value, shape: CompositeShape, include_adult: bool) -> FilterOutcome {
    if include_adult {
        return FilterOutcome::Pass(payload);
    }
    match shape {
        CompositeShape::Collection => gate_collection(payload),
        CompositeShape::Filmography => gate_filmography(payload),
    }
}

fn gate_collection(mut payload: Value) -> FilterOutcome {
    if let Some(parts) = list_at(&payload, PARTS) {
        if !parts.is_empty() && parts.iter().all(is_adult) {
            return FilterOutcome::Denied(DenyReason::AdultContentBlocked);
        }
    }
    if filter_list_at(&mut payload, PARTS, false) {
        FilterOutcome::Filtered(payload)
    } else {
        FilterOutcome::Pass(payload)
    }
}

fn gate_filmography(mut payload: Value) -> FilterOutcome {
    // Both lists are filtered; no short-circuit on an all-adult filmography.
    let cast = filter_list_at(&mut payload, CAST, false);
    let crew = filter_list_at(&mut payload, CREW, false);
    if cast || crew {
        FilterOutcome::Filtered(payload)
    } else {
        FilterOutcome::Pass(payload)
    }
}

/// User lists: private lists are refused before any content filtering.
pub fn gate_listing(payload: Value, include_adult: bool) -> FilterOutcome {
    if payload.get("public").and_then(Value::as_bool) == Some(false) {
        return FilterOutcome::Denied(DenyReason::PrivateResourceBlocked);
    }
    gate_list(payload, include_adult)
}
