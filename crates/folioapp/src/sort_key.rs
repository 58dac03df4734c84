//! # Sibling Ordering: Fractional Sort Keys
//!
//! Siblings (resources sharing a `parentId`) are displayed by ascending
//! `metaSortKey`. Keys are sparse `f64` values, not positions: placing a
//! resource between two siblings only computes a key for that resource and
//! never touches any other sibling.
//!
//! ## Allocation Rules
//!
//! - **After a sibling**: midpoint between it and its successor, or
//!   `key + SORT_KEY_GAP` when it is last ([`allocate_after`]).
//! - **Top of the list**: new resources sort first. The key is `-now_ms`,
//!   pushed below the current minimum when needed ([`allocate_top`]).
//!
//! ## Exhaustion
//!
//! Repeated bisection at the same spot eventually runs out of `f64`
//! precision. When the midpoint collapses onto one of its bounds the
//! allocator returns [`FolioError::SortKeyExhausted`] instead of a duplicate
//! or out-of-order key. Recovery is explicit: [`rebalance`] spreads the
//! sibling set back out over multiples of `SORT_KEY_GAP`.

use crate::error::{FolioError, Result};
use crate::model::Resource;
use std::cmp::Ordering;

/// Distance left after the last sibling, and the step used when rebalancing.
pub const SORT_KEY_GAP: f64 = 100.0;

/// Display order among siblings: ascending key, ties go to the newer resource.
pub fn display_order(a: &Resource, b: &Resource) -> Ordering {
    a.sort_key
        .total_cmp(&b.sort_key)
        .then_with(|| b.created.cmp(&a.created))
}

/// Computes a key for a new sibling placed immediately after `existing`.
///
/// `siblings` must all share `existing`'s parent. It may contain `existing`
/// itself and may be limited to the siblings sorting after it.
pub fn allocate_after(existing: &Resource, siblings: &[Resource]) -> Result<f64> {
    let mut successor: Option<f64> = None;
    for sibling in siblings {
        if sibling.parent_id != existing.parent_id {
            return Err(FolioError::ParentMismatch {
                expected: existing.parent_id.clone(),
                found: sibling.parent_id.clone(),
            });
        }
        if sibling.id == existing.id || sibling.sort_key <= existing.sort_key {
            continue;
        }
        if successor.map_or(true, |key| sibling.sort_key < key) {
            successor = Some(sibling.sort_key);
        }
    }

    let key = allocate_between(Some(existing.sort_key), successor)?;
    tracing::debug!(after = %existing.id, ?successor, key, "allocated sort key");
    Ok(key)
}

/// Computes a key strictly between `lower` and `upper`. Either bound may be
/// absent; with neither, the key is `0.0`.
pub fn allocate_between(lower: Option<f64>, upper: Option<f64>) -> Result<f64> {
    for bound in [lower, upper].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(FolioError::InvalidSortKey(bound));
        }
    }

    match (lower, upper) {
        (Some(lo), Some(hi)) => {
            let mid = lo + (hi - lo) / 2.0;
            if lo >= hi || mid <= lo || mid >= hi {
                return Err(FolioError::SortKeyExhausted {
                    lower: lo,
                    upper: hi,
                });
            }
            Ok(mid)
        }
        (Some(lo), None) => {
            let key = lo + SORT_KEY_GAP;
            if key <= lo || !key.is_finite() {
                return Err(FolioError::SortKeyExhausted {
                    lower: lo,
                    upper: f64::INFINITY,
                });
            }
            Ok(key)
        }
        (None, Some(hi)) => {
            let key = hi - SORT_KEY_GAP;
            if key >= hi || !key.is_finite() {
                return Err(FolioError::SortKeyExhausted {
                    lower: f64::NEG_INFINITY,
                    upper: hi,
                });
            }
            Ok(key)
        }
        (None, None) => Ok(0.0),
    }
}

/// Computes a key that sorts before every sibling in `siblings`.
///
/// Uses `-now_ms` so keys decrease with creation time. If a sibling already
/// sits at or below that value, the key goes one gap below it instead.
pub fn allocate_top(siblings: &[Resource], now_ms: i64) -> Result<f64> {
    let candidate = -(now_ms as f64);
    let lowest = siblings
        .iter()
        .map(|s| s.sort_key)
        .min_by(|a, b| a.total_cmp(b));

    match lowest {
        Some(min) if candidate >= min => allocate_between(None, Some(min)),
        _ => Ok(candidate),
    }
}

/// Reassigns keys across a sibling set, keeping the current display order.
///
/// Returns `(id, new_key)` pairs in display order; keys are
/// `SORT_KEY_GAP, 2 * SORT_KEY_GAP, ...`.
pub fn rebalance(siblings: &[Resource]) -> Vec<(String, f64)> {
    let mut ordered: Vec<&Resource> = siblings.iter().collect();
    ordered.sort_by(|a, b| display_order(a, b));
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, res)| (res.id.clone(), (i as f64 + 1.0) * SORT_KEY_GAP))
        .collect()
}
