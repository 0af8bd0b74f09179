//! Layout warnings with deduplication.
//!
//! Table layout never fails: malformed input (zero spans, percentages that
//! add up past 100%, spans running off the grid) is repaired in place. The
//! repair is worth telling the author about, but a table with a thousand
//! rows must not report the same repair a thousand times, so each distinct
//! message is emitted once per process (or until [`clear_warnings`]).

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a recovered authoring error (emitted once per unique message).
///
/// Returns `true` if this call emitted the warning, `false` if the same
/// message had already been reported.
///
/// # Example
/// ```
/// use trestle_common::warning::warn_once;
///
/// assert!(warn_once("grid", "colspan=0 clamped to 1"));
/// assert!(!warn_once("grid", "colspan=0 clamped to 1"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let is_new = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if is_new {
        tracing::warn!(target: "trestle", component, "{message}");
    }
    is_new
}

/// Forget every recorded warning (call before laying out an unrelated document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}
