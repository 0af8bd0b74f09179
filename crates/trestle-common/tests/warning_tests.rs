//! Tests for the deduplicating warning channel.

use trestle_common::warning::{clear_warnings, warn_once, warning_count};

// The warning set is process-global, so everything runs in one test to keep
// the counts deterministic under the parallel test runner.
#[test]
fn test_warn_once_deduplicates_until_cleared() {
    clear_warnings();

    assert!(warn_once("grid", "colspan=0 clamped to 1"));
    assert!(
        !warn_once("grid", "colspan=0 clamped to 1"),
        "same message must only be emitted once"
    );
    assert!(
        warn_once("auto", "colspan=0 clamped to 1"),
        "same text from another component is a distinct warning"
    );
    assert_eq!(warning_count(), 2);

    clear_warnings();
    assert_eq!(warning_count(), 0);
    assert!(
        warn_once("grid", "colspan=0 clamped to 1"),
        "cleared warnings are emitted again"
    );
}
