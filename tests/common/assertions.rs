//! Domain-specific assertion macros for klp harnesses.
//!
//! These add context-rich failure messages that make it clear *which*
//! record invariant was violated.

use klp_core::LogEntry;

/// Assert that a `LogEntry` has a specific field with an expected value.
///
/// ```rust
/// assert_has_field!(entry, "sandbox", "abc");
/// ```
#[macro_export]
macro_rules! assert_has_field {
    ($entry:expr, $key:expr, $value:expr) => {{
        let entry: &klp_core::LogEntry = &$entry;
        let key: &str = $key;
        let expected: &str = $value;
        match entry.fields.get(key) {
            Some(actual) if actual == expected => {}
            Some(actual) => panic!(
                "assert_has_field! failed:\n  entry.fields[{:?}]\n  expected: {:?}\n  actual:   {:?}",
                key, expected, actual
            ),
            None => panic!(
                "assert_has_field! failed: field {:?} not found in entry.\n  Available fields: {:?}",
                key,
                entry.fields.keys().collect::<Vec<_>>()
            ),
        }
    }};
}

/// Assert that a `LogEntry` came from the expected source tag.
#[macro_export]
macro_rules! assert_source {
    ($entry:expr, $source:expr) => {{
        let entry: &klp_core::LogEntry = &$entry;
        let expected: &str = $source;
        if entry.source != expected {
            panic!(
                "assert_source! failed:\n  expected: {:?}\n  actual:   {:?}\n  message: {:?}",
                expected, entry.source, entry.message
            );
        }
    }};
}

/// Assert that `decoded` carries exactly the provenance of `outer`.
pub fn assert_provenance(decoded: &LogEntry, outer: &LogEntry) {
    assert_eq!(
        (decoded.filename.as_str(), decoded.line, decoded.sequence),
        (outer.filename.as_str(), outer.line, outer.sequence),
        "decoded entry must keep the outer entry's filename, line and sequence"
    );
}

/// Assert that sequence numbers strictly increase through `entries`.
pub fn assert_sequence_monotonic(entries: &[LogEntry]) {
    for pair in entries.windows(2) {
        assert!(
            pair[0].sequence < pair[1].sequence,
            "sequence went from {} to {} at {}:{}",
            pair[0].sequence,
            pair[1].sequence,
            pair[1].filename,
            pair[1].line
        );
    }
}
