//! Recursion guard: recognises filenames that already carry the processed marker.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator placed between the marker timestamp and the original filename.
pub const MARKER_SEPARATOR: char = '-';

// ASCII classes only; `\d` would accept non-ASCII digits.
static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}Z-")
        .expect("processed marker pattern must compile")
});

/// Whether `filename` starts with a processed marker.
///
/// Only the bare filename may be passed here; directory components are never inspected.
#[must_use]
pub fn is_marked(filename: &str) -> bool {
    MARKER_PATTERN.is_match(filename)
}

/// Marker prefix built from a clock timestamp.
#[must_use]
pub fn marker_prefix(timestamp: &str) -> String {
    format!("{timestamp}{MARKER_SEPARATOR}")
}
