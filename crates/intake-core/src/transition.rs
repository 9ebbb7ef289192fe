//! Key transitions applied to processed and quarantined objects.

use std::borrow::Cow;

use crate::guard::marker_prefix;
use crate::key::{join_segments, object_filename};

/// Directory created under an intake path to hold objects whose dispatch failed.
pub const QUARANTINE_DIR: &str = "_error";

/// Key an unprocessed object is renamed to: `intake/[nested/]<timestamp>-<filename>`.
///
/// The filename is kept byte-for-byte as a suffix; only the marker is prepended.
#[must_use]
pub fn compute_new_key(
    intake_path: &str,
    nested_sub_path: &str,
    filename: &str,
    timestamp: &str,
) -> String {
    let marked = format!("{}{filename}", marker_prefix(timestamp));
    join_segments([
        Cow::Borrowed(intake_path),
        Cow::Borrowed(nested_sub_path),
        Cow::Owned(marked),
    ])
}

/// Key a failed object is moved to: `scope/_error/<timestamp>-<basename(key)>`.
#[must_use]
pub fn quarantine_key(scope_path: &str, timestamp: &str, key: &str) -> String {
    compute_new_key(scope_path, QUARANTINE_DIR, object_filename(key), timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::is_marked;

    const STAMP: &str = "2026-02-22T10:30:00.000Z";

    #[test]
    fn prepends_marker_in_intake_root() {
        assert_eq!(
            compute_new_key("in", "", "data.json", STAMP),
            "in/2026-02-22T10:30:00.000Z-data.json"
        );
    }

    #[test]
    fn keeps_nested_directories() {
        assert_eq!(
            compute_new_key("in", "2024/05", "data.json", STAMP),
            "in/2024/05/2026-02-22T10:30:00.000Z-data.json"
        );
    }

    #[test]
    fn filename_is_preserved_verbatim() {
        for name in [
            "archive.tar.gz",
            "my report (final).pdf",
            "weird#name?&=.txt",
            "no_extension",
            ".hidden",
            "ünïcödé.json",
        ] {
            let key = compute_new_key("in", "", name, STAMP);
            assert!(key.ends_with(name), "{key} should end with {name}");
            assert!(is_marked(object_filename(&key)));
        }
    }

    #[test]
    fn quarantine_key_uses_basename_of_renamed_object() {
        let renamed = "in/sub/2026-02-22T10:30:00.000Z-data.json";
        assert_eq!(
            quarantine_key("in", "2026-02-22T10:31:00.000Z", renamed),
            "in/_error/2026-02-22T10:31:00.000Z-2026-02-22T10:30:00.000Z-data.json"
        );
    }
}
