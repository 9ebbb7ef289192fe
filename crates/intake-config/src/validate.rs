//! Normalisation and validation helpers for intake rules.

use crate::defaults::PATH_SEPARATOR;
use crate::error::{ConfigError, ConfigResult};
use crate::model::DownstreamTarget;

/// Trim whitespace and trailing separators, then reject paths that cannot form a key prefix.
pub(crate) fn normalize_intake_path(index: usize, raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim().trim_end_matches(PATH_SEPARATOR);
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(
            index,
            "intake_path",
            "empty",
            Some(raw.to_string()),
        ));
    }
    if trimmed.starts_with(PATH_SEPARATOR) {
        return Err(ConfigError::invalid(
            index,
            "intake_path",
            "leading_separator",
            Some(raw.to_string()),
        ));
    }
    if trimmed.split(PATH_SEPARATOR).any(str::is_empty) {
        return Err(ConfigError::invalid(
            index,
            "intake_path",
            "empty_segment",
            Some(raw.to_string()),
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_retention(
    index: usize,
    field: &'static str,
    days: i64,
) -> ConfigResult<u32> {
    if days <= 0 {
        return Err(ConfigError::invalid(
            index,
            field,
            "not_positive",
            Some(days.to_string()),
        ));
    }
    u32::try_from(days)
        .map_err(|_| ConfigError::invalid(index, field, "out_of_range", Some(days.to_string())))
}

pub(crate) fn validate_target(index: usize, raw: &str) -> ConfigResult<DownstreamTarget> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(
            index,
            "downstream_target",
            "empty",
            None,
        ));
    }
    Ok(DownstreamTarget::new(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_nested_paths() {
        assert_eq!(
            normalize_intake_path(0, " data/incoming// ").unwrap(),
            "data/incoming"
        );
    }

    #[test]
    fn normalize_rejects_degenerate_paths() {
        for raw in ["", "   ", "/", "/abs", "a//b"] {
            assert!(
                normalize_intake_path(0, raw).is_err(),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn retention_must_be_positive_and_fit() {
        assert_eq!(validate_retention(0, "days", 7).unwrap(), 7);
        assert!(validate_retention(0, "days", 0).is_err());
        assert!(validate_retention(0, "days", -3).is_err());
        assert!(validate_retention(0, "days", i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn target_is_trimmed_and_required() {
        assert_eq!(validate_target(1, "  hook ").unwrap().as_str(), "hook");
        let err = validate_target(1, " ").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                index: 1,
                field: "downstream_target",
                ..
            }
        ));
    }
}
