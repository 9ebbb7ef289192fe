//! Error types for configuration loading and validation.

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not set.
    #[error("missing environment configuration")]
    MissingEnv {
        /// Name of the missing variable.
        name: &'static str,
    },
    /// Configuration document was not valid JSON for the rule schema.
    #[error("failed to parse intake configuration")]
    Parse {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A rule field contained an invalid value.
    #[error("invalid intake rule field")]
    InvalidField {
        /// Position of the rule in declaration order.
        index: usize,
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// No intake rules were configured.
    #[error("intake configuration has no rules")]
    Empty,
}

impl ConfigError {
    pub(crate) const fn invalid(
        index: usize,
        field: &'static str,
        reason: &'static str,
        value: Option<String>,
    ) -> Self {
        Self::InvalidField {
            index,
            field,
            reason,
            value,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_helper_captures_context() {
        let err = ConfigError::invalid(2, "path", "empty", Some(" ".to_string()));
        match err {
            ConfigError::InvalidField {
                index,
                field,
                reason,
                value,
            } => {
                assert_eq!(index, 2);
                assert_eq!(field, "path");
                assert_eq!(reason, "empty");
                assert_eq!(value.as_deref(), Some(" "));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn messages_stay_constant() {
        assert_eq!(
            ConfigError::MissingEnv { name: "X" }.to_string(),
            "missing environment configuration"
        );
        assert_eq!(
            ConfigError::Empty.to_string(),
            "intake configuration has no rules"
        );
    }
}
