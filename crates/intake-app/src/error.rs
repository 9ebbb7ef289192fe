//! # Design
//!
//! - Centralize application-level errors for bootstrap and batch intake.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Per-record failures are outcomes, never errors; only whole-run failures land here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Environment configuration was missing.
    #[error("missing environment configuration")]
    MissingEnv {
        /// Name of the missing environment variable.
        name: &'static str,
    },
    /// Configuration operations failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: intake_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: intake_telemetry::TelemetryError,
    },
    /// Opening the storage container failed.
    #[error("storage container unavailable")]
    FsOps {
        /// Operation identifier.
        operation: &'static str,
        /// Source fsops error.
        source: intake_fsops::FsOpsError,
    },
    /// Building the downstream notifier failed.
    #[error("notifier setup failed")]
    Notify {
        /// Operation identifier.
        operation: &'static str,
        /// Source notifier error.
        source: intake_notify::WebhookError,
    },
    /// The notification document could not be decoded.
    #[error("notification document is malformed")]
    Records {
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Source JSON error, when decoding failed outright.
        #[source]
        source: Option<serde_json::Error>,
    },
    /// Writing the batch report failed.
    #[error("failed to encode batch report")]
    Report {
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Optional path involved in the failure.
        path: Option<PathBuf>,
        /// Source IO error.
        source: io::Error,
    },
    /// Configuration values were invalid.
    #[error("invalid configuration")]
    InvalidConfig {
        /// Field name that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Optional value associated with the failure.
        value: Option<String>,
    },
}

impl AppError {
    pub(crate) fn config(operation: &'static str, source: intake_config::ConfigError) -> Self {
        match source {
            intake_config::ConfigError::MissingEnv { name } => Self::MissingEnv { name },
            source => Self::Config { operation, source },
        }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: intake_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn fsops(operation: &'static str, source: intake_fsops::FsOpsError) -> Self {
        Self::FsOps { operation, source }
    }

    pub(crate) const fn notify(
        operation: &'static str,
        source: intake_notify::WebhookError,
    ) -> Self {
        Self::Notify { operation, source }
    }

    pub(crate) const fn io(
        operation: &'static str,
        path: Option<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn missing_env_is_lifted_out_of_config_errors() {
        let err = AppError::config(
            "load",
            intake_config::ConfigError::MissingEnv {
                name: "INTAKE_PATHS",
            },
        );
        assert!(matches!(
            err,
            AppError::MissingEnv {
                name: "INTAKE_PATHS"
            }
        ));

        let err = AppError::config("load", intake_config::ConfigError::Empty);
        assert!(matches!(err, AppError::Config { operation: "load", .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn io_helper_keeps_path_and_source() {
        let err = AppError::io(
            "read_records",
            Some(PathBuf::from("batch.json")),
            io::Error::other("io"),
        );
        assert_eq!(err.to_string(), "io operation failed");
        assert!(err.source().is_some());
        assert!(matches!(err, AppError::Io { path: Some(_), .. }));
    }

    #[test]
    fn records_error_without_source() {
        let err = AppError::Records {
            reason: "missing_records",
            source: None,
        };
        assert_eq!(err.to_string(), "notification document is malformed");
        assert!(err.source().is_none());
    }
}
