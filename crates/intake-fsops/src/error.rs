//! # Design
//!
//! - Structured, constant-message errors for opening a local container.
//! - Per-object failures are reported through the storage port's own error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for gateway construction.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced while opening a local container.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// IO failures while inspecting the container root.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Container root is unusable.
    #[error("fsops invalid root")]
    InvalidRoot {
        /// Offending root path.
        path: PathBuf,
        /// Static reason for the failure.
        reason: &'static str,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
