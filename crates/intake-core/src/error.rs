//! # Design
//!
//! - Errors surfaced by the storage and notifier ports, with constant messages and context fields.
//! - The engine never propagates these; it renders them into outcome reasons via [`error_chain`].

use std::error::Error;
use std::io;

use thiserror::Error;

/// Result alias for storage gateway operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result alias for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Failures reported by a storage gateway.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key cannot be mapped onto the storage namespace.
    #[error("invalid object key")]
    InvalidKey {
        /// Offending key.
        key: String,
        /// Machine-readable reason.
        reason: &'static str,
    },
    /// Source object does not exist.
    #[error("object not found")]
    NotFound {
        /// Missing key.
        key: String,
    },
    /// IO failure while moving object data.
    #[error("storage io failure")]
    Io {
        /// Operation that failed.
        operation: &'static str,
        /// Key involved in the failure.
        key: String,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Backend-specific failure.
    #[error("storage backend failure")]
    Backend {
        /// Operation that failed.
        operation: &'static str,
        /// Key involved in the failure.
        key: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Build an [`StorageError::Io`] variant.
    pub fn io(operation: &'static str, key: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation,
            key: key.into(),
            source,
        }
    }

    /// Build a [`StorageError::Backend`] variant.
    pub fn backend(
        operation: &'static str,
        key: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Backend {
            operation,
            key: key.into(),
            source: source.into(),
        }
    }
}

/// Failures reported by a notifier when a dispatch is not accepted.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Downstream target handle cannot be used.
    #[error("invalid downstream target")]
    InvalidTarget {
        /// Offending target handle.
        target: String,
        /// Machine-readable reason.
        reason: &'static str,
    },
    /// Downstream refused the dispatch.
    #[error("downstream rejected dispatch with status {status}")]
    Rejected {
        /// Target that rejected the dispatch.
        target: String,
        /// Status code returned by the downstream.
        status: u16,
    },
    /// Dispatch could not be delivered.
    #[error("downstream dispatch failed")]
    Dispatch {
        /// Target the dispatch was addressed to.
        target: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl NotifyError {
    /// Build a [`NotifyError::Dispatch`] variant.
    pub fn dispatch(
        target: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Dispatch {
            target: target.into(),
            source: source.into(),
        }
    }
}

/// Render an error and all of its sources as `message: source: source`.
#[must_use]
pub fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
