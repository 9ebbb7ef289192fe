//! Errors raised while constructing the webhook notifier.

use thiserror::Error;

/// Result alias for notifier construction.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Failures building the HTTP client behind the notifier.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// HTTP client could not be built.
    #[error("failed to build webhook client")]
    Client {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
}
