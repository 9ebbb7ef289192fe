#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Notifier that delivers object-ready events to HTTP webhooks.
//!
//! Each rule's downstream target is the webhook URL. A dispatch counts as accepted only when
//! the webhook answers with a 2xx status.

pub mod error;
pub mod webhook;

pub use error::{WebhookError, WebhookResult};
pub use webhook::{
    DEFAULT_TIMEOUT, EVENT_HEADER, OBJECT_READY_EVENT, ObjectReadyEvent, WebhookNotifier,
};
