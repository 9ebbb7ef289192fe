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

//! Decision engine that routes newly created objects out of configured intake paths.
//!
//! Every object the engine renames receives a leading timestamp marker. The rename itself
//! produces a fresh creation notification, and that re-entrant notification stops at the
//! recursion guard because the marker is already present, so each object is moved at most
//! once without any external bookkeeping.
//!
//! Layout: `clock.rs` (time source), `key.rs` (decoding and splitting), `matcher.rs`
//! (rule selection), `guard.rs` (processed marker), `transition.rs` (new key), `outcome.rs`
//! (result model), `ports.rs` (storage and notifier capabilities), `engine.rs` (orchestration).

pub mod clock;
pub mod engine;
pub mod error;
pub mod guard;
pub mod key;
pub mod matcher;
pub mod outcome;
pub mod ports;
pub mod transition;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::IntakeEngine;
pub use error::{NotifyError, NotifyResult, StorageError, StorageResult, error_chain};
pub use guard::{is_marked, marker_prefix};
pub use key::{decode_object_key, object_filename, split_key};
pub use matcher::match_rule;
pub use outcome::{NotificationRecord, OutcomeAction, ProcessingOutcome};
pub use ports::{Notifier, StorageGateway};
pub use transition::{QUARANTINE_DIR, compute_new_key, quarantine_key};
