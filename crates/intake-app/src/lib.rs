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

//! Intake dispatcher wiring.
//!
//! Layout: `cli.rs` (arguments), `records.rs` (notification documents),
//! `dispatch.rs` (bounded batch processing), `bootstrap.rs` (service wiring),
//! `error.rs` (application errors).

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Command-line arguments.
pub mod cli;
/// Batch processing over the engine.
pub mod dispatch;
pub mod error;
/// Notification document parsing.
pub mod records;

pub use bootstrap::{BootstrapDependencies, run_app, run_app_with};
pub use cli::Cli;
pub use dispatch::{BatchReport, process_batch};
pub use error::{AppError, AppResult};
pub use records::{MalformedRecord, ParsedBatch, parse_records};
