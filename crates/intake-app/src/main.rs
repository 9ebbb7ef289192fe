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

//! Binary entrypoint: read one notification batch, process it, print the outcomes.

use intake_app::{AppResult, run_app};

/// Runs a single batch and exits.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
