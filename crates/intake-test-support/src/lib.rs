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

//! Shared test helpers used across intake suites.
//!
//! Layout: `fixtures.rs` (configuration builders, temp roots),
//! `mocks.rs` (in-memory storage and notifier).

pub mod fixtures;
pub mod mocks;
