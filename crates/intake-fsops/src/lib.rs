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

//! Storage gateway that treats a local directory tree as a single object container.
//!
//! Layout: `error.rs` (gateway construction errors), `gateway.rs` (`LocalStorageGateway`).

pub mod error;
pub mod gateway;

pub use error::{FsOpsError, FsOpsResult};
pub use gateway::{LocalStorageGateway, META_DIR_NAME, QuarantineMetadata};
