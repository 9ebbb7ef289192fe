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

//! Intake path configuration for the object intake engine.
//!
//! Layout: `model.rs` (rule and configuration types), `validate.rs` (normalisation and
//! field checks), `loader.rs` (JSON and environment loading), `defaults.rs` (shared defaults).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
mod validate;

pub use defaults::{
    CONTAINER_ENV, DEFAULT_NORMAL_RETENTION_DAYS, INTAKE_PATHS_ENV, PATH_SEPARATOR,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::container_from_env;
pub use model::{DownstreamTarget, IntakeConfiguration, PathRule};
