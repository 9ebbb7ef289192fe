//! Default values and environment variable names for intake configuration.
//!
//! # Design
//! - Centralise names read from the process environment so only the loader touches them.
//! - Keep retention defaults explicit for auditability.

/// Environment variable holding the JSON array of intake path rules.
pub const INTAKE_PATHS_ENV: &str = "INTAKE_PATHS";
/// Environment variable naming the storage container the application serves.
pub const CONTAINER_ENV: &str = "INTAKE_CONTAINER";
/// Retention window applied to processed objects when a rule omits one.
pub const DEFAULT_NORMAL_RETENTION_DAYS: u32 = 30;
/// Separator between key segments.
pub const PATH_SEPARATOR: char = '/';
