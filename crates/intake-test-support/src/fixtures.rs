//! Configuration builders and filesystem fixtures.

use std::io;

use intake_config::{ConfigResult, IntakeConfiguration, PathRule};
use tempfile::TempDir;

/// Timestamp used by fixed clocks throughout the suites.
pub const FIXED_TIMESTAMP: &str = "2026-02-22T10:30:00.000Z";

/// Container name used by in-memory fixtures.
pub const TEST_CONTAINER: &str = "intake-test";

/// Configuration built from `(intake_path, target)` pairs in the given order.
///
/// # Errors
///
/// Returns the validation error of the first invalid rule.
pub fn rules(pairs: &[(&str, &str)]) -> ConfigResult<IntakeConfiguration> {
    IntakeConfiguration::new(
        pairs
            .iter()
            .map(|(path, target)| PathRule::new(*path, *target))
            .collect(),
    )
}

/// Temporary directory that acts as a storage container root.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn temp_root() -> io::Result<TempDir> {
    tempfile::Builder::new().prefix("intake-").tempdir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_keep_order() -> ConfigResult<()> {
        let config = rules(&[("a", "x"), ("a/b", "y")])?;
        assert_eq!(config.rules()[0].intake_path, "a");
        assert_eq!(config.rules()[1].downstream_target.as_str(), "y");
        Ok(())
    }

    #[test]
    fn temp_root_is_a_directory() -> io::Result<()> {
        let root = temp_root()?;
        assert!(root.path().is_dir());
        Ok(())
    }
}
