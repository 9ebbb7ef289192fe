//! JSON and environment loading for intake configuration.
//!
//! # Design
//! - The environment is read here, once, at process start; everything downstream receives
//!   an already-constructed [`IntakeConfiguration`].
//! - Lookup is injectable so tests never mutate the real process environment unless they
//!   mean to.

use serde::Deserialize;
use tracing::{debug, info};

use crate::defaults::{CONTAINER_ENV, DEFAULT_NORMAL_RETENTION_DAYS, INTAKE_PATHS_ENV};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{DownstreamTarget, IntakeConfiguration, PathRule};
use crate::validate::{normalize_intake_path, validate_retention, validate_target};

/// Wire shape of a single rule inside the configuration document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RuleDocument {
    #[serde(alias = "intakePath")]
    path: String,
    #[serde(default, alias = "normalRetentionDays")]
    retention_days: Option<i64>,
    #[serde(default)]
    error_retention_days: Option<i64>,
    #[serde(alias = "downstreamTarget")]
    target: String,
}

impl RuleDocument {
    fn into_rule(self, index: usize) -> ConfigResult<PathRule> {
        let normal_retention_days = match self.retention_days {
            Some(days) => validate_retention(index, "normal_retention_days", days)?,
            None => DEFAULT_NORMAL_RETENTION_DAYS,
        };
        let error_retention_days = self
            .error_retention_days
            .map(|days| validate_retention(index, "error_retention_days", days))
            .transpose()?;
        let target: DownstreamTarget = validate_target(index, &self.target)?;
        Ok(PathRule {
            intake_path: normalize_intake_path(index, &self.path)?,
            normal_retention_days,
            error_retention_days,
            downstream_target: target,
        })
    }
}

impl IntakeConfiguration {
    /// Parse a JSON array of rule objects, keeping declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and the validation errors of
    /// [`IntakeConfiguration::new`] for rejected rules.
    pub fn from_json(document: &str) -> ConfigResult<Self> {
        let raw: Vec<RuleDocument> =
            serde_json::from_str(document).map_err(|source| ConfigError::Parse { source })?;
        let rules = raw
            .into_iter()
            .enumerate()
            .map(|(index, rule)| rule.into_rule(index))
            .collect::<ConfigResult<Vec<_>>>()?;
        let config = Self::new(rules)?;
        debug!(rules = config.len(), "parsed intake configuration");
        Ok(config)
    }

    /// Load the configuration from the `INTAKE_PATHS` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] when the variable is unset, otherwise the errors
    /// of [`IntakeConfiguration::from_json`].
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`IntakeConfiguration::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let document = lookup(INTAKE_PATHS_ENV).ok_or(ConfigError::MissingEnv {
            name: INTAKE_PATHS_ENV,
        })?;
        let config = Self::from_json(&document)?;
        info!(
            rules = config.len(),
            source = INTAKE_PATHS_ENV,
            "intake configuration loaded"
        );
        Ok(config)
    }
}

/// Container name configured through `INTAKE_CONTAINER`, when set and non-blank.
#[must_use]
pub fn container_from_env() -> Option<String> {
    container_from_value(std::env::var(CONTAINER_ENV).ok().as_deref())
}

fn container_from_value(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
}
