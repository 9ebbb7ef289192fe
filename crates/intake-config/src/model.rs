//! Typed intake rules and the configuration that orders them.
//!
//! # Design
//! - Pure data carriers constructed once at process start and injected into the engine.
//! - Declaration order is preserved; matching relies on it.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_NORMAL_RETENTION_DAYS;
use crate::error::{ConfigError, ConfigResult};
use crate::validate::{normalize_intake_path, validate_retention, validate_target};

/// Opaque handle naming the downstream consumer notified for a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownstreamTarget(String);

impl DownstreamTarget {
    /// Wrap a raw handle.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw handle.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DownstreamTarget {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for DownstreamTarget {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DownstreamTarget {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single intake directory and how objects arriving there are handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRule {
    /// Key prefix designating the intake directory, without a trailing separator.
    pub intake_path: String,
    /// Days processed objects are retained by the storage lifecycle.
    pub normal_retention_days: u32,
    /// Days quarantined objects are retained, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_retention_days: Option<u32>,
    /// Consumer notified when an object in this directory has been processed.
    pub downstream_target: DownstreamTarget,
}

impl PathRule {
    /// Build a rule with the default retention settings.
    #[must_use]
    pub fn new(intake_path: impl Into<String>, target: impl Into<DownstreamTarget>) -> Self {
        Self {
            intake_path: intake_path.into(),
            normal_retention_days: DEFAULT_NORMAL_RETENTION_DAYS,
            error_retention_days: None,
            downstream_target: target.into(),
        }
    }

    /// Override the retention windows.
    #[must_use]
    pub const fn with_retention(mut self, normal_days: u32, error_days: Option<u32>) -> Self {
        self.normal_retention_days = normal_days;
        self.error_retention_days = error_days;
        self
    }
}

/// Ordered set of intake rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IntakeConfiguration {
    rules: Vec<PathRule>,
}

impl IntakeConfiguration {
    /// Validate and normalise the supplied rules, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] when no rules are supplied and
    /// [`ConfigError::InvalidField`] when a rule fails validation.
    pub fn new(rules: Vec<PathRule>) -> ConfigResult<Self> {
        if rules.is_empty() {
            return Err(ConfigError::Empty);
        }
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                Ok(PathRule {
                    intake_path: normalize_intake_path(index, &rule.intake_path)?,
                    normal_retention_days: validate_retention(
                        index,
                        "normal_retention_days",
                        i64::from(rule.normal_retention_days),
                    )?,
                    error_retention_days: rule
                        .error_retention_days
                        .map(|days| {
                            validate_retention(index, "error_retention_days", i64::from(days))
                        })
                        .transpose()?,
                    downstream_target: validate_target(index, rule.downstream_target.as_str())?,
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    /// Number of configured rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether any rules are configured. Always `false` for a validated configuration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a IntakeConfiguration {
    type Item = &'a PathRule;
    type IntoIter = std::slice::Iter<'a, PathRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
