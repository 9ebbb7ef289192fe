//! Intake rule selection.

use intake_config::{IntakeConfiguration, PATH_SEPARATOR, PathRule};

/// First rule, in declaration order, whose intake path followed by a separator prefixes `key`.
///
/// This is deliberately first-match rather than longest-match: with rules `a` then `a/b`,
/// a key under `a/b/` resolves to `a`.
#[must_use]
pub fn match_rule<'c>(config: &'c IntakeConfiguration, key: &str) -> Option<&'c PathRule> {
    config.rules().iter().find(|rule| {
        key.strip_prefix(rule.intake_path.as_str())
            .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
    })
}
