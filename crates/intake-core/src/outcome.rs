//! Input record and tagged result of one engine invocation.

use serde::{Deserialize, Serialize};

/// One object-created notification as handed over by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Key exactly as delivered, possibly percent-encoded with `+` for spaces.
    pub object_key: String,
    /// Container (bucket) holding the object.
    pub container_name: String,
}

impl NotificationRecord {
    /// Build a record from raw transport values.
    #[must_use]
    pub fn new(container_name: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            object_key: object_key.into(),
            container_name: container_name.into(),
        }
    }
}

/// Terminal state reached by an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeAction {
    /// Key is outside every intake path.
    SkippedNoMatch,
    /// Filename already carries the processed marker.
    SkippedAlreadyProcessed,
    /// Object renamed and downstream notified.
    Renamed,
    /// Rename did not complete.
    ErrorRename,
    /// Rename completed but the downstream dispatch was not accepted.
    ErrorInvoke,
}

impl OutcomeAction {
    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SkippedNoMatch => "skipped-no-match",
            Self::SkippedAlreadyProcessed => "skipped-already-processed",
            Self::Renamed => "renamed",
            Self::ErrorRename => "error-rename",
            Self::ErrorInvoke => "error-invoke",
        }
    }
}

/// Everything an invocation reports back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOutcome {
    /// Whether the invocation ended without an error.
    pub success: bool,
    /// Terminal state.
    pub action: OutcomeAction,
    /// Human-readable explanation for skips and failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Decoded key the invocation started from.
    pub original_key: String,
    /// Key the object was renamed to, when a rename happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_key: Option<String>,
    /// Whether the downstream accepted the dispatch, when one was attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstream_notified: Option<bool>,
    /// Whether the object reached quarantine, when quarantine was attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_to_quarantine: Option<bool>,
}

impl ProcessingOutcome {
    pub(crate) fn skipped_no_match(original_key: String, reason: &str) -> Self {
        Self {
            success: true,
            action: OutcomeAction::SkippedNoMatch,
            reason: Some(reason.to_string()),
            original_key,
            new_key: None,
            downstream_notified: None,
            moved_to_quarantine: None,
        }
    }

    pub(crate) fn skipped_already_processed(original_key: String) -> Self {
        Self {
            success: true,
            action: OutcomeAction::SkippedAlreadyProcessed,
            reason: Some("filename already carries the processed marker".to_string()),
            original_key,
            new_key: None,
            downstream_notified: None,
            moved_to_quarantine: None,
        }
    }

    pub(crate) const fn renamed(original_key: String, new_key: String) -> Self {
        Self {
            success: true,
            action: OutcomeAction::Renamed,
            reason: None,
            original_key,
            new_key: Some(new_key),
            downstream_notified: Some(true),
            moved_to_quarantine: None,
        }
    }

    pub(crate) const fn error_rename(original_key: String, reason: String) -> Self {
        Self {
            success: false,
            action: OutcomeAction::ErrorRename,
            reason: Some(reason),
            original_key,
            new_key: None,
            downstream_notified: None,
            moved_to_quarantine: None,
        }
    }

    pub(crate) const fn error_invoke(
        original_key: String,
        new_key: String,
        reason: String,
        moved_to_quarantine: bool,
    ) -> Self {
        Self {
            success: false,
            action: OutcomeAction::ErrorInvoke,
            reason: Some(reason),
            original_key,
            new_key: Some(new_key),
            downstream_notified: Some(false),
            moved_to_quarantine: Some(moved_to_quarantine),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialises_with_wire_names_and_omits_absent_fields() -> serde_json::Result<()> {
        let outcome = ProcessingOutcome::renamed(
            "in/data.json".into(),
            "in/2026-02-22T10:30:00.000Z-data.json".into(),
        );
        assert_eq!(
            serde_json::to_value(&outcome)?,
            json!({
                "success": true,
                "action": "renamed",
                "originalKey": "in/data.json",
                "newKey": "in/2026-02-22T10:30:00.000Z-data.json",
                "downstreamNotified": true
            })
        );
        Ok(())
    }

    #[test]
    fn action_labels_match_serde_tags() -> serde_json::Result<()> {
        for action in [
            OutcomeAction::SkippedNoMatch,
            OutcomeAction::SkippedAlreadyProcessed,
            OutcomeAction::Renamed,
            OutcomeAction::ErrorRename,
            OutcomeAction::ErrorInvoke,
        ] {
            assert_eq!(serde_json::to_value(action)?, json!(action.as_str()));
        }
        Ok(())
    }

    #[test]
    fn error_invoke_reports_quarantine_result() {
        let outcome = ProcessingOutcome::error_invoke(
            "in/a".into(),
            "in/2026-02-22T10:30:00.000Z-a".into(),
            "boom".into(),
            false,
        );
        assert!(!outcome.success);
        assert_eq!(outcome.downstream_notified, Some(false));
        assert_eq!(outcome.moved_to_quarantine, Some(false));
    }
}
