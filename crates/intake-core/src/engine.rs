//! Per-notification orchestration: decode, match, guard, transition, rename, notify, quarantine.
//!
//! # Design
//! - Stateless across invocations; the only durable state is the object's own key.
//! - Each state runs at most once per invocation and failures are returned as data.
//! - The clock is read exactly once, before the rename decision.

use std::sync::Arc;

use intake_config::{IntakeConfiguration, PathRule};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::clock::Clock;
use crate::error::error_chain;
use crate::guard::is_marked;
use crate::key::{decode_object_key, object_filename, split_key};
use crate::matcher::match_rule;
use crate::outcome::{NotificationRecord, ProcessingOutcome};
use crate::ports::{Notifier, StorageGateway};
use crate::transition::compute_new_key;

const NO_MATCH_REASON: &str = "key is outside every configured intake path";
const PLACEHOLDER_REASON: &str = "key names a directory placeholder, not an object";

/// Routes newly created objects through the rename-then-notify pipeline.
#[derive(Clone)]
pub struct IntakeEngine {
    config: Arc<IntakeConfiguration>,
    storage: Arc<dyn StorageGateway>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl IntakeEngine {
    /// Assemble an engine from an explicit configuration and its collaborators.
    #[must_use]
    pub fn new(
        config: IntakeConfiguration,
        storage: Arc<dyn StorageGateway>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            notifier,
            clock,
        }
    }

    /// Configuration the engine was built with.
    #[must_use]
    pub fn configuration(&self) -> &IntakeConfiguration {
        &self.config
    }

    /// Handle one notification record. Never fails; every failure mode is in the outcome.
    pub async fn process(&self, record: &NotificationRecord) -> ProcessingOutcome {
        let key = decode_object_key(&record.object_key);
        let span = info_span!(
            "intake.process",
            key = %key,
            container = %record.container_name
        );
        self.run(record, key).instrument(span).await
    }

    async fn run(&self, record: &NotificationRecord, key: String) -> ProcessingOutcome {
        let Some(rule) = match_rule(&self.config, &key) else {
            debug!("no intake path matches; leaving object untouched");
            return ProcessingOutcome::skipped_no_match(key, NO_MATCH_REASON);
        };

        if is_marked(object_filename(&key)) {
            debug!(intake_path = %rule.intake_path, "object already processed; skipping");
            return ProcessingOutcome::skipped_already_processed(key);
        }

        let Some((nested, filename)) = split_key(&key, &rule.intake_path) else {
            return ProcessingOutcome::skipped_no_match(key, NO_MATCH_REASON);
        };
        if filename.is_empty() {
            debug!("directory placeholder; skipping");
            return ProcessingOutcome::skipped_no_match(key, PLACEHOLDER_REASON);
        }

        let timestamp = self.clock.timestamp();
        let new_key = compute_new_key(&rule.intake_path, nested, filename, &timestamp);
        if !is_marked(object_filename(&new_key)) {
            error!(
                timestamp = %timestamp,
                "clock timestamp does not form a processed marker; refusing to rename"
            );
            return ProcessingOutcome::error_rename(
                key,
                format!("rename not attempted: timestamp '{timestamp}' is not a valid marker"),
            );
        }

        if let Err(err) = self.storage.rename_object(&key, &new_key).await {
            let detail = error_chain(&err);
            warn!(new_key = %new_key, error = %detail, "rename failed");
            return ProcessingOutcome::error_rename(key, format!("rename failed: {detail}"));
        }
        info!(new_key = %new_key, "object renamed");

        self.dispatch(record, rule, key, new_key).await
    }

    async fn dispatch(
        &self,
        record: &NotificationRecord,
        rule: &PathRule,
        key: String,
        new_key: String,
    ) -> ProcessingOutcome {
        let container = if record.container_name.is_empty() {
            self.storage.container_name()
        } else {
            record.container_name.as_str()
        };

        match self
            .notifier
            .notify(&rule.downstream_target, container, &new_key)
            .await
        {
            Ok(()) => {
                info!(
                    new_key = %new_key,
                    downstream = %rule.downstream_target,
                    "downstream notified"
                );
                ProcessingOutcome::renamed(key, new_key)
            }
            Err(err) => {
                let reason = format!("downstream notification failed: {}", error_chain(&err));
                warn!(
                    new_key = %new_key,
                    downstream = %rule.downstream_target,
                    reason = %reason,
                    "dispatch not accepted; quarantining renamed object"
                );
                let moved = match self
                    .storage
                    .move_to_quarantine(&new_key, &rule.intake_path, &reason)
                    .await
                {
                    Ok(quarantined) => {
                        info!(quarantine_key = %quarantined, "object quarantined");
                        true
                    }
                    Err(quarantine_err) => {
                        error!(
                            new_key = %new_key,
                            error = %error_chain(&quarantine_err),
                            "quarantine failed; object left at renamed key"
                        );
                        false
                    }
                };
                ProcessingOutcome::error_invoke(key, new_key, reason, moved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::{NotifyResult, StorageError, StorageResult};
    use crate::outcome::OutcomeAction;
    use async_trait::async_trait;
    use intake_config::{DownstreamTarget, PathRule};
    use std::sync::Mutex;

    struct LoggingStorage {
        config: IntakeConfiguration,
        renames: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl StorageGateway for LoggingStorage {
        async fn rename_object(&self, key: &str, new_key: &str) -> StorageResult<()> {
            if self.fail {
                return Err(StorageError::NotFound { key: key.into() });
            }
            self.renames
                .lock()
                .expect("renames lock")
                .push((key.to_string(), new_key.to_string()));
            Ok(())
        }

        async fn move_to_quarantine(
            &self,
            key: &str,
            _scope_path: &str,
            _reason: &str,
        ) -> StorageResult<String> {
            Ok(key.to_string())
        }

        fn configuration(&self) -> &IntakeConfiguration {
            &self.config
        }

        fn container_name(&self) -> &str {
            "fallback"
        }
    }

    struct AcceptAll;

    #[async_trait]
    impl Notifier for AcceptAll {
        async fn notify(
            &self,
            _target: &DownstreamTarget,
            _container_name: &str,
            _new_key: &str,
        ) -> NotifyResult<()> {
            Ok(())
        }
    }

    fn engine(clock: &str, fail: bool) -> (IntakeEngine, Arc<LoggingStorage>) {
        let config = IntakeConfiguration::new(vec![PathRule::new("in", "t")])
            .expect("valid configuration");
        let storage = Arc::new(LoggingStorage {
            config: config.clone(),
            renames: Mutex::new(Vec::new()),
            fail,
        });
        let engine = IntakeEngine::new(
            config,
            storage.clone(),
            Arc::new(AcceptAll),
            Arc::new(FixedClock::new(clock)),
        );
        (engine, storage)
    }

    #[tokio::test]
    async fn renames_encoded_key_after_decoding() {
        let (engine, storage) = engine("2026-02-22T10:30:00.000Z", false);
        let outcome = engine
            .process(&NotificationRecord::new("bucket", "in/my+report%281%29.csv"))
            .await;
        assert_eq!(outcome.action, OutcomeAction::Renamed);
        assert_eq!(outcome.original_key, "in/my report(1).csv");
        let renames = storage.renames.lock().expect("renames lock").clone();
        assert_eq!(
            renames,
            vec![(
                "in/my report(1).csv".to_string(),
                "in/2026-02-22T10:30:00.000Z-my report(1).csv".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn malformed_clock_never_renames() {
        let (engine, storage) = engine("yesterday", false);
        let outcome = engine
            .process(&NotificationRecord::new("bucket", "in/a.txt"))
            .await;
        assert_eq!(outcome.action, OutcomeAction::ErrorRename);
        assert!(!outcome.success);
        assert!(storage.renames.lock().expect("renames lock").is_empty());
    }

    #[tokio::test]
    async fn directory_placeholder_is_left_alone() {
        let (engine, storage) = engine("2026-02-22T10:30:00.000Z", false);
        let outcome = engine
            .process(&NotificationRecord::new("bucket", "in/sub/"))
            .await;
        assert_eq!(outcome.action, OutcomeAction::SkippedNoMatch);
        assert!(outcome.success);
        assert_eq!(outcome.reason.as_deref(), Some(PLACEHOLDER_REASON));
        assert_ne!(PLACEHOLDER_REASON, NO_MATCH_REASON);
        assert!(storage.renames.lock().expect("renames lock").is_empty());
    }

    #[tokio::test]
    async fn rename_failure_carries_error_chain() {
        let (engine, _storage) = engine("2026-02-22T10:30:00.000Z", true);
        let outcome = engine
            .process(&NotificationRecord::new("bucket", "in/a.txt"))
            .await;
        assert_eq!(outcome.action, OutcomeAction::ErrorRename);
        assert_eq!(outcome.reason.as_deref(), Some("rename failed: object not found"));
        assert_eq!(outcome.new_key, None);
    }
}
