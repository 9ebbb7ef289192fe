//! # Design
//!
//! - Records run through the engine with bounded parallelism; results keep input order.
//! - The engine is stateless per record, so concurrent invocations never share state
//!   beyond the storage and notifier ports.

use futures_util::{StreamExt, stream};
use intake_core::{IntakeEngine, NotificationRecord, ProcessingOutcome};
use intake_telemetry::Metrics;
use serde::Serialize;
use tracing::info;

use crate::records::{MalformedRecord, ParsedBatch};

/// Summary printed after a batch completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Records handed to the engine.
    pub processed: usize,
    /// One outcome per processed record, in input order.
    pub outcomes: Vec<ProcessingOutcome>,
    /// Records skipped before reaching the engine.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub malformed: Vec<MalformedRecord>,
}

impl BatchReport {
    /// Number of outcomes that ended in an error.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|outcome| !outcome.success).count()
    }
}

/// Run every record through `engine`, at most `concurrency` at a time.
pub async fn process_batch(
    engine: &IntakeEngine,
    records: Vec<NotificationRecord>,
    concurrency: usize,
    metrics: &Metrics,
) -> Vec<ProcessingOutcome> {
    metrics.begin_batch(records.len());
    stream::iter(records)
        .map(|record| async move {
            let outcome = engine.process(&record).await;
            metrics.record_outcome(outcome.action.as_str());
            outcome
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Process a parsed batch and assemble its report.
pub async fn run_batch(
    engine: &IntakeEngine,
    batch: ParsedBatch,
    concurrency: usize,
    metrics: &Metrics,
) -> BatchReport {
    let ParsedBatch { records, malformed } = batch;
    for _ in &malformed {
        metrics.inc_malformed_record();
    }
    let outcomes = process_batch(engine, records, concurrency, metrics).await;
    let report = BatchReport {
        processed: outcomes.len(),
        outcomes,
        malformed,
    };
    info!(
        processed = report.processed,
        failures = report.failures(),
        malformed = report.malformed.len(),
        "batch complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{FixedClock, OutcomeAction, StorageGateway};
    use intake_test_support::fixtures::{FIXED_TIMESTAMP, TEST_CONTAINER, rules};
    use intake_test_support::mocks::{InMemoryStorage, ScriptedNotifier};
    use std::sync::Arc;

    fn engine(storage: Arc<InMemoryStorage>) -> IntakeEngine {
        IntakeEngine::new(
            storage.configuration().clone(),
            storage,
            Arc::new(ScriptedNotifier::accepting()),
            Arc::new(FixedClock::new(FIXED_TIMESTAMP)),
        )
    }

    #[tokio::test]
    async fn outcomes_keep_input_order() -> anyhow::Result<()> {
        let storage = Arc::new(InMemoryStorage::new(rules(&[("in", "T")])?));
        let keys: Vec<String> = (0..20).map(|n| format!("in/file-{n}.txt")).collect();
        for key in &keys {
            storage.put(key);
        }
        let mut records: Vec<NotificationRecord> = keys
            .iter()
            .map(|key| NotificationRecord::new(TEST_CONTAINER, key.as_str()))
            .collect();
        records.push(NotificationRecord::new(TEST_CONTAINER, "elsewhere/x"));
        let metrics = Metrics::new()?;

        let outcomes = process_batch(&engine(storage), records, 4, &metrics).await;

        let originals: Vec<&str> = outcomes
            .iter()
            .map(|outcome| outcome.original_key.as_str())
            .collect();
        let mut expected: Vec<&str> = keys.iter().map(String::as_str).collect();
        expected.push("elsewhere/x");
        assert_eq!(originals, expected);
        assert_eq!(metrics.outcome_total("renamed"), 20);
        assert_eq!(metrics.outcome_total("skipped-no-match"), 1);
        assert_eq!(metrics.snapshot().batch_records, 21);
        Ok(())
    }

    #[tokio::test]
    async fn report_counts_failures_and_malformed() -> anyhow::Result<()> {
        let storage = Arc::new(InMemoryStorage::new(rules(&[("in", "T")])?));
        let metrics = Metrics::new()?;
        let batch = ParsedBatch {
            records: vec![NotificationRecord::new(TEST_CONTAINER, "in/missing.txt")],
            malformed: vec![MalformedRecord {
                index: 1,
                reason: "missing field `s3`".to_string(),
            }],
        };

        let report = run_batch(&engine(storage), batch, 0, &metrics).await;

        assert_eq!(report.processed, 1);
        assert_eq!(report.outcomes[0].action, OutcomeAction::ErrorRename);
        assert_eq!(report.failures(), 1);
        assert_eq!(metrics.snapshot().malformed_records_total, 1);
        let json = serde_json::to_value(&report)?;
        assert_eq!(json["processed"], 1);
        assert_eq!(json["outcomes"][0]["action"], "error-rename");
        assert_eq!(json["malformed"][0]["index"], 1);
        Ok(())
    }
}
