//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Collector registration stays private; callers only record events.
//! - Outcome counters are labelled by the outcome action name.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry for intake runs.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    outcomes_total: IntCounterVec,
    batches_total: IntCounter,
    batch_records: IntGauge,
    malformed_records_total: IntCounter,
}

/// Point-in-time view of the batch counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Batches processed since start.
    pub batches_total: u64,
    /// Records in the most recent batch.
    pub batch_records: i64,
    /// Records skipped because they could not be parsed.
    pub malformed_records_total: u64,
}

impl Metrics {
    /// Construct a registry with the intake collectors registered.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] if a collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let outcomes_total = IntCounterVec::new(
            Opts::new("intake_outcomes_total", "Processed records by outcome action"),
            &["action"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "intake_outcomes_total",
            source,
        })?;
        let batches_total = IntCounter::with_opts(Opts::new(
            "intake_batches_total",
            "Notification batches processed",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "intake_batches_total",
            source,
        })?;
        let batch_records = IntGauge::with_opts(Opts::new(
            "intake_batch_records",
            "Records in the most recent batch",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "intake_batch_records",
            source,
        })?;
        let malformed_records_total = IntCounter::with_opts(Opts::new(
            "intake_malformed_records_total",
            "Records skipped because they could not be parsed",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "intake_malformed_records_total",
            source,
        })?;

        register(&registry, "intake_outcomes_total", &outcomes_total)?;
        register(&registry, "intake_batches_total", &batches_total)?;
        register(&registry, "intake_batch_records", &batch_records)?;
        register(
            &registry,
            "intake_malformed_records_total",
            &malformed_records_total,
        )?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                outcomes_total,
                batches_total,
                batch_records,
                malformed_records_total,
            }),
        })
    }

    /// Count one processed record under `action`.
    pub fn record_outcome(&self, action: &str) {
        self.inner
            .outcomes_total
            .with_label_values(&[action])
            .inc();
    }

    /// Records counted under `action` so far.
    #[must_use]
    pub fn outcome_total(&self, action: &str) -> u64 {
        self.inner
            .outcomes_total
            .with_label_values(&[action])
            .get()
    }

    /// Start a batch of `records` records.
    pub fn begin_batch(&self, records: usize) {
        self.inner.batches_total.inc();
        self.inner
            .batch_records
            .set(i64::try_from(records).unwrap_or(i64::MAX));
    }

    /// Count one record that could not be parsed.
    pub fn inc_malformed_record(&self) {
        self.inner.malformed_records_total.inc();
    }

    /// Render the registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] if encoding fails or the output is not UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the batch counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_total: self.inner.batches_total.get(),
            batch_records: self.inner.batch_records.get(),
            malformed_records_total: self.inner.malformed_records_total.get(),
        }
    }
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_outcomes_by_action() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.record_outcome("renamed");
        metrics.record_outcome("renamed");
        metrics.record_outcome("error-invoke");
        assert_eq!(metrics.outcome_total("renamed"), 2);
        assert_eq!(metrics.outcome_total("error-invoke"), 1);
        assert_eq!(metrics.outcome_total("skipped-no-match"), 0);
        Ok(())
    }

    #[test]
    fn snapshot_tracks_batches() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.begin_batch(3);
        metrics.begin_batch(5);
        metrics.inc_malformed_record();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                batches_total: 2,
                batch_records: 5,
                malformed_records_total: 1,
            }
        );
        Ok(())
    }

    #[test]
    fn render_exposes_collectors() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.begin_batch(1);
        metrics.record_outcome("renamed");
        let rendered = metrics.render()?;
        assert!(rendered.contains("intake_batches_total 1"));
        assert!(rendered.contains("intake_outcomes_total{action=\"renamed\"} 1"));
        Ok(())
    }

    #[test]
    fn snapshot_serialises() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let metrics = Metrics::new()?;
        let value = serde_json::to_value(metrics.snapshot())?;
        assert_eq!(value["batches_total"], 0);
        Ok(())
    }
}
