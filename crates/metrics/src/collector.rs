use std::sync::Arc;
use std::time::Duration;

use airdrop_types::{AttemptObserver, AttemptRecord, BatchStatus, RunReport};
use prometheus::{Encoder, Registry, TextEncoder};

use crate::metrics::*;

/// Metrics collector for the airdrop distributor
pub struct MetricsCollector {
    registry: Registry,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Self {
        let registry = Registry::new();
        Self { registry }
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    /// Registry for collectors registered outside the global set
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // RUN METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record the start of a run over `eligible` recipients
    pub fn record_run_started(&self, eligible: usize) {
        RUNS_STARTED.inc();
        ELIGIBLE_RECIPIENTS.set(eligible as i64);
    }

    /// Record the terminal outcome of a run
    pub fn record_report(&self, report: &RunReport) {
        RECIPIENTS_SUCCEEDED.inc_by(report.succeeded_count() as u64);
        RECIPIENTS_FAILED.inc_by(report.failed_count() as u64);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BATCH METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record how a batch ended
    pub fn record_batch(&self, size: usize, status: BatchStatus) {
        BATCHES.with_label_values(&[status.as_str()]).inc();
        BATCH_MEMBERS.inc_by(size as u64);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ATTEMPT METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Record one per-recipient attempt
    pub fn record_attempt(&self, record: &AttemptRecord) {
        ATTEMPTS
            .with_label_values(&[record.pass.as_str(), record.outcome.as_str()])
            .inc();

        if record.attempt == 1 && record.pass == airdrop_types::RetryPass::Escalation {
            RECIPIENTS_ESCALATED.inc();
        }
    }

    /// Record ledger submission latency
    pub fn record_submission_latency(&self, latency: Duration) {
        SUBMISSION_LATENCY.observe(latency.as_millis() as f64);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXPORT
    // ═══════════════════════════════════════════════════════════════════════════

    /// Export metrics in Prometheus text format
    pub fn export_metrics(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut metric_families = prometheus::gather();
        metric_families.extend(self.registry.gather());

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::EncodingError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::EncodingError(e.to_string()))
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds the distributor's attempt stream into the Prometheus counters
#[derive(Clone)]
pub struct MetricsObserver {
    collector: Arc<MetricsCollector>,
}

impl MetricsObserver {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }
}

impl AttemptObserver for MetricsObserver {
    fn on_attempt(&self, record: &AttemptRecord) {
        self.collector.record_attempt(record);
    }

    fn on_batch(&self, _batch_index: usize, size: usize, status: BatchStatus) {
        self.collector.record_batch(size, status);
    }

    fn on_submission(&self, elapsed: Duration, _succeeded: bool) {
        self.collector.record_submission_latency(elapsed);
    }

    fn on_run_started(&self, eligible: usize) {
        self.collector.record_run_started(eligible);
    }

    fn on_run_finished(&self, report: &RunReport) {
        self.collector.record_report(report);
    }
}

/// Metrics error types
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("encoding error: {0}")]
    EncodingError(String),
    #[error("registry error: {0}")]
    RegistryError(String),
}

impl From<prometheus::Error> for MetricsError {
    fn from(err: prometheus::Error) -> Self {
        MetricsError::RegistryError(err.to_string())
    }
}
