use std::path::Path;
use std::sync::Arc;

use airdrop_ledger::{Ledger, TransferBuilder};
use airdrop_metrics::{ErrorContext, RunId, RunSpan};
use airdrop_types::{
    Address, AttemptObserver, Batch, BatchStatus, FailureSet, LoadError, NoopObserver,
    RecipientRecord, RetryPass, RunReport,
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn, Instrument};

use crate::batcher::batch_recipients;
use crate::config::DistributorConfig;
use crate::escalator::FailureEscalator;
use crate::filter::{eligible_recipients, load_recipients};
use crate::retrier::RecipientRetrier;
use crate::submitter::BatchSubmitter;

/// Distributor errors
#[derive(Debug, Error)]
pub enum DistributorError {
    #[error("failed to load recipients: {0}")]
    Load(#[from] LoadError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Builder error
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("missing required field: {field}")]
    MissingField { field: String },
}

/// A batch after its submission and the fallback pass over its pending
/// members
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub index: usize,
    pub status: BatchStatus,

    /// Delivered by the batch submission or the fallback pass
    pub delivered: Vec<Address>,

    /// Exhausted the fallback pass
    pub failures: FailureSet,
}

/// Builder for RunCoordinator
pub struct RunCoordinatorBuilder {
    transfer_builder: Option<Arc<dyn TransferBuilder>>,
    ledger: Option<Arc<dyn Ledger>>,
    observer: Arc<dyn AttemptObserver>,
    config: DistributorConfig,
}

impl RunCoordinatorBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            transfer_builder: None,
            ledger: None,
            observer: Arc::new(NoopObserver),
            config: DistributorConfig::default(),
        }
    }

    /// Set the transfer builder
    pub fn with_transfer_builder(mut self, transfer_builder: Arc<dyn TransferBuilder>) -> Self {
        self.transfer_builder = Some(transfer_builder);
        self
    }

    /// Set the ledger
    pub fn with_ledger(mut self, ledger: Arc<dyn Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Set the observer receiving attempt and batch events
    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the distributor configuration
    pub fn with_config(mut self, config: DistributorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the RunCoordinator, validating that all required fields are set
    pub fn build(self) -> Result<RunCoordinator, BuilderError> {
        let transfer_builder = self
            .transfer_builder
            .ok_or_else(|| BuilderError::MissingField {
                field: "transfer_builder".to_string(),
            })?;

        let ledger = self.ledger.ok_or_else(|| BuilderError::MissingField {
            field: "ledger".to_string(),
        })?;

        Ok(RunCoordinator::new(
            transfer_builder,
            ledger,
            self.observer,
            self.config,
        ))
    }
}

impl Default for RunCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a whole distribution: filter, batch, submit, fall back to
/// individual retries, then escalate what is left
pub struct RunCoordinator {
    config: DistributorConfig,
    submitter: BatchSubmitter,
    retrier: Arc<RecipientRetrier>,
    escalator: FailureEscalator,
    observer: Arc<dyn AttemptObserver>,
}

impl RunCoordinator {
    /// Create a new builder for constructing a RunCoordinator
    pub fn builder() -> RunCoordinatorBuilder {
        RunCoordinatorBuilder::new()
    }

    pub fn new(
        transfer_builder: Arc<dyn TransferBuilder>,
        ledger: Arc<dyn Ledger>,
        observer: Arc<dyn AttemptObserver>,
        config: DistributorConfig,
    ) -> Self {
        let submitter = BatchSubmitter::new(
            transfer_builder.clone(),
            ledger.clone(),
            observer.clone(),
            config.submit_timeout,
        );

        let retrier = Arc::new(RecipientRetrier::new(
            transfer_builder,
            ledger,
            observer.clone(),
            config.max_retries,
            config.backoff.clone(),
            config.submit_timeout,
        ));

        let escalator = FailureEscalator::new(retrier.clone());

        Self {
            config,
            submitter,
            retrier,
            escalator,
            observer,
        }
    }

    pub fn config(&self) -> &DistributorConfig {
        &self.config
    }

    /// Load the snapshot at `path` and distribute to it.
    ///
    /// Loading is the only fatal failure; once recipients are loaded a
    /// report is always produced.
    pub async fn run_from_path(&self, path: &Path) -> Result<RunReport, DistributorError> {
        let run_id = RunId::new();
        let records = load_recipients(path).with_run_id(run_id)?;
        Ok(self.run_with_id(run_id, records).await)
    }

    /// Distribute to already loaded records
    pub async fn run<I, R>(&self, records: I) -> RunReport
    where
        I: IntoIterator<Item = R>,
        R: Into<RecipientRecord>,
    {
        self.run_with_id(RunId::new(), records).await
    }

    async fn run_with_id<I, R>(&self, run_id: RunId, records: I) -> RunReport
    where
        I: IntoIterator<Item = R>,
        R: Into<RecipientRecord>,
    {
        let started_at = Utc::now();
        let records: Vec<RecipientRecord> = records.into_iter().map(Into::into).collect();
        let total_loaded = records.len();
        let eligible = eligible_recipients(records);

        let span = RunSpan::new(run_id, eligible.len()).span();
        self.distribute(run_id, started_at, total_loaded, eligible)
            .instrument(span)
            .await
    }

    async fn distribute(
        &self,
        run_id: RunId,
        started_at: DateTime<Utc>,
        total_loaded: usize,
        eligible: Vec<RecipientRecord>,
    ) -> RunReport {
        let total_eligible = eligible.len();
        info!(
            total_loaded,
            eligible = total_eligible,
            batch_size = self.config.batch_size.get(),
            max_retries = self.config.max_retries,
            "Starting airdrop execution"
        );
        self.observer.on_run_started(total_eligible);

        let batches = batch_recipients(eligible, self.config.batch_size);
        let batch_count = batches.len();

        let mut succeeded = Vec::with_capacity(total_eligible);
        let mut failures = FailureSet::new();
        let mut batches_confirmed = 0;

        for batch in &batches {
            let result = self.process_batch(batch).await;
            if result.status == BatchStatus::Confirmed {
                batches_confirmed += 1;
            }
            succeeded.extend(result.delivered);
            failures.merge(result.failures);
        }

        let escalation = self.escalator.escalate(failures).await;
        succeeded.extend(escalation.recovered.iter().cloned());

        let report = RunReport {
            run_id: run_id.as_str(),
            started_at,
            finished_at: Utc::now(),
            total_loaded,
            total_eligible,
            batches: batch_count,
            batches_confirmed,
            succeeded,
            recovered_in_escalation: escalation.recovered,
            permanently_failed: escalation.permanently_failed,
        };

        if report.is_complete_success() {
            info!(
                succeeded = report.succeeded_count(),
                "Airdrop execution completed"
            );
        } else {
            warn!(
                succeeded = report.succeeded_count(),
                failed = report.failed_count(),
                "Airdrop execution completed with permanently failed recipients"
            );
        }

        self.observer.on_run_finished(&report);
        report
    }

    /// Submit one batch, then run the fallback pass over every member it did
    /// not deliver
    pub async fn process_batch(&self, batch: &Batch) -> BatchResult {
        let outcome = self.submitter.submit_batch(batch).await;
        let mut delivered = outcome.delivered;
        let mut failures = FailureSet::new();

        for pending in outcome.pending {
            let result = self
                .retrier
                .retry(&pending.recipient, RetryPass::Fallback)
                .await;

            if result.is_delivered() {
                delivered.push(pending.recipient);
            } else {
                failures.insert(pending.position, pending.recipient);
            }
        }

        BatchResult {
            index: outcome.index,
            status: outcome.status,
            delivered,
            failures,
        }
    }
}
