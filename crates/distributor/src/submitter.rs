use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use airdrop_ledger::{Ledger, TransferBuilder};
use airdrop_types::{
    Address, AttemptObserver, Batch, BatchStatus, BuildError, SubmissionError, SubmissionReceipt,
    UnitOfWork,
};
use tracing::{info, warn};

/// Submit `units` atomically, turning an expired deadline into a
/// `SubmissionError::Timeout`
pub async fn submit_with_timeout(
    ledger: &dyn Ledger,
    units: Vec<UnitOfWork>,
    timeout: Duration,
    observer: &dyn AttemptObserver,
) -> Result<SubmissionReceipt, SubmissionError> {
    let started = Instant::now();
    let result = match tokio::time::timeout(timeout, ledger.submit(units)).await {
        Ok(result) => result,
        Err(_) => Err(SubmissionError::Timeout {
            after_ms: timeout.as_millis() as u64,
        }),
    };
    observer.on_submission(started.elapsed(), result.is_ok());
    result
}

/// Why a recipient still needs individual handling after its batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingReason {
    /// Its unit could not be built, so it was left out of the batch
    BuildFailed(BuildError),

    /// The batch carrying its unit was rejected as a whole
    BatchRejected(SubmissionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecipient {
    /// Position of the record in the eligible list
    pub position: usize,
    pub recipient: Address,
    pub reason: PendingReason,
}

/// Result of submitting one batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub index: usize,
    pub status: BatchStatus,
    pub receipt: Option<SubmissionReceipt>,

    /// Recipients whose units the confirmed batch submission carried
    pub delivered: Vec<Address>,

    /// Recipients handed to the fallback pass, in batch order
    pub pending: Vec<PendingRecipient>,
}

/// Builds every member's unit and submits the built ones as one atomic
/// operation
pub struct BatchSubmitter {
    builder: Arc<dyn TransferBuilder>,
    ledger: Arc<dyn Ledger>,
    observer: Arc<dyn AttemptObserver>,
    submit_timeout: Duration,
}

impl BatchSubmitter {
    pub fn new(
        builder: Arc<dyn TransferBuilder>,
        ledger: Arc<dyn Ledger>,
        observer: Arc<dyn AttemptObserver>,
        submit_timeout: Duration,
    ) -> Self {
        Self {
            builder,
            ledger,
            observer,
            submit_timeout,
        }
    }

    pub async fn submit_batch(&self, batch: &Batch) -> BatchOutcome {
        let mut units = Vec::with_capacity(batch.len());
        let mut build_failures = HashMap::new();

        for (position, recipient) in batch.positioned() {
            match self.builder.build_transfer(recipient).await {
                Ok(unit) => units.push(unit),
                Err(e) => {
                    warn!(
                        batch = batch.index(),
                        recipient = %recipient,
                        error = %e,
                        "Failed to build transfer, leaving recipient out of batch"
                    );
                    build_failures.insert(position, e);
                }
            }
        }

        if units.is_empty() {
            warn!(
                batch = batch.index(),
                members = batch.len(),
                "No member of the batch could be built, skipping batch submission"
            );
            self.observer
                .on_batch(batch.index(), batch.len(), BatchStatus::NothingSubmitted);
            return BatchOutcome {
                index: batch.index(),
                status: BatchStatus::NothingSubmitted,
                receipt: None,
                delivered: Vec::new(),
                pending: Self::pending(batch, build_failures, None),
            };
        }

        let included: Vec<Address> = units.iter().map(|u| u.recipient().clone()).collect();
        let result = submit_with_timeout(
            self.ledger.as_ref(),
            units,
            self.submit_timeout,
            self.observer.as_ref(),
        )
        .await;

        match result {
            Ok(receipt) => {
                info!(
                    batch = batch.index(),
                    signature = %receipt.signature,
                    delivered = included.len(),
                    "Batch transaction succeeded"
                );
                self.observer
                    .on_batch(batch.index(), batch.len(), BatchStatus::Confirmed);

                BatchOutcome {
                    index: batch.index(),
                    status: BatchStatus::Confirmed,
                    delivered: included,
                    receipt: Some(receipt),
                    pending: Self::pending(batch, build_failures, None),
                }
            }
            Err(e) => {
                warn!(
                    batch = batch.index(),
                    error = %e,
                    members = included.len(),
                    "Batch transaction failed, retrying members individually"
                );
                self.observer
                    .on_batch(batch.index(), batch.len(), BatchStatus::Rejected);

                BatchOutcome {
                    index: batch.index(),
                    status: BatchStatus::Rejected,
                    receipt: None,
                    delivered: Vec::new(),
                    pending: Self::pending(batch, build_failures, Some(e)),
                }
            }
        }
    }

    /// Members left for individual handling, in batch order.
    ///
    /// Build failures are always pending; built members only when the batch
    /// was rejected.
    fn pending(
        batch: &Batch,
        mut build_failures: HashMap<usize, BuildError>,
        rejection: Option<SubmissionError>,
    ) -> Vec<PendingRecipient> {
        batch
            .positioned()
            .filter_map(|(position, recipient)| {
                let reason = match build_failures.remove(&position) {
                    Some(e) => PendingReason::BuildFailed(e),
                    None => PendingReason::BatchRejected(rejection.clone()?),
                };
                Some(PendingRecipient {
                    position,
                    recipient: recipient.clone(),
                    reason,
                })
            })
            .collect()
    }
}
