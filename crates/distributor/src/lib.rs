//! Batched token airdrop distribution
//!
//! Recipients are filtered, split into batches and each batch is submitted
//! as one atomic operation. Members of a batch that does not deliver are
//! retried one by one, and recipients that exhaust that fallback pass get a
//! final escalation pass before being reported as permanently failed.

pub mod batcher;
pub mod config;
pub mod coordinator;
pub mod escalator;
pub mod filter;
pub mod observer;
pub mod retrier;
pub mod submitter;

#[cfg(test)]
mod mock;

// Re-export main types
pub use batcher::batch_recipients;
pub use config::DistributorConfig;
pub use coordinator::{
    BatchResult, BuilderError, DistributorError, RunCoordinator, RunCoordinatorBuilder,
};
pub use escalator::{EscalationOutcome, FailureEscalator};
pub use filter::{eligible_recipients, load_recipients, parse_recipients};
pub use observer::{BatchEvent, FanoutObserver, RecordingObserver};
pub use retrier::{RecipientRetrier, RetryOutcome};
pub use submitter::{
    submit_with_timeout, BatchOutcome, BatchSubmitter, PendingReason, PendingRecipient,
};
