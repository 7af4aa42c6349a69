use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::{Address, BuildError, RunReport, SubmissionError, SubmissionReceipt};

/// Retry pass an attempt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPass {
    /// Individual resubmission after the recipient's batch did not deliver
    Fallback,

    /// Final pass over recipients that exhausted the fallback pass
    Escalation,
}

impl RetryPass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryPass::Fallback => "fallback",
            RetryPass::Escalation => "escalation",
        }
    }
}

impl fmt::Display for RetryPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    TransientFailure,
    BuildFailure,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Succeeded => "succeeded",
            AttemptOutcome::TransientFailure => "transient_failure",
            AttemptOutcome::BuildFailure => "build_failure",
        }
    }
}

/// Result of one build-then-submit attempt for one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    Delivered(SubmissionReceipt),
    BuildFailed(BuildError),
    SubmissionFailed(SubmissionError),
}

impl AttemptResult {
    pub fn outcome(&self) -> AttemptOutcome {
        match self {
            AttemptResult::Delivered(_) => AttemptOutcome::Succeeded,
            AttemptResult::BuildFailed(_) => AttemptOutcome::BuildFailure,
            AttemptResult::SubmissionFailed(_) => AttemptOutcome::TransientFailure,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, AttemptResult::Delivered(_))
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            AttemptResult::Delivered(_) => None,
            AttemptResult::BuildFailed(e) => Some(e.to_string()),
            AttemptResult::SubmissionFailed(e) => Some(e.to_string()),
        }
    }
}

/// Log record of one attempt; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub recipient: Address,
    pub pass: RetryPass,
    /// 1-based attempt number within the pass
    pub attempt: u32,
    pub outcome: AttemptOutcome,
    pub error: Option<String>,
}

impl AttemptRecord {
    pub fn new(recipient: Address, pass: RetryPass, attempt: u32, result: &AttemptResult) -> Self {
        Self {
            recipient,
            pass,
            attempt,
            outcome: result.outcome(),
            error: result.error_message(),
        }
    }
}

/// How a batch submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// The atomic submission executed
    Confirmed,

    /// The atomic submission was rejected as a whole
    Rejected,

    /// Every member failed to build; nothing was sent
    NothingSubmitted,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Confirmed => "confirmed",
            BatchStatus::Rejected => "rejected",
            BatchStatus::NothingSubmitted => "nothing_submitted",
        }
    }
}

/// Receives run, batch and attempt events as they happen
pub trait AttemptObserver: Send + Sync {
    fn on_attempt(&self, record: &AttemptRecord);

    fn on_run_started(&self, _eligible: usize) {}

    fn on_run_finished(&self, _report: &RunReport) {}

    fn on_batch(&self, _batch_index: usize, _size: usize, _status: BatchStatus) {}

    fn on_submission(&self, _elapsed: Duration, _succeeded: bool) {}
}

/// Observer that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AttemptObserver for NoopObserver {
    fn on_attempt(&self, _record: &AttemptRecord) {}
}
