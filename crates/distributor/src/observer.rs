use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use airdrop_types::{Address, AttemptObserver, AttemptRecord, BatchStatus, RetryPass, RunReport};

/// Batch event captured by `RecordingObserver`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchEvent {
    pub index: usize,
    pub size: usize,
    pub status: BatchStatus,
}

#[derive(Debug, Default)]
struct Recorded {
    attempts: Vec<AttemptRecord>,
    batches: Vec<BatchEvent>,
    submissions: usize,
    runs_finished: usize,
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    recorded: Mutex<Recorded>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn attempts(&self) -> Vec<AttemptRecord> {
        self.recorded().attempts.clone()
    }

    /// Attempts made for `recipient` in `pass`
    pub fn attempts_for(&self, recipient: &Address, pass: RetryPass) -> Vec<AttemptRecord> {
        self.recorded()
            .attempts
            .iter()
            .filter(|r| &r.recipient == recipient && r.pass == pass)
            .cloned()
            .collect()
    }

    /// Attempts made in `pass` across all recipients
    pub fn attempts_in(&self, pass: RetryPass) -> usize {
        self.recorded()
            .attempts
            .iter()
            .filter(|r| r.pass == pass)
            .count()
    }

    /// Number of retry loops started in `pass`
    pub fn loops_started(&self, pass: RetryPass) -> usize {
        self.recorded()
            .attempts
            .iter()
            .filter(|r| r.pass == pass && r.attempt == 1)
            .count()
    }

    pub fn batches(&self) -> Vec<BatchEvent> {
        self.recorded().batches.clone()
    }

    /// Ledger submissions observed, batch and individual
    pub fn submissions(&self) -> usize {
        self.recorded().submissions
    }

    pub fn runs_finished(&self) -> usize {
        self.recorded().runs_finished
    }
}

impl AttemptObserver for RecordingObserver {
    fn on_attempt(&self, record: &AttemptRecord) {
        self.recorded().attempts.push(record.clone());
    }

    fn on_batch(&self, index: usize, size: usize, status: BatchStatus) {
        self.recorded()
            .batches
            .push(BatchEvent { index, size, status });
    }

    fn on_submission(&self, _elapsed: Duration, _succeeded: bool) {
        self.recorded().submissions += 1;
    }

    fn on_run_finished(&self, _report: &RunReport) {
        self.recorded().runs_finished += 1;
    }
}

/// Forwards every event to each inner observer
pub struct FanoutObserver {
    observers: Vec<Arc<dyn AttemptObserver>>,
}

impl FanoutObserver {
    pub fn new(observers: Vec<Arc<dyn AttemptObserver>>) -> Self {
        Self { observers }
    }
}

impl AttemptObserver for FanoutObserver {
    fn on_attempt(&self, record: &AttemptRecord) {
        for observer in &self.observers {
            observer.on_attempt(record);
        }
    }

    fn on_batch(&self, index: usize, size: usize, status: BatchStatus) {
        for observer in &self.observers {
            observer.on_batch(index, size, status);
        }
    }

    fn on_submission(&self, elapsed: Duration, succeeded: bool) {
        for observer in &self.observers {
            observer.on_submission(elapsed, succeeded);
        }
    }

    fn on_run_started(&self, eligible: usize) {
        for observer in &self.observers {
            observer.on_run_started(eligible);
        }
    }

    fn on_run_finished(&self, report: &RunReport) {
        for observer in &self.observers {
            observer.on_run_finished(report);
        }
    }
}
