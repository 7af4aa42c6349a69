use std::sync::Arc;
use std::time::Duration;

use airdrop_backoff::BackoffPolicy;
use airdrop_ledger::{Ledger, TransferBuilder};
use airdrop_types::{
    Address, AttemptObserver, AttemptRecord, AttemptResult, RetryPass, SubmissionReceipt,
};
use tracing::{debug, info, warn};

use crate::submitter::submit_with_timeout;

/// How a recipient's retry loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    Delivered {
        receipt: SubmissionReceipt,
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
        last_error: Option<String>,
    },
}

impl RetryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, RetryOutcome::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Delivered { attempts, .. } | RetryOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Bounded, strictly sequential retry loop for a single recipient.
///
/// Every attempt builds a fresh unit and submits it on its own.
pub struct RecipientRetrier {
    builder: Arc<dyn TransferBuilder>,
    ledger: Arc<dyn Ledger>,
    observer: Arc<dyn AttemptObserver>,
    max_retries: u32,
    backoff: BackoffPolicy,
    submit_timeout: Duration,
}

impl RecipientRetrier {
    pub fn new(
        builder: Arc<dyn TransferBuilder>,
        ledger: Arc<dyn Ledger>,
        observer: Arc<dyn AttemptObserver>,
        max_retries: u32,
        backoff: BackoffPolicy,
        submit_timeout: Duration,
    ) -> Self {
        Self {
            builder,
            ledger,
            observer,
            max_retries,
            backoff,
            submit_timeout,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Build then submit once. A build failure never reaches the ledger.
    pub async fn attempt_once(&self, recipient: &Address) -> AttemptResult {
        let unit = match self.builder.build_transfer(recipient).await {
            Ok(unit) => unit,
            Err(e) => return AttemptResult::BuildFailed(e),
        };

        match submit_with_timeout(
            self.ledger.as_ref(),
            vec![unit],
            self.submit_timeout,
            self.observer.as_ref(),
        )
        .await
        {
            Ok(receipt) => AttemptResult::Delivered(receipt),
            Err(e) => AttemptResult::SubmissionFailed(e),
        }
    }

    /// Run up to `max_retries` attempts for `recipient`, stopping at the
    /// first success
    pub async fn retry(&self, recipient: &Address, pass: RetryPass) -> RetryOutcome {
        let mut backoff = self.backoff.start();
        let mut last_error = None;

        debug!(recipient = %recipient, pass = %pass, "Starting retry loop");

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                backoff.wait().await;
            }

            let result = self.attempt_once(recipient).await;
            self.observer
                .on_attempt(&AttemptRecord::new(recipient.clone(), pass, attempt, &result));

            match result {
                AttemptResult::Delivered(receipt) => {
                    info!(
                        recipient = %recipient,
                        pass = %pass,
                        attempt,
                        signature = %receipt.signature,
                        "Transaction succeeded"
                    );
                    return RetryOutcome::Delivered {
                        receipt,
                        attempts: attempt,
                    };
                }
                AttemptResult::BuildFailed(e) => {
                    warn!(
                        recipient = %recipient,
                        pass = %pass,
                        attempt,
                        error = %e,
                        "Failed to build transfer"
                    );
                    last_error = Some(e.to_string());
                }
                AttemptResult::SubmissionFailed(e) => {
                    warn!(
                        recipient = %recipient,
                        pass = %pass,
                        attempt,
                        error = %e,
                        "Transaction failed"
                    );
                    last_error = Some(e.to_string());
                }
            }
        }

        warn!(
            recipient = %recipient,
            pass = %pass,
            attempts = self.max_retries,
            "Retry budget exhausted"
        );

        RetryOutcome::Exhausted {
            attempts: self.max_retries,
            last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{addr, MockBuilder, MockLedger};
    use crate::observer::RecordingObserver;
    use airdrop_types::AttemptOutcome;

    fn retrier(
        builder: Arc<MockBuilder>,
        ledger: Arc<MockLedger>,
        observer: Arc<RecordingObserver>,
        max_retries: u32,
    ) -> RecipientRetrier {
        RecipientRetrier::new(
            builder,
            ledger,
            observer,
            max_retries,
            BackoffPolicy::None,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let ledger = MockLedger::new();
        let observer = Arc::new(RecordingObserver::new());
        let retrier = retrier(MockBuilder::new(), ledger.clone(), observer.clone(), 10);

        let outcome = retrier.retry(&addr("a"), RetryPass::Fallback).await;

        assert!(outcome.is_delivered());
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(ledger.submissions(), vec![vec![addr("a")]]);
        assert_eq!(observer.attempts()[0].outcome, AttemptOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let builder = MockBuilder::new();
        let ledger = MockLedger::new();
        ledger.set_fail_next(3);
        let retrier = retrier(
            builder.clone(),
            ledger.clone(),
            Arc::new(RecordingObserver::new()),
            10,
        );

        let outcome = retrier.retry(&addr("a"), RetryPass::Fallback).await;

        assert_eq!(outcome.attempts(), 4);
        assert!(outcome.is_delivered());
        // A fresh unit per attempt
        assert_eq!(builder.builds_for("a"), 4);
    }

    #[tokio::test]
    async fn test_exhausts_exactly_max_retries() {
        let ledger = MockLedger::new();
        ledger.set_always_fail(true);
        let observer = Arc::new(RecordingObserver::new());
        let retrier = retrier(MockBuilder::new(), ledger.clone(), observer.clone(), 7);

        let outcome = retrier.retry(&addr("a"), RetryPass::Escalation).await;

        match outcome {
            RetryOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 7);
                assert_eq!(
                    last_error.as_deref(),
                    Some("transaction rejected: mock failure")
                );
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(ledger.submissions_with("a"), 7);

        let records = observer.attempts();
        let numbers: Vec<u32> = records.iter().map(|r| r.attempt).collect();
        assert_eq!(numbers, (1..=7).collect::<Vec<_>>());
        assert!(records.iter().all(|r| r.pass == RetryPass::Escalation));
    }

    #[tokio::test]
    async fn test_build_failures_never_reach_ledger() {
        let builder = MockBuilder::new();
        builder.fail_for("a");
        let ledger = MockLedger::new();
        let observer = Arc::new(RecordingObserver::new());
        let retrier = retrier(builder.clone(), ledger.clone(), observer.clone(), 5);

        let outcome = retrier.retry(&addr("a"), RetryPass::Fallback).await;

        assert!(!outcome.is_delivered());
        assert_eq!(builder.builds_for("a"), 5);
        assert!(ledger.submissions().is_empty());
        assert!(observer
            .attempts()
            .iter()
            .all(|r| r.outcome == AttemptOutcome::BuildFailure));
    }

    #[tokio::test]
    async fn test_zero_budget_makes_no_attempt() {
        let ledger = MockLedger::new();
        let retrier = retrier(
            MockBuilder::new(),
            ledger.clone(),
            Arc::new(RecordingObserver::new()),
            0,
        );

        let outcome = retrier.retry(&addr("a"), RetryPass::Fallback).await;

        assert_eq!(
            outcome,
            RetryOutcome::Exhausted {
                attempts: 0,
                last_error: None
            }
        );
        assert!(ledger.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_fixed_backoff_waits_between_attempts() {
        let ledger = MockLedger::new();
        ledger.set_fail_next(2);
        let retrier = RecipientRetrier::new(
            MockBuilder::new(),
            ledger,
            Arc::new(RecordingObserver::new()),
            3,
            BackoffPolicy::fixed(Duration::from_millis(20)),
            Duration::from_secs(5),
        );

        let started = std::time::Instant::now();
        let outcome = retrier.retry(&addr("a"), RetryPass::Fallback).await;

        assert_eq!(outcome.attempts(), 3);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
