use std::sync::Arc;

use airdrop_types::{Address, FailureSet, RetryPass};
use tracing::{error, info};

use crate::retrier::RecipientRetrier;

/// Result of the escalation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscalationOutcome {
    /// Delivered by the escalation pass
    pub recovered: Vec<Address>,

    /// Exhausted the escalation pass as well
    pub permanently_failed: Vec<Address>,
}

/// Final bounded retry pass over recipients that exhausted the fallback pass
pub struct FailureEscalator {
    retrier: Arc<RecipientRetrier>,
}

impl FailureEscalator {
    pub fn new(retrier: Arc<RecipientRetrier>) -> Self {
        Self { retrier }
    }

    /// Retry every member of `failures`, one at a time, in insertion order
    pub async fn escalate(&self, failures: FailureSet) -> EscalationOutcome {
        let mut outcome = EscalationOutcome::default();
        if failures.is_empty() {
            return outcome;
        }

        info!(
            recipients = failures.len(),
            "Retrying failed recipients"
        );

        for (position, recipient) in failures {
            if self
                .retrier
                .retry(&recipient, RetryPass::Escalation)
                .await
                .is_delivered()
            {
                info!(recipient = %recipient, position, "Successfully retried recipient");
                outcome.recovered.push(recipient);
            } else {
                error!(
                    recipient = %recipient,
                    position,
                    max_retries = self.retrier.max_retries(),
                    "Airdrop failed after exhausting retries"
                );
                outcome.permanently_failed.push(recipient);
            }
        }

        outcome
    }
}
