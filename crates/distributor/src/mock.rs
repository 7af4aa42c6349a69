//! Scriptable collaborators for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use airdrop_ledger::{Ledger, TransferBuilder};
use airdrop_types::{
    Address, BuildError, LedgerInstruction, SubmissionError, SubmissionReceipt, UnitOfWork,
};
use async_trait::async_trait;

pub fn addr(s: &str) -> Address {
    Address::from(s)
}

#[derive(Default)]
pub struct MockBuilder {
    failing: Mutex<HashSet<Address>>,
    builds: Mutex<HashMap<Address, usize>>,
}

impl MockBuilder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(addr(recipient));
    }

    pub fn builds_for(&self, recipient: &str) -> usize {
        self.builds
            .lock()
            .unwrap()
            .get(&addr(recipient))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl TransferBuilder for MockBuilder {
    async fn build_transfer(&self, recipient: &Address) -> Result<UnitOfWork, BuildError> {
        *self
            .builds
            .lock()
            .unwrap()
            .entry(recipient.clone())
            .or_insert(0) += 1;

        if self.failing.lock().unwrap().contains(recipient) {
            return Err(BuildError::InvalidAddress {
                address: recipient.to_string(),
                reason: "mock build failure".to_string(),
            });
        }

        Ok(
            UnitOfWork::new(recipient.clone()).with_instruction(LedgerInstruction::Transfer {
                source: addr("payer-ata"),
                destination: recipient.clone(),
                authority: addr("payer"),
                amount: 10,
            }),
        )
    }
}

#[derive(Default)]
pub struct MockLedger {
    submissions: Mutex<Vec<Vec<Address>>>,
    always_fail: AtomicBool,
    reject_batches: AtomicBool,
    fail_next: AtomicUsize,
    poisoned: Mutex<HashSet<Address>>,
    receipts_without_recipients: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_always_fail(&self, fail: bool) {
        self.always_fail.store(fail, Ordering::SeqCst);
    }

    /// Reject every submission carrying more than one unit
    pub fn set_reject_batches(&self, reject: bool) {
        self.reject_batches.store(reject, Ordering::SeqCst);
    }

    pub fn set_fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Reject every submission containing `recipient`
    pub fn poison(&self, recipient: &str) {
        self.poisoned.lock().unwrap().insert(addr(recipient));
    }

    /// Confirm with a bare signature, listing no recipients
    pub fn set_receipts_without_recipients(&self, bare: bool) {
        self.receipts_without_recipients.store(bare, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn submissions(&self) -> Vec<Vec<Address>> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submissions_with(&self, recipient: &str) -> usize {
        let recipient = addr(recipient);
        self.submissions()
            .iter()
            .filter(|s| s.contains(&recipient))
            .count()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn submit(&self, units: Vec<UnitOfWork>) -> Result<SubmissionReceipt, SubmissionError> {
        let recipients: Vec<Address> = units.iter().map(|u| u.recipient().clone()).collect();
        self.submissions.lock().unwrap().push(recipients.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.always_fail.load(Ordering::SeqCst) {
            return Err(SubmissionError::Rejected("mock failure".to_string()));
        }
        if self.reject_batches.load(Ordering::SeqCst) && recipients.len() > 1 {
            return Err(SubmissionError::Rejected("batch too large".to_string()));
        }
        if self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SubmissionError::ConnectionFailed("mock reset".to_string()));
        }
        {
            let poisoned = self.poisoned.lock().unwrap();
            if recipients.iter().any(|r| poisoned.contains(r)) {
                return Err(SubmissionError::Rejected("poisoned recipient".to_string()));
            }
        }

        let index = self.submissions.lock().unwrap().len();
        if self.receipts_without_recipients.load(Ordering::SeqCst) {
            return Ok(SubmissionReceipt::new(format!("sig{index}"), Vec::new()));
        }
        Ok(SubmissionReceipt::new(format!("sig{index}"), recipients))
    }
}
