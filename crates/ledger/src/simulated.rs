//! Simulated ledger
//!
//! Applies submissions to in-memory token accounts, all units or none,
//! for demos and tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use airdrop_types::{
    Address, BuildError, LedgerInstruction, SubmissionError, SubmissionReceipt, UnitOfWork,
};
use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::account::derive_associated_account;
use crate::traits::{AccountLookup, Ledger};

/// Simulated token account
#[derive(Debug, Clone)]
struct SimulatedAccount {
    owner: Address,
    mint: Address,
    balance: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<Address, SimulatedAccount>,
    slot: u64,
}

/// In-memory ledger with atomic submissions
pub struct SimulatedLedger {
    state: RwLock<LedgerState>,
    /// Errors returned by the next submissions, in order
    scripted: Mutex<VecDeque<SubmissionError>>,
    /// Simulated latency range (ms)
    latency_range: (u64, u64),
    /// Success rate (0.0 to 1.0)
    success_rate: f64,
    submissions: AtomicUsize,
    confirmed: AtomicUsize,
}

impl SimulatedLedger {
    /// Create a ledger that confirms every valid submission immediately
    pub fn new() -> Self {
        Self::with_settings((0, 0), 1.0)
    }

    /// Create with custom settings
    pub fn with_settings(latency_range: (u64, u64), success_rate: f64) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            scripted: Mutex::new(VecDeque::new()),
            latency_range,
            success_rate,
            submissions: AtomicUsize::new(0),
            confirmed: AtomicUsize::new(0),
        }
    }

    /// Create `owner`'s associated account for `mint` holding `amount`.
    ///
    /// Returns the funded account.
    pub async fn fund(&self, owner: &Address, mint: &Address, amount: u64) -> Address {
        let account = derive_associated_account(owner, mint);
        let mut state = self.state.write().await;
        state
            .accounts
            .entry(account.clone())
            .or_insert_with(|| SimulatedAccount {
                owner: owner.clone(),
                mint: mint.clone(),
                balance: 0,
            })
            .balance += amount;

        info!(account = %account, owner = %owner, amount, "Funded simulated account");
        account
    }

    /// Fail the next submission with `error`, ahead of any random failure
    pub async fn fail_next(&self, error: SubmissionError) {
        self.scripted.lock().await.push_back(error);
    }

    /// Balance of a token account, if it exists
    pub async fn balance_of(&self, account: &Address) -> Option<u64> {
        self.state
            .read()
            .await
            .accounts
            .get(account)
            .map(|a| a.balance)
    }

    /// Submissions received, including rejected ones
    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Submissions that executed
    pub fn confirmed_count(&self) -> usize {
        self.confirmed.load(Ordering::SeqCst)
    }

    /// Simulate network latency
    async fn simulate_latency(&self) {
        let (low, high) = self.latency_range;
        if high == 0 {
            return;
        }
        let delay = {
            let mut rng = rand::thread_rng();
            rng.gen_range(low..=high)
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    /// Check if operation should succeed based on success rate
    fn should_succeed(&self) -> bool {
        if self.success_rate >= 1.0 {
            return true;
        }
        let mut rng = rand::thread_rng();
        rng.gen::<f64>() < self.success_rate
    }

    fn signature(slot: u64, units: &[UnitOfWork]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(slot.to_le_bytes());
        for unit in units {
            hasher.update(unit.recipient().as_str().as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

impl Default for SimulatedLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy-on-write view of the committed accounts for one submission.
///
/// Only accounts an instruction reads for writing or creates are copied.
struct Staged<'a> {
    committed: &'a HashMap<Address, SimulatedAccount>,
    touched: HashMap<Address, SimulatedAccount>,
}

impl<'a> Staged<'a> {
    fn new(committed: &'a HashMap<Address, SimulatedAccount>) -> Self {
        Self {
            committed,
            touched: HashMap::new(),
        }
    }

    fn get(&self, account: &Address) -> Option<&SimulatedAccount> {
        self.touched
            .get(account)
            .or_else(|| self.committed.get(account))
    }

    fn get_mut(&mut self, account: &Address) -> Option<&mut SimulatedAccount> {
        if !self.touched.contains_key(account) {
            let current = self.committed.get(account)?.clone();
            self.touched.insert(account.clone(), current);
        }
        self.touched.get_mut(account)
    }

    fn create(&mut self, account: Address, value: SimulatedAccount) {
        self.touched.insert(account, value);
    }

    fn into_touched(self) -> HashMap<Address, SimulatedAccount> {
        self.touched
    }

    fn apply(&mut self, instruction: &LedgerInstruction) -> Result<(), String> {
        match instruction {
            LedgerInstruction::CreateAssociatedAccount {
                account,
                owner,
                mint,
                ..
            } => {
                if self.get(account).is_some() {
                    return Err(format!("account {account} already in use"));
                }
                if derive_associated_account(owner, mint) != *account {
                    return Err(format!("{account} is not the associated account of {owner}"));
                }
                self.create(
                    account.clone(),
                    SimulatedAccount {
                        owner: owner.clone(),
                        mint: mint.clone(),
                        balance: 0,
                    },
                );
            }
            LedgerInstruction::Transfer {
                source,
                destination,
                authority,
                amount,
            } => {
                let destination_mint = self
                    .get(destination)
                    .map(|a| a.mint.clone())
                    .ok_or_else(|| format!("destination account {destination} not found"))?;

                let from = self
                    .get_mut(source)
                    .ok_or_else(|| format!("source account {source} not found"))?;
                if from.owner != *authority {
                    return Err(format!("{authority} does not own {source}"));
                }
                if from.mint != destination_mint {
                    return Err("mint mismatch".to_string());
                }
                let balance = from.balance;
                from.balance = balance.checked_sub(*amount).ok_or_else(|| {
                    format!("insufficient funds: balance {balance}, transfer {amount}")
                })?;

                let to = self
                    .get_mut(destination)
                    .ok_or_else(|| format!("destination account {destination} not found"))?;
                to.balance = to
                    .balance
                    .checked_add(*amount)
                    .ok_or_else(|| format!("balance overflow in {destination}"))?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for SimulatedLedger {
    async fn submit(&self, units: Vec<UnitOfWork>) -> Result<SubmissionReceipt, SubmissionError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);

        if units.is_empty() {
            return Err(SubmissionError::Empty);
        }

        self.simulate_latency().await;

        if let Some(error) = self.scripted.lock().await.pop_front() {
            warn!(error = %error, units = units.len(), "Scripted submission failure");
            return Err(error);
        }

        if !self.should_succeed() {
            return Err(SubmissionError::Rejected("blockhash not found".to_string()));
        }

        let mut state = self.state.write().await;

        let mut staged = Staged::new(&state.accounts);
        for unit in &units {
            for instruction in unit.instructions() {
                staged.apply(instruction).map_err(|reason| {
                    debug!(recipient = %unit.recipient(), reason = %reason, "Instruction failed");
                    SubmissionError::Rejected(reason)
                })?;
            }
        }

        let touched = staged.into_touched();
        state.accounts.extend(touched);
        state.slot += 1;
        let signature = Self::signature(state.slot, &units);
        self.confirmed.fetch_add(1, Ordering::SeqCst);

        let recipients: Vec<Address> = units.iter().map(|u| u.recipient().clone()).collect();
        debug!(
            signature = %signature,
            slot = state.slot,
            units = recipients.len(),
            "Simulated submission confirmed"
        );

        Ok(SubmissionReceipt::new(signature, recipients))
    }
}

#[async_trait]
impl AccountLookup for SimulatedLedger {
    async fn account_exists(&self, account: &Address) -> Result<bool, BuildError> {
        Ok(self.state.read().await.accounts.contains_key(account))
    }
}
