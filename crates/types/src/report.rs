use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Address, RecipientRecord};

/// Terminal tally of a distribution run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Records loaded, including ineligible ones
    pub total_loaded: usize,

    /// Records with a non-zero owed amount
    pub total_eligible: usize,

    /// Number of batches submitted or attempted
    pub batches: usize,

    /// Batches whose atomic submission executed
    pub batches_confirmed: usize,

    /// One entry per delivered record
    pub succeeded: Vec<Address>,

    /// Recipients delivered only by the escalation pass
    pub recovered_in_escalation: Vec<Address>,

    /// Recipients that exhausted both retry passes
    pub permanently_failed: Vec<Address>,
}

impl RunReport {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.permanently_failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.permanently_failed.is_empty()
    }

    /// Check that every eligible record ended up in exactly one of the
    /// succeeded and permanently failed lists.
    ///
    /// Owners listed on several rows must appear once per row.
    pub fn accounts_for(&self, eligible: &[RecipientRecord]) -> bool {
        let mut outstanding: HashMap<&Address, usize> = HashMap::new();
        for record in eligible {
            *outstanding.entry(&record.owner).or_insert(0) += 1;
        }

        for recipient in self.succeeded.iter().chain(&self.permanently_failed) {
            match outstanding.get_mut(recipient) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return false,
            }
        }

        outstanding.values().all(|count| *count == 0)
    }
}
