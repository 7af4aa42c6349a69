use serde::{Deserialize, Serialize};

use crate::Address;

/// A single ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerInstruction {
    /// Create the recipient's associated token account, paid for by `payer`
    CreateAssociatedAccount {
        payer: Address,
        account: Address,
        owner: Address,
        mint: Address,
    },

    /// Move `amount` base units between token accounts
    Transfer {
        source: Address,
        destination: Address,
        authority: Address,
        amount: u64,
    },
}

impl LedgerInstruction {
    pub fn is_account_creation(&self) -> bool {
        matches!(self, LedgerInstruction::CreateAssociatedAccount { .. })
    }
}

/// The ordered operations that deliver one recipient's transfer.
///
/// A unit is built for exactly one attempt and consumed by the submission
/// that carries it. Retries build a new one.
#[derive(Debug, PartialEq, Eq)]
pub struct UnitOfWork {
    recipient: Address,
    instructions: Vec<LedgerInstruction>,
}

impl UnitOfWork {
    pub fn new(recipient: Address) -> Self {
        Self {
            recipient,
            instructions: Vec::new(),
        }
    }

    pub fn with_instruction(mut self, instruction: LedgerInstruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn push(&mut self, instruction: LedgerInstruction) {
        self.instructions.push(instruction);
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn instructions(&self) -> &[LedgerInstruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<LedgerInstruction> {
        self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether this unit creates the destination account before transferring
    pub fn creates_account(&self) -> bool {
        self.instructions.iter().any(|i| i.is_account_creation())
    }
}

/// Proof that every operation of a submission executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Transaction signature assigned by the ledger
    pub signature: String,

    /// Recipients whose units were carried by the submission
    pub recipients: Vec<Address>,
}

impl SubmissionReceipt {
    pub fn new(signature: impl Into<String>, recipients: Vec<Address>) -> Self {
        Self {
            signature: signature.into(),
            recipients,
        }
    }
}
