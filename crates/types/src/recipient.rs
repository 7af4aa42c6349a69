use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account identifier on the remote ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw token account record as exported from an indexer snapshot.
///
/// Only `owner` and `amount` drive the distribution; the remaining fields are
/// carried for operators and ignored by the engine. Unknown fields are
/// skipped during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAccountRecord {
    /// Token account address holding the snapshot balance
    #[serde(default)]
    pub address: Option<String>,

    /// Mint of the snapshot balance
    #[serde(default)]
    pub mint: Option<String>,

    /// Wallet that owns the token account and receives the airdrop
    pub owner: String,

    /// Snapshot balance in base units
    pub amount: u64,

    #[serde(default)]
    pub delegated_amount: u64,

    #[serde(default)]
    pub frozen: bool,
}

impl TokenAccountRecord {
    pub fn new(owner: impl Into<String>, amount: u64) -> Self {
        Self {
            address: None,
            mint: None,
            owner: owner.into(),
            amount,
            delegated_amount: 0,
            frozen: false,
        }
    }
}

/// A recipient of the distribution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipientRecord {
    /// Wallet address receiving the transfer
    pub owner: Address,

    /// Amount owed according to the snapshot
    pub owed_amount: u64,
}

impl RecipientRecord {
    pub fn new(owner: impl Into<Address>, owed_amount: u64) -> Self {
        Self {
            owner: owner.into(),
            owed_amount,
        }
    }

    /// Recipients with nothing owed are skipped
    pub fn is_eligible(&self) -> bool {
        self.owed_amount > 0
    }
}

impl From<TokenAccountRecord> for RecipientRecord {
    fn from(record: TokenAccountRecord) -> Self {
        Self {
            owner: Address::new(record.owner),
            owed_amount: record.amount,
        }
    }
}
