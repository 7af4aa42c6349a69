use std::sync::Arc;

use airdrop_types::{Address, BuildError, SubmissionError, SubmissionReceipt, UnitOfWork};
use async_trait::async_trait;

/// Remote ledger accepting atomic submissions
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Submit every unit as one all-or-nothing operation and wait for
    /// confirmation.
    ///
    /// On error none of the units took effect.
    async fn submit(&self, units: Vec<UnitOfWork>) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Builds the unit of work delivering one recipient's transfer
#[async_trait]
pub trait TransferBuilder: Send + Sync {
    /// Build a fresh unit for `recipient`.
    ///
    /// Calls may return different units as ledger state changes.
    async fn build_transfer(&self, recipient: &Address) -> Result<UnitOfWork, BuildError>;
}

/// Read-only account queries used while building transfers
#[async_trait]
pub trait AccountLookup: Send + Sync {
    async fn account_exists(&self, account: &Address) -> Result<bool, BuildError>;
}

#[async_trait]
impl<T: Ledger + ?Sized> Ledger for Arc<T> {
    async fn submit(&self, units: Vec<UnitOfWork>) -> Result<SubmissionReceipt, SubmissionError> {
        (**self).submit(units).await
    }
}

#[async_trait]
impl<T: TransferBuilder + ?Sized> TransferBuilder for Arc<T> {
    async fn build_transfer(&self, recipient: &Address) -> Result<UnitOfWork, BuildError> {
        (**self).build_transfer(recipient).await
    }
}

#[async_trait]
impl<T: AccountLookup + ?Sized> AccountLookup for Arc<T> {
    async fn account_exists(&self, account: &Address) -> Result<bool, BuildError> {
        (**self).account_exists(account).await
    }
}
