use airdrop_types::{Address, BuildError, LedgerInstruction, UnitOfWork};
use async_trait::async_trait;
use tracing::debug;

use crate::account::{derive_associated_account, validate_address};
use crate::traits::{AccountLookup, TransferBuilder};

/// Builds a fixed-amount token transfer from the payer's associated account,
/// creating the recipient's associated account first when it does not exist
pub struct TokenTransferBuilder<L> {
    lookup: L,
    payer: Address,
    payer_account: Address,
    mint: Address,
    amount: u64,
}

impl<L: AccountLookup> TokenTransferBuilder<L> {
    pub fn new(lookup: L, payer: Address, mint: Address, amount: u64) -> Self {
        let payer_account = derive_associated_account(&payer, &mint);
        Self {
            lookup,
            payer,
            payer_account,
            mint,
            amount,
        }
    }

    /// Token account the transfers are drawn from
    pub fn payer_account(&self) -> &Address {
        &self.payer_account
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }
}

#[async_trait]
impl<L: AccountLookup> TransferBuilder for TokenTransferBuilder<L> {
    async fn build_transfer(&self, recipient: &Address) -> Result<UnitOfWork, BuildError> {
        validate_address(recipient)?;

        let destination = derive_associated_account(recipient, &self.mint);
        let exists = self.lookup.account_exists(&destination).await?;

        let mut unit = UnitOfWork::new(recipient.clone());
        if !exists {
            unit.push(LedgerInstruction::CreateAssociatedAccount {
                payer: self.payer.clone(),
                account: destination.clone(),
                owner: recipient.clone(),
                mint: self.mint.clone(),
            });
        }
        unit.push(LedgerInstruction::Transfer {
            source: self.payer_account.clone(),
            destination: destination.clone(),
            authority: self.payer.clone(),
            amount: self.amount,
        });

        debug!(
            recipient = %recipient,
            destination = %destination,
            create_account = !exists,
            amount = self.amount,
            "Built transfer"
        );

        Ok(unit)
    }
}
