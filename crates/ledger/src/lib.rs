//! Ledger collaborators for the airdrop distributor
//!
//! The distributor only talks to the ledger through the traits in this
//! crate. `TokenTransferBuilder` builds the associated-account-plus-transfer
//! unit for one recipient and `SimulatedLedger` applies submissions
//! atomically in memory.

pub mod account;
pub mod builder;
pub mod simulated;
pub mod traits;

pub use account::{derive_associated_account, validate_address};
pub use builder::TokenTransferBuilder;
pub use simulated::SimulatedLedger;
pub use traits::{AccountLookup, Ledger, TransferBuilder};
