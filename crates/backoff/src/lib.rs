//! Delay policies applied between retry attempts of the airdrop distributor
//!
//! - `BackoffPolicy`: serializable description of the delay strategy
//! - `Backoff`: per-recipient delay state produced from a policy, with
//!   exponential delays capped at the policy maximum

pub mod policy;

pub use policy::{Backoff, BackoffPolicy};
