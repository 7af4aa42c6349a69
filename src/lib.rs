//! SPL token airdrop
//!
//! Batched, retrying distribution of a fixed token amount to every owner in
//! a snapshot. See the member crates for the individual pieces:
//!
//! - [`types`]: recipients, units of work, attempt records, the run report
//! - [`backoff`]: delay policies between retry attempts
//! - [`config`]: layered configuration loading and validation
//! - [`metrics`]: Prometheus counters and tracing setup
//! - [`ledger`]: ledger seams, the transfer builder and the simulated ledger
//! - [`distributor`]: filter, batcher, submitter, retrier, escalator and coordinator

pub use airdrop_backoff as backoff;
pub use airdrop_config as config;
pub use airdrop_distributor as distributor;
pub use airdrop_ledger as ledger;
pub use airdrop_metrics as metrics;
pub use airdrop_types as types;

pub use airdrop_distributor::{DistributorConfig, RunCoordinator};
pub use airdrop_types::RunReport;
