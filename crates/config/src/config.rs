//! Core configuration structures for the airdrop distributor

use airdrop_backoff::BackoffPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AirdropConfig {
    /// Distribution parameters
    #[serde(default)]
    pub distribution: DistributionConfig,

    /// Ledger network and logging configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Retry delay configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

/// What is distributed, to whom, and how it is batched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Recipients combined into one atomic submission
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Attempt ceiling for each retry pass
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed base-unit quantity sent to every recipient
    #[serde(default = "default_amount_per_recipient")]
    pub amount_per_recipient: u64,

    /// Mint of the distributed token
    #[serde(default)]
    pub mint: String,

    /// Recipient snapshot (JSON array of token accounts)
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Per-submission timeout in milliseconds
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,

    /// Where to write the run report, if anywhere
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

/// Ledger endpoint and log output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Environment type (mainnet, devnet, local)
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Commitment level awaited for confirmation
    #[serde(default = "default_commitment")]
    pub commitment: Commitment,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Mirror logs into this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    Devnet,
    Local,
}

/// Confirmation commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

/// Delay applied between attempts for the same recipient
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RetryConfig {
    #[serde(default)]
    pub backoff: BackoffPolicy,
}

// Default value functions
fn default_batch_size() -> usize {
    10
}

fn default_max_retries() -> u32 {
    10
}

fn default_amount_per_recipient() -> u64 {
    10
}

fn default_input_path() -> PathBuf {
    PathBuf::from("output.json")
}

fn default_submit_timeout_ms() -> u64 {
    30000
}

fn default_environment() -> Environment {
    Environment::Local
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8899".to_string()
}

fn default_commitment() -> Commitment {
    Commitment::Confirmed
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            amount_per_recipient: default_amount_per_recipient(),
            mint: String::new(),
            input_path: default_input_path(),
            submit_timeout_ms: default_submit_timeout_ms(),
            report_path: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            rpc_url: default_rpc_url(),
            commitment: default_commitment(),
            log_level: default_log_level(),
            log_json: false,
            log_file: None,
        }
    }
}
