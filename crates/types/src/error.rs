use std::path::PathBuf;
use thiserror::Error;

/// Failure to build a recipient's unit of work.
///
/// Recoverable only by building again; a unit that failed to build is never
/// resent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid recipient address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("account lookup failed for {account}: {reason}")]
    AccountLookup { account: String, reason: String },

    #[error("transfer build failed: {0}")]
    Other(String),
}

/// Failure of a submission to the ledger.
///
/// A submission error means none of the carried operations took effect, so
/// it is always safe to retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("submission timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("nothing to submit")]
    Empty,
}

/// Fatal failure loading the recipient list
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read recipients from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse recipients: {0}")]
    Parse(#[from] serde_json::Error),
}
