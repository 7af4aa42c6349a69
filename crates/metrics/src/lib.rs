//! Metrics and logging for the SPL token airdrop distributor
//!
//! # Features
//!
//! - Prometheus counters for batches, attempts, and recipient outcomes
//! - `MetricsObserver` feeding those counters from the distributor's attempt stream
//! - Tracing subscriber setup with optional JSON output and log file
//! - Run identifiers and spans for correlating a whole distribution run
//!
//! # Example
//!
//! ```no_run
//! use airdrop_metrics::{init_tracing, LogOptions, MetricsCollector};
//!
//! init_tracing(&LogOptions::default()).unwrap();
//!
//! let collector = MetricsCollector::new();
//! collector.record_run_started(25);
//! println!("{}", collector.export_metrics().unwrap());
//! ```

pub mod collector;
pub mod metrics;
pub mod tracing;

pub use collector::{MetricsCollector, MetricsError, MetricsObserver};
pub use tracing::{init_tracing, ErrorContext, LogOptions, RunId, RunSpan, TracingError};
