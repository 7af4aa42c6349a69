use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Options for the global tracing subscriber
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines on stdout instead of human-readable output
    pub json: bool,
    /// Also append JSON lines to this file
    pub log_file: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_file: None,
        }
    }
}

impl LogOptions {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Initialize the global tracing subscriber
pub fn init_tracing(options: &LogOptions) -> Result<(), TracingError> {
    let json_layer = options.json.then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .json()
    });

    let plain_layer = (!options.json).then(|| fmt::layer().with_target(true).with_level(true));

    let file_layer = match &options.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| TracingError::LogFile {
                    path: path.clone(),
                    source: e,
                })?;

            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .json()
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(options.filter())
        .with(json_layer)
        .with(plain_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| TracingError::InitError(e.to_string()))?;

    Ok(())
}

/// Identifier correlating every log line of one distribution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(uuid::Uuid);

impl RunId {
    /// Generate a new run ID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the run ID as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span context for a distribution run
#[derive(Debug, Clone)]
pub struct RunSpan {
    pub run_id: RunId,
    pub eligible: usize,
}

impl RunSpan {
    pub fn new(run_id: RunId, eligible: usize) -> Self {
        Self { run_id, eligible }
    }

    /// Build the tracing span for this run
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "airdrop_run",
            run_id = %self.run_id,
            eligible = self.eligible,
        )
    }
}

/// Error enrichment for adding run context to errors
pub trait ErrorContext {
    /// Log the error with the run ID attached
    fn with_run_id(self, run_id: RunId) -> Self;
}

impl<T, E> ErrorContext for Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_run_id(self, run_id: RunId) -> Self {
        self.map_err(|e| {
            tracing::error!(
                run_id = %run_id,
                error = %e,
                "error occurred"
            );
            e
        })
    }
}

/// Tracing error types
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("tracing initialization error: {0}")]
    InitError(String),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
