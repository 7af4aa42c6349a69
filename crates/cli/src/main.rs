//! SPL token airdrop - command line entry point
//!
//! Loads the recipient snapshot, distributes a fixed amount of the
//! configured mint to every eligible owner against the simulated ledger and
//! prints a summary. Exits non-zero when any recipient permanently failed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use airdrop_config::{validate_config, AirdropConfig, ConfigLoader, ENV_PREFIX};
use airdrop_distributor::{
    load_recipients, DistributorConfig, FanoutObserver, RecordingObserver, RunCoordinator,
};
use airdrop_ledger::{SimulatedLedger, TokenTransferBuilder};
use airdrop_metrics::{init_tracing, LogOptions, MetricsCollector, MetricsObserver};
use airdrop_types::{Address, AttemptObserver, RetryPass, RunReport};
use anyhow::Context;
use clap::Parser;
use tracing::info;

/// Batched SPL token airdrop
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML, YAML or JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recipient snapshot, overrides distribution.input_path
    #[arg(long)]
    input: Option<PathBuf>,

    /// Where to write the JSON run report, overrides distribution.report_path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Wallet paying for transfers and account creation
    #[arg(
        long,
        env = "AIRDROP_PAYER",
        default_value = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM"
    )]
    payer: String,

    /// Starting balance of the payer's token account (defaults to exactly
    /// enough for every loaded record)
    #[arg(long)]
    payer_balance: Option<u64>,

    /// Fraction of simulated submissions that confirm
    #[arg(long, default_value = "1.0")]
    success_rate: f64,

    /// Upper bound of simulated submission latency in milliseconds
    #[arg(long, default_value = "0")]
    latency_ms: u64,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    dump_metrics: bool,
}

fn load_config(args: &Args) -> anyhow::Result<AirdropConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::from_file_with_env(path, ENV_PREFIX)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConfigLoader::from_env().context("failed to load config from environment")?,
    };

    if let Some(input) = &args.input {
        config.distribution.input_path = input.clone();
    }
    if let Some(report) = &args.report {
        config.distribution.report_path = Some(report.clone());
    }

    validate_config(&config)?;
    Ok(config)
}

fn write_report(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "Run report written");
    Ok(())
}

fn print_summary(report: &RunReport, recorder: &RecordingObserver) {
    println!("Airdrop run {}", report.run_id);
    println!("  Loaded:      {}", report.total_loaded);
    println!("  Eligible:    {}", report.total_eligible);
    println!(
        "  Batches:     {} ({} confirmed)",
        report.batches, report.batches_confirmed
    );
    println!("  Succeeded:   {}", report.succeeded_count());
    println!(
        "  Fallback:    {} loops, {} attempts",
        recorder.loops_started(RetryPass::Fallback),
        recorder.attempts_in(RetryPass::Fallback)
    );
    println!(
        "  Escalation:  {} loops, {} attempts, {} recovered",
        recorder.loops_started(RetryPass::Escalation),
        recorder.attempts_in(RetryPass::Escalation),
        report.recovered_in_escalation.len()
    );
    println!("  Failed:      {}", report.failed_count());
    for recipient in &report.permanently_failed {
        println!("    {recipient}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();
    let config = load_config(&args)?;

    init_tracing(&LogOptions {
        level: config.network.log_level.clone(),
        json: config.network.log_json,
        log_file: config.network.log_file.clone(),
    })?;

    info!(
        environment = ?config.network.environment,
        rpc_url = %config.network.rpc_url,
        commitment = ?config.network.commitment,
        mint = %config.distribution.mint,
        "Starting SPL token airdrop against simulated ledger"
    );

    let records = load_recipients(&config.distribution.input_path)?;
    let amount = config.distribution.amount_per_recipient;
    let payer = Address::new(args.payer.clone());
    let mint = Address::new(config.distribution.mint.clone());

    let ledger = Arc::new(SimulatedLedger::with_settings(
        (0, args.latency_ms),
        args.success_rate,
    ));
    let balance = args
        .payer_balance
        .unwrap_or_else(|| amount.saturating_mul(records.len() as u64));
    ledger.fund(&payer, &mint, balance).await;

    let transfer_builder = Arc::new(TokenTransferBuilder::new(
        ledger.clone(),
        payer,
        mint,
        amount,
    ));

    let collector = Arc::new(MetricsCollector::new());
    let recorder = Arc::new(RecordingObserver::new());
    let observer = FanoutObserver::new(vec![
        Arc::new(MetricsObserver::new(collector.clone())) as Arc<dyn AttemptObserver>,
        recorder.clone() as Arc<dyn AttemptObserver>,
    ]);

    let coordinator = RunCoordinator::builder()
        .with_transfer_builder(transfer_builder)
        .with_ledger(ledger.clone())
        .with_observer(Arc::new(observer))
        .with_config(DistributorConfig::try_from(&config)?)
        .build()?;

    let report = coordinator.run(records).await;

    print_summary(&report, &recorder);
    if let Some(path) = &config.distribution.report_path {
        write_report(&report, path)?;
    }
    if args.dump_metrics {
        println!("{}", collector.export_metrics()?);
    }

    info!(
        submissions = ledger.submission_count(),
        confirmed = ledger.confirmed_count(),
        "Simulated ledger totals"
    );

    if !report.is_complete_success() {
        anyhow::bail!(
            "{} recipients permanently failed",
            report.failed_count()
        );
    }

    Ok(())
}
