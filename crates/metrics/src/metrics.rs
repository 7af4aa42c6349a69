use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

lazy_static! {
    // ═══════════════════════════════════════════════════════════════════════════
    // RUN METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Total number of distribution runs started
    pub static ref RUNS_STARTED: IntCounter = register_int_counter!(
        "spl_airdrop_runs_started_total",
        "Total number of distribution runs started"
    )
    .unwrap();

    /// Eligible recipients of the current run
    pub static ref ELIGIBLE_RECIPIENTS: IntGauge = register_int_gauge!(
        "spl_airdrop_eligible_recipients",
        "Eligible recipients of the most recent run"
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // BATCH METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Batches by final status
    pub static ref BATCHES: IntCounterVec = register_int_counter_vec!(
        "spl_airdrop_batches_total",
        "Total batches by status",
        &["status"]
    )
    .unwrap();

    /// Members carried by batches
    pub static ref BATCH_MEMBERS: IntCounter = register_int_counter!(
        "spl_airdrop_batch_members_total",
        "Total recipients placed in batches"
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // ATTEMPT METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Individual attempts by retry pass and outcome
    pub static ref ATTEMPTS: IntCounterVec = register_int_counter_vec!(
        "spl_airdrop_attempts_total",
        "Total per-recipient attempts by pass and outcome",
        &["pass", "outcome"]
    )
    .unwrap();

    /// Submission latency histogram (in milliseconds)
    pub static ref SUBMISSION_LATENCY: Histogram = register_histogram!(
        "spl_airdrop_submission_latency_ms",
        "Ledger submission latency in milliseconds",
        vec![50.0, 100.0, 250.0, 500.0, 1000.0, 5000.0, 30000.0]
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // RECIPIENT METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Recipients delivered
    pub static ref RECIPIENTS_SUCCEEDED: IntCounter = register_int_counter!(
        "spl_airdrop_recipients_succeeded_total",
        "Total recipients whose transfer was delivered"
    )
    .unwrap();

    /// Recipients that exhausted every retry pass
    pub static ref RECIPIENTS_FAILED: IntCounter = register_int_counter!(
        "spl_airdrop_recipients_failed_total",
        "Total recipients reported as permanently failed"
    )
    .unwrap();

    /// Recipients that entered the escalation pass
    pub static ref RECIPIENTS_ESCALATED: IntCounter = register_int_counter!(
        "spl_airdrop_recipients_escalated_total",
        "Total recipients handed to the escalation pass"
    )
    .unwrap();
}
