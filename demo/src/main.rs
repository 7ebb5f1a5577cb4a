//! allograft CLI
//!
//! Runs the allocation engine over donor and recipient JSON files, times a
//! run with the benchmark harness, or plays the bundled demo scenarios.
//!
//! Usage:
//!   cargo run -p demo -- match --donors donors.json --recipients recipients.json
//!   cargo run -p demo -- match --donors d.json --recipients r.json --config scoring.toml --json
//!   cargo run -p demo -- benchmark --donors d.json --recipients r.json
//!   cargo run -p demo -- scenarios run-all

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use allograft_contracts::{
    error::{AllograftError, AllograftResult},
    ingest::{parse_collection, Role},
    matching::MatchReport,
    person::Person,
};
use allograft_core::BenchmarkHarness;
use allograft_ref::scenarios::{
    benchmark_run, contested_organ, universal_fallback, waitlist_allocation,
};
use allograft_scoring::ScoringPolicy;

// ── CLI definition ────────────────────────────────────────────────────────────

/// allograft: urgency-ranked organ allocation.
#[derive(Parser)]
#[command(
    name = "allograft",
    about = "Urgency-ranked donor/recipient allocation",
    long_about = "Ranks recipients by urgency and assigns each the most compatible\n\
                  eligible donor of the same organ and a compatible blood type."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Input files shared by `match` and `benchmark`.
#[derive(clap::Args)]
struct Inputs {
    /// JSON array of donor records.
    #[arg(long)]
    donors: PathBuf,
    /// JSON array of recipient records.
    #[arg(long)]
    recipients: PathBuf,
    /// Scoring rules in TOML. The stock rules apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Allocate donors to recipients and print the result.
    Match {
        #[command(flatten)]
        inputs: Inputs,
        /// Print the full report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Time one allocation run and print the benchmark report as JSON.
    Benchmark {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Run the bundled demo scenarios.
    Scenarios {
        #[command(subcommand)]
        which: Option<Scenario>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum Scenario {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: type-A recipient served from the universal bucket.
    UniversalFallback,
    /// Scenario 2: two recipients, one liver.
    ContestedOrgan,
    /// Scenario 3: the mock registry end to end, with audit verification.
    WaitlistAllocation,
    /// Scenario 4: timed run over a synthetic cohort.
    BenchmarkRun,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Match { inputs, json } => run_match(&inputs, json),
        Command::Benchmark { inputs } => run_benchmark(&inputs),
        Command::Scenarios { which } => run_scenarios(which.unwrap_or(Scenario::RunAll)),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_match(inputs: &Inputs, json: bool) -> AllograftResult<()> {
    let (policy, donors, recipients) = load_inputs(inputs)?;
    let report = policy.into_engine().run(&donors, &recipients)?;

    if json {
        println!("{}", to_json(&report));
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_benchmark(inputs: &Inputs) -> AllograftResult<()> {
    let (policy, donors, recipients) = load_inputs(inputs)?;
    let engine = policy.into_engine();
    let report = BenchmarkHarness::new(&engine).run(&donors, &recipients)?;
    println!("{}", to_json(&report));
    Ok(())
}

fn run_scenarios(which: Scenario) -> AllograftResult<()> {
    match which {
        Scenario::RunAll => {
            universal_fallback::run_scenario()?;
            contested_organ::run_scenario()?;
            waitlist_allocation::run_scenario()?;
            benchmark_run::run_scenario()?;
        }
        Scenario::UniversalFallback => universal_fallback::run_scenario()?,
        Scenario::ContestedOrgan => contested_organ::run_scenario()?,
        Scenario::WaitlistAllocation => waitlist_allocation::run_scenario()?,
        Scenario::BenchmarkRun => benchmark_run::run_scenario()?,
    }
    println!("All selected scenarios completed successfully.");
    Ok(())
}

// ── Input loading ─────────────────────────────────────────────────────────────

fn load_inputs(inputs: &Inputs) -> AllograftResult<(ScoringPolicy, Vec<Person>, Vec<Person>)> {
    let policy = match &inputs.config {
        Some(path) => ScoringPolicy::from_file(path)?,
        None => ScoringPolicy::default(),
    };
    let options = policy.ingest_options().clone();

    let donors = parse_collection(&read_input(&inputs.donors)?, Role::Donor, &options)?;
    let recipients =
        parse_collection(&read_input(&inputs.recipients)?, Role::Recipient, &options)?;

    info!(
        donors = donors.len(),
        recipients = recipients.len(),
        "input collections loaded"
    );
    Ok((policy, donors, recipients))
}

fn read_input(path: &Path) -> AllograftResult<String> {
    std::fs::read_to_string(path).map_err(|e| AllograftError::InvalidInput {
        record: path.display().to_string(),
        reason: format!("failed to read input file: {}", e),
    })
}

/// Pretty JSON for a report.
///
/// # Panics
///
/// Panics if `value` cannot be serialized, which cannot happen for the
/// plain-data report types (string map keys, derived impls only).
fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("report types must always serialize to JSON")
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_report(report: &MatchReport) {
    println!("Run {}", report.run_id);
    println!();
    println!(
        "  {:<12} {:<8} {:<10} {:<12} {:>6}",
        "Recipient", "Urgency", "Organ", "Donor", "Score"
    );
    for m in &report.matches {
        println!(
            "  {:<12} {:<8} {:<10} {:<12} {:>6.2}",
            m.recipient.id.to_string(),
            m.recipient.urgency,
            m.recipient.organ.as_str(),
            m.donor.id.to_string(),
            m.compatibility_score
        );
    }
    println!();
    println!("  Matched:   {}", report.matches.len());

    if !report.unmatched.is_empty() {
        println!("  Unmatched: {}", report.unmatched.len());
        for u in &report.unmatched {
            println!("    recipient {} ({}): {}", u.recipient.id, u.recipient.organ.as_str(), u.reason);
        }
    }
    if !report.excluded_donors.is_empty() {
        let ids: Vec<String> = report.excluded_donors.iter().map(|id| id.to_string()).collect();
        println!("  Excluded donors (disease-flagged): {}", ids.join(", "));
    }
}
