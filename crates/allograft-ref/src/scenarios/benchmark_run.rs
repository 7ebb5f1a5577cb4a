//! Scenario 4: Benchmark Run
//!
//! Times one engine invocation over a synthetic cohort and prints the
//! harness report next to the engine's documented complexity bound.

use allograft_contracts::{error::AllograftResult, matching::BenchmarkReport};
use allograft_core::BenchmarkHarness;
use allograft_scoring::ScoringPolicy;

use crate::mock_data::synthetic_cohort;

pub const COHORT_DONORS: usize = 400;
pub const COHORT_RECIPIENTS: usize = 600;

pub fn evaluate(donors: usize, recipients: usize) -> AllograftResult<BenchmarkReport> {
    let (donor_list, recipient_list) = synthetic_cohort(donors, recipients);
    let engine = ScoringPolicy::default().into_engine();
    BenchmarkHarness::new(&engine).run(&donor_list, &recipient_list)
}

/// Run Scenario 4 and print the timing report.
pub fn run_scenario() -> AllograftResult<()> {
    println!("=== Scenario 4: Benchmark Run ===");
    println!();

    let report = evaluate(COHORT_DONORS, COHORT_RECIPIENTS)?;

    println!("  Donors:           {}", report.donor_count);
    println!("  Recipients:       {}", report.recipient_count);
    println!("  Matches:          {}", report.matches.len());
    println!("  Execution time:   {:.3} ms", report.execution_time_ms);
    println!("  Complexity:       {}", report.complexity_label);
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
