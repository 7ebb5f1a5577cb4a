//! Scenario 1: Universal Donor Fallback
//!
//! One type-O kidney donor, one type-A kidney recipient. There is no type-A
//! kidney bucket, so the engine falls back to the universal bucket.
//!
//! Walk-through for the demo run:
//!   1. Donor 1 (O, age 30) is indexed under (O, Kidney)
//!   2. Recipient 10 (A, age 32, BMI 22.9) scores urgency 8
//!   3. Bucket (A, Kidney) is absent → candidates come from (O, Kidney)
//!   4. Compatibility = (5 − 2/10) + 2 = 6.8
//!   5. Donor 1 is removed from (O, Kidney); the bucket is deleted

use serde_json::json;

use allograft_contracts::{
    error::AllograftResult,
    ingest::{IngestOptions, Role},
    matching::MatchReport,
};
use allograft_scoring::ScoringPolicy;

use crate::mock_data::load;

/// Run the engine on the single donor/recipient pair.
pub fn evaluate() -> AllograftResult<MatchReport> {
    let options = IngestOptions::default();
    let donors = load(
        json!([{ "id": 1, "bloodType": "O", "organ": "Kidney", "disease": "no", "age": 30 }]),
        Role::Donor,
        &options,
    )?;
    let recipients = load(
        json!([{ "id": 10, "bloodType": "A", "organ": "Kidney", "age": 32,
                 "weight": 70, "height": 1.75, "disease": "no" }]),
        Role::Recipient,
        &options,
    )?;

    ScoringPolicy::default().into_engine().run(&donors, &recipients)
}

/// Run Scenario 1 and print each step of the allocation.
pub fn run_scenario() -> AllograftResult<()> {
    println!("=== Scenario 1: Universal Donor Fallback ===");
    println!();
    println!("  Donor 1:      O, Kidney, age 30, healthy");
    println!("  Recipient 10: A, Kidney, age 32, 70 kg, 1.75 m, healthy");
    println!();

    let report = evaluate()?;

    for m in &report.matches {
        println!("  Recipient urgency:     {}", m.recipient.urgency);
        println!("  Exact bucket (A):      absent → universal bucket (O) used");
        println!(
            "  Match:                 donor {} → recipient {}",
            m.donor.id, m.recipient.id
        );
        println!("  Compatibility score:   {:.2}", m.compatibility_score);
    }
    for u in &report.unmatched {
        println!("  UNMATCHED: recipient {} ({})", u.recipient.id, u.reason);
    }

    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
