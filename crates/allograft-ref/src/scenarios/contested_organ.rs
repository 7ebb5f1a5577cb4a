//! Scenario 2: Contested Organ
//!
//! Two type-B liver recipients, one type-B liver donor. The recipient with
//! the higher urgency receives the organ even though the other is a closer
//! age match; the other recipient is reported unmatched with a reason.

use allograft_contracts::{
    error::AllograftResult,
    matching::MatchReport,
    person::{HealthStatus, Person},
};
use allograft_scoring::ScoringPolicy;

pub fn cohort() -> (Vec<Person>, Vec<Person>) {
    let donors = vec![Person::new(1, "B", "Liver", 40, HealthStatus::Healthy)];
    let recipients = vec![
        // BMI 34.6 → urgency 2. Same age as the donor.
        Person::new(20, "B", "Liver", 40, HealthStatus::Healthy)
            .with_name("A. Brandt")
            .with_body(100.0, 1.70),
        // BMI 22.5 → urgency 8.
        Person::new(21, "B", "Liver", 58, HealthStatus::Healthy)
            .with_name("N. Osei")
            .with_body(65.0, 1.70),
    ];
    (donors, recipients)
}

pub fn evaluate() -> AllograftResult<MatchReport> {
    let (donors, recipients) = cohort();
    ScoringPolicy::default().into_engine().run(&donors, &recipients)
}

/// Run Scenario 2 and print the ranking and outcome.
pub fn run_scenario() -> AllograftResult<()> {
    println!("=== Scenario 2: Contested Organ ===");
    println!();
    println!("  Donor 1:      B, Liver, age 40");
    println!("  Recipient 20: B, Liver, age 40, BMI 34.6");
    println!("  Recipient 21: B, Liver, age 58, BMI 22.5");
    println!();

    let report = evaluate()?;

    for m in &report.matches {
        println!(
            "  MATCHED:   recipient {} (urgency {}) ← donor {} [score {:.2}]",
            m.recipient.id, m.recipient.urgency, m.donor.id, m.compatibility_score
        );
    }
    for u in &report.unmatched {
        println!(
            "  UNMATCHED: recipient {} (urgency {}): {}",
            u.recipient.id, u.recipient.urgency, u.reason
        );
    }

    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
