//! Wall-clock timing around a single engine invocation.
//!
//! The harness does no allocation work of its own: it calls
//! [`MatchEngine::match_donors`] once and reports elapsed time, input sizes
//! and the engine's documented complexity bound.

use std::time::Instant;

use chrono::Utc;
use tracing::info;

use allograft_contracts::{
    error::AllograftResult,
    matching::{BenchmarkReport, MATCH_COMPLEXITY_LABEL},
    person::Person,
};

use crate::engine::MatchEngine;

pub struct BenchmarkHarness<'a> {
    engine: &'a MatchEngine,
}

impl<'a> BenchmarkHarness<'a> {
    pub fn new(engine: &'a MatchEngine) -> Self {
        Self { engine }
    }

    /// Time one call to the engine.
    ///
    /// Engine errors are returned unchanged; no report is produced for a
    /// failed run.
    pub fn run(&self, donors: &[Person], recipients: &[Person]) -> AllograftResult<BenchmarkReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        let matches = self.engine.match_donors(donors, recipients)?;
        let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!(
            donors = donors.len(),
            recipients = recipients.len(),
            matches = matches.len(),
            execution_time_ms,
            "benchmark complete"
        );

        Ok(BenchmarkReport {
            matches,
            execution_time_ms,
            complexity_label: MATCH_COMPLEXITY_LABEL.to_string(),
            donor_count: donors.len(),
            recipient_count: recipients.len(),
            started_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use allograft_contracts::{
        error::{AllograftError, AllograftResult},
        person::{BloodType, HealthStatus},
    };

    use super::*;
    use crate::traits::{CompatibilityScorer, UrgencyScorer};

    struct FlatUrgency;

    impl UrgencyScorer for FlatUrgency {
        fn score_urgency(&self, recipient: &Person) -> AllograftResult<i32> {
            recipient
                .height
                .map(|_| 1)
                .ok_or_else(|| AllograftError::invalid(&recipient.id, "missing height"))
        }
    }

    struct FlatCompatibility(BloodType);

    impl CompatibilityScorer for FlatCompatibility {
        fn score_compatibility(&self, _donor: &Person, _recipient: &Person) -> f64 {
            1.0
        }

        fn universal_blood_type(&self) -> &BloodType {
            &self.0
        }
    }

    fn engine() -> MatchEngine {
        MatchEngine::new(
            Box::new(FlatUrgency),
            Box::new(FlatCompatibility(BloodType::new("O"))),
        )
    }

    #[test]
    fn report_counts_inputs_and_carries_fixed_label() {
        let donors = vec![
            Person::new(1, "O", "Kidney", 30, HealthStatus::Healthy),
            Person::new(2, "B", "Liver", 30, HealthStatus::Diseased),
        ];
        let recipients = vec![
            Person::new(10, "A", "Kidney", 30, HealthStatus::Healthy).with_body(70.0, 1.7),
            Person::new(11, "A", "Heart", 30, HealthStatus::Healthy).with_body(70.0, 1.7),
            Person::new(12, "B", "Liver", 30, HealthStatus::Healthy).with_body(70.0, 1.7),
        ];
        let engine = engine();
        let report = BenchmarkHarness::new(&engine).run(&donors, &recipients).unwrap();

        assert_eq!(report.donor_count, 2);
        assert_eq!(report.recipient_count, 3);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.complexity_label, "O(n·m·log m)");
        assert!(report.execution_time_ms >= 0.0);
    }

    #[test]
    fn label_does_not_depend_on_input() {
        let engine = engine();
        let harness = BenchmarkHarness::new(&engine);
        let empty = harness.run(&[], &[]).unwrap();
        assert_eq!(empty.complexity_label, MATCH_COMPLEXITY_LABEL);
        assert_eq!(empty.donor_count, 0);
        assert!(empty.matches.is_empty());
    }

    #[test]
    fn engine_errors_pass_through() {
        let engine = engine();
        let recipients = vec![Person::new(10, "A", "Kidney", 30, HealthStatus::Healthy)];
        let err = BenchmarkHarness::new(&engine).run(&[], &recipients).unwrap_err();
        assert!(matches!(err, AllograftError::InvalidInput { .. }));
    }

    #[test]
    fn report_serialises_camel_case() {
        let engine = engine();
        let report = BenchmarkHarness::new(&engine).run(&[], &[]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("executionTimeMs").is_some());
        assert!(json.get("complexityLabel").is_some());
        assert!(json.get("recipientCount").is_some());
    }
}
