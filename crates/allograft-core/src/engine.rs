//! The match engine: urgency-ranked greedy donor assignment.
//!
//! One call to [`MatchEngine::run`] executes the whole pipeline:
//!
//!   Score recipients → Rank → Index donors → Assign greedily → Audit
//!
//! Every recipient is scored before any donor is assigned, so malformed input
//! fails the run before a single decision is made or audited. The donor pool
//! is built inside the call and dropped when it returns; nothing carries over
//! between runs.

use chrono::Utc;
use tracing::{debug, info, warn};

use allograft_contracts::{
    allocation::{AllocationDecision, AllocationRecord},
    error::AllograftResult,
    matching::{MatchRecord, MatchReport, MatchRunId, UnmatchedReason, UnmatchedRecipient},
    person::Person,
};

use crate::{
    pool::DonorPool,
    traits::{AuditWriter, CompatibilityScorer, UrgencyScorer},
};

/// Drives donor allocation with a pair of scorers and an optional audit sink.
///
/// The engine itself is stateless between calls and can be reused for any
/// number of runs.
pub struct MatchEngine {
    urgency: Box<dyn UrgencyScorer>,
    compatibility: Box<dyn CompatibilityScorer>,
    audit: Option<Box<dyn AuditWriter>>,
}

/// Numbers decisions within a run and forwards them to the audit sink.
struct DecisionLog<'a> {
    run_id: &'a MatchRunId,
    audit: Option<&'a dyn AuditWriter>,
    step: u64,
}

impl DecisionLog<'_> {
    fn record(&mut self, decision: AllocationDecision) -> AllograftResult<()> {
        if let Some(audit) = self.audit {
            audit.write(&AllocationRecord {
                run_id: self.run_id.clone(),
                step: self.step,
                decision,
                timestamp: Utc::now(),
            })?;
        }
        self.step += 1;
        Ok(())
    }
}

impl MatchEngine {
    pub fn new(
        urgency: Box<dyn UrgencyScorer>,
        compatibility: Box<dyn CompatibilityScorer>,
    ) -> Self {
        Self {
            urgency,
            compatibility,
            audit: None,
        }
    }

    /// Record every allocation decision through `audit`.
    pub fn with_audit(mut self, audit: Box<dyn AuditWriter>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Score every recipient and order them by urgency, highest first.
    ///
    /// The sort is stable: recipients with equal urgency keep their input
    /// order. Returns scored copies; `recipients` is not modified.
    pub fn rank(&self, recipients: &[Person]) -> AllograftResult<Vec<Person>> {
        let mut ranked = recipients
            .iter()
            .map(|recipient| self.urgency.scored(recipient))
            .collect::<AllograftResult<Vec<_>>>()?;

        ranked.sort_by(|a, b| b.urgency.cmp(&a.urgency));

        for (position, recipient) in ranked.iter().enumerate() {
            debug!(
                recipient_id = %recipient.id,
                urgency = recipient.urgency,
                position,
                "recipient ranked"
            );
        }

        Ok(ranked)
    }

    /// Allocate donors to recipients and return matches in processing order.
    pub fn match_donors(
        &self,
        donors: &[Person],
        recipients: &[Person],
    ) -> AllograftResult<Vec<MatchRecord>> {
        Ok(self.run(donors, recipients)?.matches)
    }

    /// Allocate donors to recipients and return the full report.
    ///
    /// # Pipeline
    ///
    /// 1. Score and rank recipients (fails fast on malformed records)
    /// 2. Build a fresh donor pool, excluding disease-flagged donors
    /// 3. For each recipient in rank order, take the best-scoring donor from
    ///    the recipient's exact bucket plus the universal bucket
    /// 4. Recipients with no candidates are reported with a reason
    /// 5. Finalize the audit log for this run
    ///
    /// # Errors
    ///
    /// `InvalidInput` / `DegenerateInput` from the urgency scorer, and
    /// `AuditWriteFailed` from the audit sink. No partial report is returned.
    pub fn run(&self, donors: &[Person], recipients: &[Person]) -> AllograftResult<MatchReport> {
        let run_id = MatchRunId::new();

        info!(
            run_id = %run_id,
            donors = donors.len(),
            recipients = recipients.len(),
            "match run starting"
        );

        let ranked = self.rank(recipients)?;

        let mut log = DecisionLog {
            run_id: &run_id,
            audit: self.audit.as_deref(),
            step: 0,
        };

        let (mut pool, excluded_donors) = DonorPool::build(donors);
        for donor_id in &excluded_donors {
            log.record(AllocationDecision::DonorExcluded {
                donor_id: donor_id.clone(),
            })?;
        }

        let universal = self.compatibility.universal_blood_type();
        let mut matches = Vec::new();
        let mut unmatched = Vec::new();

        for recipient in ranked {
            let best = pool.take_best(
                &recipient.blood_type,
                &recipient.organ,
                universal,
                |donor| self.compatibility.score_compatibility(donor, &recipient),
            );

            match best {
                Some((donor, compatibility_score)) => {
                    info!(
                        run_id = %run_id,
                        donor_id = %donor.id,
                        recipient_id = %recipient.id,
                        urgency = recipient.urgency,
                        compatibility_score,
                        "donor matched"
                    );
                    log.record(AllocationDecision::Matched {
                        donor_id: donor.id.clone(),
                        recipient_id: recipient.id.clone(),
                        urgency: recipient.urgency,
                        compatibility_score,
                    })?;
                    matches.push(MatchRecord {
                        donor,
                        recipient,
                        compatibility_score,
                    });
                }
                None => {
                    let reason = if pool.has_organ(&recipient.organ) {
                        UnmatchedReason::NoCompatibleBloodType
                    } else {
                        UnmatchedReason::NoDonorsForOrgan
                    };
                    warn!(
                        run_id = %run_id,
                        recipient_id = %recipient.id,
                        organ = %recipient.organ,
                        reason = %reason,
                        "recipient left unmatched"
                    );
                    log.record(AllocationDecision::Unmatched {
                        recipient_id: recipient.id.clone(),
                        reason: reason.clone(),
                    })?;
                    unmatched.push(UnmatchedRecipient { recipient, reason });
                }
            }
        }

        if let Some(audit) = &self.audit {
            audit.finalize(&run_id)?;
        }

        info!(
            run_id = %run_id,
            matched = matches.len(),
            unmatched = unmatched.len(),
            excluded = excluded_donors.len(),
            donors_remaining = pool.len(),
            "match run complete"
        );

        Ok(MatchReport {
            run_id,
            matches,
            unmatched,
            excluded_donors,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use allograft_contracts::{
        error::{AllograftError, AllograftResult},
        person::{BloodType, HealthStatus, PersonId},
    };

    use super::*;

    // ── Mock scorers ──────────────────────────────────────────────────────────

    /// Urgency equals the recipient's weight, truncated. Missing weight is an
    /// input error, a zero weight is degenerate.
    struct WeightUrgency;

    impl UrgencyScorer for WeightUrgency {
        fn score_urgency(&self, recipient: &Person) -> AllograftResult<i32> {
            match recipient.weight {
                None => Err(AllograftError::invalid(&recipient.id, "missing weight")),
                Some(w) if w <= 0.0 => Err(AllograftError::degenerate(&recipient.id, "zero")),
                Some(w) => Ok(w as i32),
            }
        }
    }

    /// Closer ages score higher; blood type is ignored.
    struct AgeProximity {
        universal: BloodType,
    }

    impl AgeProximity {
        fn new() -> Self {
            Self {
                universal: BloodType::new("O"),
            }
        }
    }

    impl CompatibilityScorer for AgeProximity {
        fn score_compatibility(&self, donor: &Person, recipient: &Person) -> f64 {
            let gap = (donor.age.unwrap_or(0) - recipient.age.unwrap_or(0)).abs() as f64;
            (10.0 - gap).max(0.0)
        }

        fn universal_blood_type(&self) -> &BloodType {
            &self.universal
        }
    }

    /// An audit writer that records every call for later inspection.
    #[derive(Default)]
    struct RecordingAudit {
        records: Mutex<Vec<AllocationRecord>>,
        finalized: Mutex<Vec<MatchRunId>>,
    }

    impl AuditWriter for RecordingAudit {
        fn write(&self, record: &AllocationRecord) -> AllograftResult<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn finalize(&self, run_id: &MatchRunId) -> AllograftResult<()> {
            self.finalized.lock().unwrap().push(run_id.clone());
            Ok(())
        }
    }

    struct FailingAudit;

    impl AuditWriter for FailingAudit {
        fn write(&self, _record: &AllocationRecord) -> AllograftResult<()> {
            Err(AllograftError::AuditWriteFailed {
                reason: "sink offline".to_string(),
            })
        }

        fn finalize(&self, _run_id: &MatchRunId) -> AllograftResult<()> {
            Ok(())
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn engine() -> MatchEngine {
        MatchEngine::new(Box::new(WeightUrgency), Box::new(AgeProximity::new()))
    }

    fn donor(id: i64, blood_type: &str, organ: &str, age: i64) -> Person {
        Person::new(id, blood_type, organ, age, HealthStatus::Healthy)
    }

    /// `urgency` is smuggled through the weight field for `WeightUrgency`.
    fn recipient(id: i64, blood_type: &str, organ: &str, age: i64, urgency: f64) -> Person {
        Person::new(id, blood_type, organ, age, HealthStatus::Healthy).with_body(urgency, 1.7)
    }

    fn id(n: i64) -> PersonId {
        PersonId::Number(n)
    }

    fn pairs(matches: &[MatchRecord]) -> Vec<(PersonId, PersonId)> {
        matches
            .iter()
            .map(|m| (m.donor.id.clone(), m.recipient.id.clone()))
            .collect()
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn empty_donors_yield_no_matches() {
        let recipients = vec![recipient(10, "A", "Kidney", 40, 5.0)];
        let report = engine().run(&[], &recipients).unwrap();

        assert!(report.matches.is_empty());
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(report.unmatched[0].reason, UnmatchedReason::NoDonorsForOrgan);
    }

    #[test]
    fn higher_urgency_recipient_is_served_first() {
        let donors = vec![donor(1, "A", "Kidney", 40)];
        let recipients = vec![
            recipient(10, "A", "Kidney", 40, 3.0),
            recipient(11, "A", "Kidney", 60, 9.0),
        ];
        let report = engine().run(&donors, &recipients).unwrap();

        assert_eq!(pairs(&report.matches), vec![(id(1), id(11))]);
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(report.unmatched[0].recipient.id, PersonId::Number(10));
    }

    #[test]
    fn equal_urgency_keeps_input_order() {
        let recipients = vec![
            recipient(10, "A", "Kidney", 40, 5.0),
            recipient(11, "B", "Liver", 40, 7.0),
            recipient(12, "A", "Heart", 40, 5.0),
            recipient(13, "AB", "Lung", 40, 5.0),
        ];
        let ranked = engine().rank(&recipients).unwrap();
        let ids: Vec<_> = ranked.iter().map(|r| r.id.clone()).collect();

        assert_eq!(ids, vec![id(11), id(10), id(12), id(13)]);
    }

    #[test]
    fn rank_returns_scored_copies_without_touching_input() {
        let recipients = vec![recipient(10, "A", "Kidney", 40, 6.0)];
        let ranked = engine().rank(&recipients).unwrap();

        assert_eq!(ranked[0].urgency, 6);
        assert_eq!(recipients[0].urgency, 0);
    }

    #[test]
    fn diseased_donor_is_never_assigned() {
        let donors = vec![
            Person::new(1, "A", "Kidney", 40, HealthStatus::Diseased),
            donor(2, "A", "Kidney", 70),
        ];
        let recipients = vec![recipient(10, "A", "Kidney", 40, 5.0)];
        let report = engine().run(&donors, &recipients).unwrap();

        assert_eq!(pairs(&report.matches), vec![(id(2), id(10))]);
        assert_eq!(report.excluded_donors, vec![PersonId::Number(1)]);
    }

    #[test]
    fn universal_donor_serves_when_exact_bucket_missing() {
        let donors = vec![donor(1, "O", "Kidney", 40)];
        let recipients = vec![
            recipient(10, "A", "Kidney", 40, 8.0),
            recipient(11, "B", "Kidney", 40, 2.0),
        ];
        let report = engine().run(&donors, &recipients).unwrap();

        assert_eq!(pairs(&report.matches), vec![(id(1), id(10))]);
        // Consumed from its own O bucket, so nothing is left for recipient 11.
        assert_eq!(report.unmatched[0].reason, UnmatchedReason::NoDonorsForOrgan);
    }

    #[test]
    fn universal_donor_competes_with_exact_match() {
        // The O donor is a closer age match, so it wins over the exact-type donor.
        let donors = vec![donor(1, "A", "Kidney", 60), donor(2, "O", "Kidney", 41)];
        let recipients = vec![recipient(10, "A", "Kidney", 40, 5.0)];
        let report = engine().run(&donors, &recipients).unwrap();

        assert_eq!(pairs(&report.matches), vec![(id(2), id(10))]);
    }

    #[test]
    fn tied_donors_resolve_to_exact_bucket_first() {
        let donors = vec![donor(1, "O", "Kidney", 40), donor(2, "A", "Kidney", 40)];
        let recipients = vec![recipient(10, "A", "Kidney", 40, 5.0)];
        let report = engine().run(&donors, &recipients).unwrap();

        assert_eq!(pairs(&report.matches), vec![(id(2), id(10))]);
    }

    #[test]
    fn incompatible_blood_type_is_reported() {
        let donors = vec![donor(1, "B", "Kidney", 40)];
        let recipients = vec![recipient(10, "A", "Kidney", 40, 5.0)];
        let report = engine().run(&donors, &recipients).unwrap();

        assert!(report.matches.is_empty());
        assert_eq!(
            report.unmatched[0].reason,
            UnmatchedReason::NoCompatibleBloodType
        );
    }

    #[test]
    fn no_donor_is_assigned_twice() {
        let donors: Vec<Person> = (0..6)
            .map(|i| donor(i, if i % 2 == 0 { "O" } else { "A" }, "Kidney", 30 + i))
            .collect();
        let recipients: Vec<Person> = (0..10)
            .map(|i| recipient(100 + i, if i % 3 == 0 { "B" } else { "A" }, "Kidney", 35, (i + 1) as f64))
            .collect();
        let report = engine().run(&donors, &recipients).unwrap();

        let mut donor_ids: Vec<_> = report.matches.iter().map(|m| m.donor.id.to_string()).collect();
        donor_ids.sort();
        donor_ids.dedup();
        assert_eq!(donor_ids.len(), report.matches.len());
        assert_eq!(report.matches.len(), 6);
        assert_eq!(report.matches.len() + report.unmatched.len(), recipients.len());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let donors = vec![
            donor(1, "O", "Kidney", 30),
            donor(2, "A", "Kidney", 50),
            donor(3, "A", "Liver", 45),
        ];
        let recipients = vec![
            recipient(10, "A", "Kidney", 40, 4.0),
            recipient(11, "A", "Kidney", 32, 4.0),
            recipient(12, "A", "Liver", 44, 1.0),
        ];
        let engine = engine();

        let first = engine.match_donors(&donors, &recipients).unwrap();
        let second = engine.match_donors(&donors, &recipients).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_recipient_fails_before_any_decision() {
        let audit = Arc::new(RecordingAudit::default());
        let engine = engine().with_audit(Box::new(Arc::clone(&audit)));

        let donors = vec![donor(1, "A", "Kidney", 40)];
        let mut bad = recipient(11, "A", "Kidney", 40, 5.0);
        bad.weight = None;
        let recipients = vec![recipient(10, "A", "Kidney", 40, 5.0), bad];

        let err = engine.run(&donors, &recipients).unwrap_err();
        assert!(matches!(err, AllograftError::InvalidInput { .. }));
        assert!(audit.records.lock().unwrap().is_empty());
        assert!(audit.finalized.lock().unwrap().is_empty());
    }

    #[test]
    fn degenerate_recipient_surfaces_as_error() {
        let recipients = vec![recipient(10, "A", "Kidney", 40, 0.0)];
        let err = engine().run(&[], &recipients).unwrap_err();
        assert!(matches!(err, AllograftError::DegenerateInput { .. }));
    }

    #[test]
    fn every_decision_is_audited_in_order() {
        let audit = Arc::new(RecordingAudit::default());
        let engine = engine().with_audit(Box::new(Arc::clone(&audit)));

        let donors = vec![
            Person::new(1, "A", "Kidney", 40, HealthStatus::Diseased),
            donor(2, "A", "Kidney", 40),
        ];
        let recipients = vec![
            recipient(10, "A", "Kidney", 40, 9.0),
            recipient(11, "A", "Kidney", 40, 1.0),
        ];
        let report = engine.run(&donors, &recipients).unwrap();

        let records = audit.records.lock().unwrap();
        assert_eq!(records.len(), 3);
        for (idx, record) in records.iter().enumerate() {
            assert_eq!(record.step, idx as u64);
            assert_eq!(record.run_id, report.run_id);
        }
        assert!(matches!(records[0].decision, AllocationDecision::DonorExcluded { .. }));
        assert!(matches!(records[1].decision, AllocationDecision::Matched { .. }));
        assert!(matches!(records[2].decision, AllocationDecision::Unmatched { .. }));
        assert_eq!(*audit.finalized.lock().unwrap(), vec![report.run_id.clone()]);
    }

    #[test]
    fn audit_failure_aborts_the_run() {
        let engine = engine().with_audit(Box::new(FailingAudit));
        let donors = vec![donor(1, "A", "Kidney", 40)];
        let recipients = vec![recipient(10, "A", "Kidney", 40, 5.0)];

        let err = engine.run(&donors, &recipients).unwrap_err();
        assert!(matches!(err, AllograftError::AuditWriteFailed { .. }));
    }
}
