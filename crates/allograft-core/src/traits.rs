//! Trait seams for the allocation pipeline.
//!
//! - `UrgencyScorer`:       ranks recipients by medical urgency
//! - `CompatibilityScorer`: rates one donor against one recipient
//! - `AuditWriter`:         records every allocation decision immutably
//!
//! The engine owns one of each (the audit writer is optional) and never
//! reaches past these traits into scoring rules or storage.

use std::sync::Arc;

use allograft_contracts::{
    allocation::AllocationRecord,
    error::AllograftResult,
    matching::MatchRunId,
    person::{BloodType, Person},
};

/// Computes a recipient's urgency contribution.
///
/// Implementations must be pure: the same recipient always yields the same
/// score, and the input record is never modified.
pub trait UrgencyScorer: Send + Sync {
    /// Return the urgency contribution for `recipient`.
    ///
    /// Fails with `InvalidInput` when a required measurement is missing and
    /// `DegenerateInput` when the measurements make the score undefined.
    fn score_urgency(&self, recipient: &Person) -> AllograftResult<i32>;

    /// Return a scored copy of `recipient` whose `urgency` is its existing
    /// urgency plus `score_urgency()`, saturating at the `i32` bounds.
    ///
    /// Calling this repeatedly on the same record gives the same copy; the
    /// caller's record is untouched.
    fn scored(&self, recipient: &Person) -> AllograftResult<Person> {
        let score = self.score_urgency(recipient)?;
        Ok(Person {
            urgency: recipient.urgency.saturating_add(score),
            ..recipient.clone()
        })
    }
}

/// Rates how well a donor suits a recipient.
pub trait CompatibilityScorer: Send + Sync {
    /// Return a bounded score; higher is a better match. Never mutates either
    /// record and never returns a non-finite value.
    fn score_compatibility(&self, donor: &Person, recipient: &Person) -> f64;

    /// The blood type whose donors may serve a recipient of any type.
    ///
    /// The engine uses it to find the fallback bucket.
    fn universal_blood_type(&self) -> &BloodType;
}

/// The allocation audit sink.
///
/// Every decision the engine makes produces exactly one `AllocationRecord`.
/// A failed write is fatal for the run.
pub trait AuditWriter: Send + Sync {
    /// Append one record. Implementations must treat this as append-only.
    fn write(&self, record: &AllocationRecord) -> AllograftResult<()>;

    /// Called once when a run has made its last decision.
    fn finalize(&self, run_id: &MatchRunId) -> AllograftResult<()>;
}

/// Lets a caller keep an inspectable handle to a writer the engine owns.
impl<T: AuditWriter + ?Sized> AuditWriter for Arc<T> {
    fn write(&self, record: &AllocationRecord) -> AllograftResult<()> {
        (**self).write(record)
    }

    fn finalize(&self, run_id: &MatchRunId) -> AllograftResult<()> {
        (**self).finalize(run_id)
    }
}
