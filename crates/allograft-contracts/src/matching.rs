//! Results of one matching invocation.
//!
//! `MatchRecord` is the unit handed to the rendering layer. `MatchReport`
//! wraps the full outcome of a run, including why each unmatched recipient
//! went without a donor. `BenchmarkReport` adds timing metadata.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::person::{Person, PersonId};

/// Unique identifier for a single matching invocation.
///
/// Appears in every allocation audit record produced by that run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRunId(pub uuid::Uuid);

impl MatchRunId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for MatchRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One donor assigned to one recipient. Immutable once produced.
///
/// `recipient` is the scored copy: its `urgency` is the value it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub donor: Person,
    pub recipient: Person,
    /// Always within the scorer's configured bounds (default [0, 10]).
    pub compatibility_score: f64,
}

/// Why a recipient finished a run without a donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum UnmatchedReason {
    /// No remaining eligible donor offers this organ, of any blood type.
    NoDonorsForOrgan,
    /// Donors for the organ remain, but none with the recipient's blood type
    /// and none of the universal type.
    NoCompatibleBloodType,
}

impl fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedReason::NoDonorsForOrgan => f.write_str("no donors remain for this organ"),
            UnmatchedReason::NoCompatibleBloodType => {
                f.write_str("donors remain for this organ, but none with a compatible blood type")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedRecipient {
    pub recipient: Person,
    pub reason: UnmatchedReason,
}

/// Full outcome of one `MatchEngine::run` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub run_id: MatchRunId,
    /// In processing order (urgency descending, ties in input order).
    pub matches: Vec<MatchRecord>,
    /// In processing order.
    pub unmatched: Vec<UnmatchedRecipient>,
    /// Disease-flagged donors dropped before indexing, in input order.
    pub excluded_donors: Vec<PersonId>,
}

/// The asymptotic bound the engine documents for itself.
pub const MATCH_COMPLEXITY_LABEL: &str = "O(n·m·log m)";

/// One timed matching invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub matches: Vec<MatchRecord>,
    /// Wall-clock duration of the engine call, in milliseconds.
    pub execution_time_ms: f64,
    /// Fixed label, not derived from the input.
    pub complexity_label: String,
    pub donor_count: usize,
    pub recipient_count: usize,
    pub started_at: DateTime<Utc>,
}
