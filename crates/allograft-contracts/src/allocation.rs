//! Allocation decisions and their audit records.
//!
//! Every decision the engine makes during a run (excluding a donor, matching
//! a recipient, leaving a recipient unmatched) produces exactly one
//! `AllocationRecord`, handed to the configured audit writer in the order
//! the decisions were made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    matching::{MatchRunId, UnmatchedReason},
    person::PersonId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "decision")]
pub enum AllocationDecision {
    /// A disease-flagged donor was dropped before indexing.
    DonorExcluded { donor_id: PersonId },

    /// A donor was assigned to a recipient and removed from the pool.
    Matched {
        donor_id: PersonId,
        recipient_id: PersonId,
        urgency: i32,
        compatibility_score: f64,
    },

    /// A recipient was processed but no candidate donor remained.
    Unmatched {
        recipient_id: PersonId,
        reason: UnmatchedReason,
    },
}

/// An immutable record of one allocation decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// The run that made the decision.
    pub run_id: MatchRunId,
    /// Position of the decision within its run, starting at 0.
    pub step: u64,
    pub decision: AllocationDecision,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}
