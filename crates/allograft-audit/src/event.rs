//! Audit event and log types.
//!
//! `AuditEvent` is a single entry in the hash chain. It wraps an
//! `AllocationRecord` with sequence numbering and the SHA-256 hashes that make
//! tampering detectable. `AuditLog` is the snapshot produced on export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use allograft_contracts::allocation::AllocationRecord;

/// A single entry in the allocation hash chain.
///
/// Each event commits to the previous one via `prev_hash`. Modifying any
/// field, including those of the embedded `record`, invalidates `this_hash`
/// and every later `prev_hash`, which `verify_chain` detects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0. Spans runs.
    pub sequence: u64,

    /// The allocation decision being recorded.
    pub record: AllocationRecord,

    /// SHA-256 hash (hex) of the previous event, or `GENESIS_HASH` for the
    /// first event.
    pub prev_hash: String,

    /// SHA-256 hash (hex) over (sequence, prev_hash, canonical JSON of record).
    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// An exported copy of the chain.
///
/// `terminal_hash` is the `this_hash` of the last event and commits to the
/// whole log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    /// All events in chain order (sequence 0 first).
    pub events: Vec<AuditEvent>,

    /// Wall-clock time (UTC) the log was exported.
    pub exported_at: DateTime<Utc>,

    /// Empty string if the log is empty.
    pub terminal_hash: String,
}
