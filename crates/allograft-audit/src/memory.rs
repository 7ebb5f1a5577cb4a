//! In-memory implementation of `AuditWriter`.
//!
//! `InMemoryAuditWriter` keeps all events in a `Vec` behind a `Mutex`, so the
//! engine can write through a shared reference while the caller keeps an
//! `Arc` handle for inspection.
//!
//! Use `export_log()` to snapshot the chain and `verify_integrity()` to
//! confirm it has not been tampered with in memory.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::info;

use allograft_contracts::{
    allocation::AllocationRecord,
    error::{AllograftError, AllograftResult},
    matching::MatchRunId,
};
use allograft_core::traits::AuditWriter;

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
};

pub(crate) struct InMemoryState {
    /// All events written so far, in append order.
    pub(crate) events: Vec<AuditEvent>,

    /// The `this_hash` of the last written event, or `GENESIS_HASH` before
    /// any event has been written.
    pub(crate) last_hash: String,
}

/// An in-memory, append-only audit writer backed by a SHA-256 hash chain.
///
/// One writer may record any number of runs; each record carries its run id.
pub struct InMemoryAuditWriter {
    pub(crate) state: Mutex<InMemoryState>,
}

impl Default for InMemoryAuditWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuditWriter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                events: Vec::new(),
                last_hash: AuditEvent::GENESIS_HASH.to_string(),
            }),
        }
    }

    /// Export a copy of the chain as it stands.
    pub fn export_log(&self) -> AuditLog {
        let state = self.read_state();
        let terminal_hash = state
            .events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        AuditLog {
            events: state.events.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        }
    }

    /// Events recorded for one run, in decision order.
    pub fn events_for(&self, run_id: &MatchRunId) -> Vec<AuditEvent> {
        self.read_state()
            .events
            .iter()
            .filter(|e| &e.record.run_id == run_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_state().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verify that the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.read_state().events)
    }

    /// Read access survives a poisoned lock.
    fn read_state(&self) -> MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> AllograftResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| AllograftError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })
    }
}

impl AuditWriter for InMemoryAuditWriter {
    /// Append one allocation record to the hash chain.
    ///
    /// Returns `Err(AuditWriteFailed)` only if the internal mutex is poisoned.
    fn write(&self, record: &AllocationRecord) -> AllograftResult<()> {
        let mut state = self.write_state()?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.events.len() as u64;
        let this_hash = hash_event(sequence, record, &prev_hash);

        state.events.push(AuditEvent {
            sequence,
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        Ok(())
    }

    /// Log a summary of the run. Nothing to flush for the in-memory writer.
    fn finalize(&self, run_id: &MatchRunId) -> AllograftResult<()> {
        let state = self.write_state()?;
        let run_events = state
            .events
            .iter()
            .filter(|e| &e.record.run_id == run_id)
            .count();

        info!(
            run_id = %run_id,
            run_events,
            chain_length = state.events.len(),
            terminal_hash = %state.last_hash,
            "allocation audit finalized"
        );

        Ok(())
    }
}
