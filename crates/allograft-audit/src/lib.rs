//! # allograft-audit
//!
//! Append-only, SHA-256 hash-chained audit trail of allocation decisions.
//!
//! ## Overview
//!
//! Every decision the match engine makes is wrapped in an `AuditEvent` that
//! links to the previous event via its SHA-256 hash. Tampering with any
//! event, even a single byte, breaks the chain and is detected by
//! `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use allograft_audit::InMemoryAuditWriter;
//!
//! let audit = Arc::new(InMemoryAuditWriter::new());
//! let engine = policy.into_engine().with_audit(Box::new(Arc::clone(&audit)));
//! let report = engine.run(&donors, &recipients)?;
//!
//! assert!(audit.verify_integrity());
//! let decisions = audit.events_for(&report.run_id);
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use memory::InMemoryAuditWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────
