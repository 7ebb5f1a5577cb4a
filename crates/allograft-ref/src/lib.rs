//! # allograft-ref
//!
//! Reference runtime for the allograft allocation engine.
//!
//! Demonstrates four allocation scenarios using mock data:
//!
//! 1. **Universal Donor Fallback**: a type-A recipient served from the
//!    type-O bucket.
//! 2. **Contested Organ**: two recipients, one liver; urgency decides.
//! 3. **Waitlist Allocation**: the mock registry end to end, with every
//!    decision kind recorded on the audit chain.
//! 4. **Benchmark Run**: one timed engine invocation over a synthetic cohort.
//!
//! All data is hardcoded and fictional. No external services are contacted.

pub mod mock_data;
pub mod scenarios;

// ── Tests ─────────────────────────────────────────────────────────────────────
