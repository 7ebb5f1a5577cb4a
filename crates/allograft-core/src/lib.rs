//! # allograft-core
//!
//! The allocation engine for allograft.
//!
//! This crate provides:
//! - The three trait seams (`UrgencyScorer`, `CompatibilityScorer`, `AuditWriter`)
//! - `DonorPool`, the per-invocation index of eligible, unassigned donors
//! - `MatchEngine`, which ranks recipients and greedily assigns donors
//! - `BenchmarkHarness`, which times one engine invocation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use allograft_core::{MatchEngine, BenchmarkHarness};
//!
//! let engine = MatchEngine::new(Box::new(urgency), Box::new(compatibility));
//! let matches = engine.match_donors(&donors, &recipients)?;
//! let report = BenchmarkHarness::new(&engine).run(&donors, &recipients)?;
//! ```

pub mod benchmark;
pub mod engine;
pub mod pool;
pub mod traits;

pub use benchmark::BenchmarkHarness;
pub use engine::MatchEngine;
pub use pool::{DonorPool, PoolKey};
