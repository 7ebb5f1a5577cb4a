//! # allograft-scoring
//!
//! TOML-configurable urgency and compatibility scoring for allograft.
//!
//! ## Overview
//!
//! This crate provides [`ScoringPolicy`], which implements both
//! [`UrgencyScorer`](allograft_core::traits::UrgencyScorer) and
//! [`CompatibilityScorer`](allograft_core::traits::CompatibilityScorer).
//! The default policy carries the stock rules; a TOML file can override any
//! subset of them.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use allograft_scoring::ScoringPolicy;
//!
//! let policy = ScoringPolicy::from_file(Path::new("scoring.toml"))?;
//! let engine = policy.into_engine();
//! ```
//!
//! ## BMI bands
//!
//! Bands are tested in declaration order and the first containing band wins,
//! so overlapping boundaries (18.5 appears in two stock bands) resolve to the
//! earlier band.

pub mod policy;
pub mod rule;

pub use policy::ScoringPolicy;
pub use rule::{BmiBand, CompatibilityRules, ScoringConfig, UrgencyRules};

// ── Tests ─────────────────────────────────────────────────────────────────────
