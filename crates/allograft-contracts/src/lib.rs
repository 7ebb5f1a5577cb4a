//! # allograft-contracts
//!
//! Shared types and contracts for the allograft donor allocation engine.
//!
//! All crates in the workspace import from here. No allocation logic lives in
//! this crate: only record definitions, the ingestion boundary, result
//! shapes and error types.

pub mod allocation;
pub mod error;
pub mod ingest;
pub mod matching;
pub mod person;
