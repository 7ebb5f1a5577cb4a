//! Runnable allocation scenarios.
//!
//! Each scenario is a self-contained module that wires the stock scoring
//! policy into a match engine, runs it over fictional data, and prints the
//! outcome. `evaluate()` returns the raw result for tests.

pub mod benchmark_run;
pub mod contested_organ;
pub mod universal_fallback;
pub mod waitlist_allocation;
