//! Error types for the allograft allocation pipeline.
//!
//! All fallible operations return `AllograftResult<T>`. Variants carry the
//! offending record's identifier so the caller can point at the bad row.

use thiserror::Error;

/// The unified error type for the allograft workspace.
#[derive(Debug, Error)]
pub enum AllograftError {
    /// A record is missing a required field, or a numeric field could not be
    /// parsed. Raised before any scoring touches the record.
    #[error("invalid input in record {record}: {reason}")]
    InvalidInput { record: String, reason: String },

    /// A record is well-formed but violates a domain precondition
    /// (currently: height must be strictly positive for BMI).
    #[error("degenerate input in record {record}: {reason}")]
    DegenerateInput { record: String, reason: String },

    /// The audit sink could not append an allocation record.
    ///
    /// Fatal for the run: an allocation that cannot be audited is not returned.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// Scoring configuration is missing, unreadable, or inconsistent.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl AllograftError {
    pub fn invalid(record: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            record: record.to_string(),
            reason: reason.into(),
        }
    }

    pub fn degenerate(record: impl ToString, reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            record: record.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the allograft crates.
pub type AllograftResult<T> = Result<T, AllograftError>;
