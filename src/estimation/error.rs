//! Error types for the estimation engine

use thiserror::Error;

/// Caller errors that abort an estimate. No partial result is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    #[error("unrecognized unit type '{0}' (expected Marla, Kanal or SqFt)")]
    InvalidUnit(String),

    #[error("invalid value '{value}' for {field}")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}

pub type Result<T> = std::result::Result<T, EstimationError>;
