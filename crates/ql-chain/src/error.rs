//! Error types for chain solving.

use ql_core::QlError;
use thiserror::Error;

/// Errors that can occur while building or solving a chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    /// Malformed input: missing or negative rate, wrong state count, etc.
    #[error("Model error: {what}")]
    Model { what: String },

    /// Offered load meets or exceeds the service capacity.
    #[error("Unstable system: arrival rate {arrival} >= service capacity {capacity}")]
    Instability { arrival: f64, capacity: f64 },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type ChainResult<T> = Result<T, ChainError>;

impl ChainError {
    pub fn model(what: impl Into<String>) -> Self {
        ChainError::Model { what: what.into() }
    }

    pub fn is_instability(&self) -> bool {
        matches!(self, ChainError::Instability { .. })
    }
}

impl From<QlError> for ChainError {
    fn from(e: QlError) -> Self {
        ChainError::Model {
            what: e.to_string(),
        }
    }
}
