//! Sweep configuration errors.

use thiserror::Error;

/// Raised only for a malformed sweep; per-point failures are holes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("Invalid sweep configuration: {0}")]
    InvalidConfiguration(String),
}
