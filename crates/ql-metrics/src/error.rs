//! Metric derivation errors.

use crate::record::Metric;
use ql_chain::ChainError;
use thiserror::Error;

pub type MetricsResult<T> = Result<T, MetricsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// A denominator collapsed; the metric has no finite value here.
    #[error("Metric {metric} is undefined: {reason}")]
    Undefined { metric: Metric, reason: &'static str },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl MetricsError {
    pub fn is_instability(&self) -> bool {
        matches!(self, MetricsError::Chain(e) if e.is_instability())
    }
}
