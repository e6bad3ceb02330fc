//! Error types for the ql-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// behind one interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Study error: {0}")]
    Study(String),

    #[error("Failed to read study file: {path}")]
    StudyFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write study file: {path}")]
    StudyFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Study validation failed: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Unstable system: {0}")]
    Unstable(String),

    #[error("Metric error: {0}")]
    Metrics(String),

    #[error("Sweep error: {0}")]
    Sweep(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for ql-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn is_unstable(&self) -> bool {
        matches!(self, AppError::Unstable(_))
    }
}

// Conversions from backend error types
impl From<ql_project::ProjectError> for AppError {
    fn from(err: ql_project::ProjectError) -> Self {
        match err {
            ql_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Study(other.to_string()),
        }
    }
}

impl From<ql_chain::ChainError> for AppError {
    fn from(err: ql_chain::ChainError) -> Self {
        if err.is_instability() {
            AppError::Unstable(err.to_string())
        } else {
            AppError::Model(err.to_string())
        }
    }
}

impl From<ql_metrics::MetricsError> for AppError {
    fn from(err: ql_metrics::MetricsError) -> Self {
        match err {
            ql_metrics::MetricsError::Chain(e) => e.into(),
            other => AppError::Metrics(other.to_string()),
        }
    }
}

impl From<ql_sweep::SweepError> for AppError {
    fn from(err: ql_sweep::SweepError) -> Self {
        AppError::Sweep(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instability_keeps_its_kind() {
        let err: AppError = ql_metrics::MetricsError::from(ql_chain::ChainError::Instability {
            arrival: 3.0,
            capacity: 3.0,
        })
        .into();
        assert!(err.is_unstable());

        let err: AppError = ql_chain::ChainError::model("bad").into();
        assert!(matches!(err, AppError::Model(_)));
    }
}
