//! Shared application service layer for queuelab.
//!
//! Turns study definitions into solver inputs, runs them, and returns
//! serializable reports for the CLI to print.

pub mod compile;
pub mod error;
pub mod progress;
pub mod run_service;
pub mod study_service;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use run_service::{
    AnalysisEntry, AnalysisReport, ChannelsReport, GridReport, RepairReport, SingleServerReport,
    StudyReport, run_analysis, run_study, run_study_with_progress,
};
pub use study_service::{
    AnalysisSummary, list_analyses, load_study, render_study, save_study, template_study,
    validate_study,
};
