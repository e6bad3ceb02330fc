//! Study loading, saving, validation, and introspection.

use ql_project::{Study, StudyFormat};
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Summary of an analysis for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub index: usize,
    pub kind: &'static str,
}

/// Load a study; `.json` files are JSON, anything else YAML.
pub fn load_study(path: &Path) -> AppResult<Study> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::StudyFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let study = ql_project::parse_study(&content, StudyFormat::from_path(path))?;
    Ok(study)
}

/// Save a study in the format its extension names.
pub fn save_study(path: &Path, study: &Study) -> AppResult<()> {
    let content = ql_project::to_string(study, StudyFormat::from_path(path))?;
    std::fs::write(path, content).map_err(|e| AppError::StudyFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

pub fn validate_study(study: &Study) -> AppResult<()> {
    if study.analyses.is_empty() {
        return Err(AppError::Validation(
            "Study must have at least one analysis".to_string(),
        ));
    }
    ql_project::validate_study(study).map_err(|e| AppError::Validation(e.to_string()))
}

pub fn list_analyses(study: &Study) -> Vec<AnalysisSummary> {
    study
        .analyses
        .iter()
        .enumerate()
        .map(|(index, a)| AnalysisSummary {
            index,
            kind: a.kind(),
        })
        .collect()
}

/// The reference study with every analysis at its default inputs.
pub fn template_study() -> Study {
    Study::default()
}

pub fn render_study(study: &Study, format: StudyFormat) -> AppResult<String> {
    Ok(ql_project::to_string(study, format)?)
}
