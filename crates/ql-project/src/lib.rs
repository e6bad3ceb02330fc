//! ql-project: study file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_study};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Study file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyFormat {
    Yaml,
    Json,
}

impl StudyFormat {
    /// `.json` files are JSON, everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => StudyFormat::Json,
            _ => StudyFormat::Yaml,
        }
    }
}

pub fn parse_study(content: &str, format: StudyFormat) -> ProjectResult<Study> {
    let study: Study = match format {
        StudyFormat::Yaml => serde_yaml::from_str(content)?,
        StudyFormat::Json => serde_json::from_str(content)?,
    };
    validate_study(&study)?;
    Ok(study)
}

pub fn to_string(study: &Study, format: StudyFormat) -> ProjectResult<String> {
    validate_study(study)?;
    Ok(match format {
        StudyFormat::Yaml => serde_yaml::to_string(study)?,
        StudyFormat::Json => serde_json::to_string_pretty(study)?,
    })
}

pub fn load_yaml(path: &Path) -> ProjectResult<Study> {
    let content = std::fs::read_to_string(path)?;
    parse_study(&content, StudyFormat::Yaml)
}

pub fn save_yaml(path: &Path, study: &Study) -> ProjectResult<()> {
    let content = to_string(study, StudyFormat::Yaml)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Study> {
    let content = std::fs::read_to_string(path)?;
    parse_study(&content, StudyFormat::Json)
}

pub fn save_json(path: &Path, study: &Study) -> ProjectResult<()> {
    let content = to_string(study, StudyFormat::Json)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension, see [`StudyFormat::from_path`].
pub fn load_study(path: &Path) -> ProjectResult<Study> {
    match StudyFormat::from_path(path) {
        StudyFormat::Yaml => load_yaml(path),
        StudyFormat::Json => load_json(path),
    }
}
