use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Validating,
    RunningAnalysis { index: usize, kind: &'static str },
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub total_analyses: usize,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(
        stage: RunStage,
        total_analyses: usize,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            stage,
            total_analyses,
            elapsed_wall_s,
            message,
        }
    }
}
