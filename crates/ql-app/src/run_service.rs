//! Study execution service.

use ql_chain::{
    ChainSpec, SteadyStateVector, solve, solve_balance_exact, solve_fixed_topology_with,
};
use ql_metrics::{
    MetricRecord, PriorityMetrics, RepairComparison, ShopReport, TwoPhaseReport,
    compare_repair_scenarios, derive_metrics, priority_metrics, single_server_economics,
    two_phase_loss,
};
use ql_project::schema::{AnalysisDef, GridSelectDef, SingleServerDef, Study};
use ql_sweep::{
    GridSweepResult, SweepPoint, SweepResult, sweep_capacity_service, sweep_channels,
    sweep_single_server,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

use crate::compile;
use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};
use crate::study_service;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairReport {
    /// Least-squares solution, rounded
    pub least_squares: SteadyStateVector,
    /// Square-system solution, rounded
    pub exact: SteadyStateVector,
    pub comparison: RepairComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleServerReport {
    pub probabilities: SteadyStateVector,
    pub metrics: MetricRecord,
    pub economics: ShopReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelsReport {
    pub arrival: f64,
    pub service: f64,
    pub sweep: SweepResult<usize>,
    /// First channel count that was unstable, if the sweep stopped early
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridReport {
    pub rows: usize,
    pub cols: usize,
    pub successful: usize,
    pub holes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SweepPoint<(f64, f64)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSweepResult>,
}

impl GridReport {
    fn new(grid: GridSweepResult, select: Option<GridSelectDef>, include_points: bool) -> Self {
        let selected = select.and_then(|s| grid.select(s.row, s.col).cloned());
        Self {
            rows: grid.rows.len(),
            cols: grid.cols.len(),
            successful: grid.result.num_successful(),
            holes: grid.result.num_holes(),
            selected,
            grid: include_points.then_some(grid),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisReport {
    Repair(RepairReport),
    SingleServer(SingleServerReport),
    Channels(ChannelsReport),
    Priority(PriorityMetrics),
    TwoPhase(TwoPhaseReport),
    CapacityGrid(GridReport),
    SingleServerGrid(GridReport),
}

/// One analysis of a study run; exactly one of `report` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisEntry {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyReport {
    pub name: String,
    pub analyses: Vec<AnalysisEntry>,
}

impl StudyReport {
    pub fn num_failed(&self) -> usize {
        self.analyses.iter().filter(|a| a.error.is_some()).count()
    }
}

/// Run a single analysis.
pub fn run_analysis(analysis: &AnalysisDef) -> AppResult<AnalysisReport> {
    let report = match analysis {
        AnalysisDef::Repair(def) => {
            let inputs = compile::compile_repair(def)?;
            let least_squares = solve_fixed_topology_with(&inputs.rates, &inputs.config)?;
            let exact = solve_balance_exact(&inputs.rates)?.rounded(def.precision)?;
            let comparison =
                compare_repair_scenarios(&inputs.rates, &inputs.economics, &inputs.scenario)?;
            AnalysisReport::Repair(RepairReport {
                least_squares,
                exact,
                comparison,
            })
        }
        AnalysisDef::SingleServer(def) => AnalysisReport::SingleServer(run_single_server(def)?),
        AnalysisDef::Channels(def) => {
            let sweep = compile::compile_channels(def);
            let result = sweep_channels(&sweep)?;
            let stopped_at = (result.len() < sweep.max_channels).then_some(result.len() + 1);
            AnalysisReport::Channels(ChannelsReport {
                arrival: sweep.arrival,
                service: sweep.service,
                sweep: result,
                stopped_at,
            })
        }
        AnalysisDef::Priority(def) => {
            AnalysisReport::Priority(priority_metrics(&compile::compile_priority(def))?)
        }
        AnalysisDef::TwoPhase(def) => {
            AnalysisReport::TwoPhase(two_phase_loss(&compile::compile_two_phase(def))?)
        }
        AnalysisDef::CapacityGrid(def) => {
            let grid = sweep_capacity_service(&compile::compile_capacity_grid(def))?;
            AnalysisReport::CapacityGrid(GridReport::new(grid, def.select, def.include_points))
        }
        AnalysisDef::SingleServerGrid(def) => {
            let grid = sweep_single_server(&compile::compile_single_server_grid(def))?;
            AnalysisReport::SingleServerGrid(GridReport::new(
                grid,
                def.select,
                def.include_points,
            ))
        }
    };
    Ok(report)
}

fn run_single_server(def: &SingleServerDef) -> AppResult<SingleServerReport> {
    let spec = ChainSpec::SingleServer {
        arrival: def.arrival,
        service: def.service,
    };
    let probabilities = solve(&spec)?;
    let metrics = derive_metrics(&probabilities, &spec)?;
    let economics = single_server_economics(def.arrival, def.service, &compile::compile_shop(def))?;
    Ok(SingleServerReport {
        probabilities,
        metrics,
        economics,
    })
}

/// Run every analysis of a study. A failing analysis is recorded in its
/// entry and does not stop the others; an invalid study fails up front.
pub fn run_study(study: &Study) -> AppResult<StudyReport> {
    run_study_with_progress(study, None)
}

pub fn run_study_with_progress(
    study: &Study,
    mut progress: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<StudyReport> {
    let start = Instant::now();
    let total = study.analyses.len();
    let mut emit = |stage: RunStage, message: Option<String>| {
        if let Some(cb) = progress.as_deref_mut() {
            cb(RunProgressEvent::stage(
                stage,
                total,
                start.elapsed().as_secs_f64(),
                message,
            ));
        }
    };

    emit(RunStage::Validating, None);
    study_service::validate_study(study)?;
    info!(study = %study.name, analyses = total, "running study");

    let mut analyses = Vec::with_capacity(total);
    for (index, analysis) in study.analyses.iter().enumerate() {
        let kind = analysis.kind();
        emit(RunStage::RunningAnalysis { index, kind }, None);
        let entry = match run_analysis(analysis) {
            Ok(report) => AnalysisEntry {
                kind,
                report: Some(report),
                error: None,
            },
            Err(e) => {
                warn!(index, kind, error = %e, "analysis failed");
                AnalysisEntry {
                    kind,
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        };
        analyses.push(entry);
    }

    let report = StudyReport {
        name: study.name.clone(),
        analyses,
    };
    emit(
        RunStage::Completed,
        Some(format!("{} failed", report.num_failed())),
    );
    info!(
        study = %study.name,
        failed = report.num_failed(),
        elapsed_s = start.elapsed().as_secs_f64(),
        "study finished"
    );
    Ok(report)
}
