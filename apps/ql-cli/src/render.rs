//! Plain-text rendering of analysis reports.

use ql_app::{AnalysisReport, ChannelsReport, GridReport, StudyReport};
use ql_metrics::{Metric, MetricRecord};
use ql_sweep::{Hole, PointOutcome, SweepPoint};
use std::fmt::{self, Display, Formatter};

/// Text form of a whole study run.
pub struct StudyText<'a>(pub &'a StudyReport);

/// Text form of one analysis report.
pub struct AnalysisText<'a>(pub &'a AnalysisReport);

pub fn render_study(report: &StudyReport) -> String {
    StudyText(report).to_string()
}

pub fn render_analysis(report: &AnalysisReport) -> String {
    AnalysisText(report).to_string()
}

impl Display for StudyText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Study: {}", report.name)?;
        for (idx, entry) in report.analyses.iter().enumerate() {
            writeln!(f, "\n[{}] {}", idx, entry.kind)?;
            match (&entry.report, &entry.error) {
                (Some(r), _) => write!(f, "{}", AnalysisText(r))?,
                (None, Some(e)) => writeln!(f, "  ✗ {}", e)?,
                (None, None) => {}
            }
        }
        let failed = report.num_failed();
        if failed == 0 {
            writeln!(f, "\n✓ {} analyses completed", report.analyses.len())
        } else {
            writeln!(
                f,
                "\n✗ {} of {} analyses failed",
                failed,
                report.analyses.len()
            )
        }
    }
}

impl Display for AnalysisText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            AnalysisReport::Repair(r) => {
                writeln!(f, "  Least squares: {}", Vector(r.least_squares.as_slice()))?;
                writeln!(f, "  Exact:         {}", Vector(r.exact.as_slice()))?;
                let c = &r.comparison;
                writeln!(
                    f,
                    "  Base:     p = {}  income = {}",
                    Vector(c.base_probabilities.as_slice()),
                    c.base_income
                )?;
                writeln!(
                    f,
                    "  Adjusted: p = {}  income = {}",
                    Vector(c.adjusted_probabilities.as_slice()),
                    c.adjusted_income
                )
            }
            AnalysisReport::SingleServer(r) => {
                writeln!(f, "  Probabilities: {}", Vector(r.probabilities.as_slice()))?;
                metrics(f, &r.metrics)?;
                let e = &r.economics;
                writeln!(f, "  Active hours:      {:.4}", e.active_hours)?;
                writeln!(f, "  Clients served:    {:.4}", e.clients_served)?;
                writeln!(
                    f,
                    "  Per master:        gross {:.2}  net {:.2}",
                    e.gross_per_master, e.net_per_master
                )?;
                writeln!(
                    f,
                    "  Shop total:        gross {:.2}  net {:.2}",
                    e.gross_total, e.net_total
                )
            }
            AnalysisReport::Channels(r) => channels(f, r),
            AnalysisReport::Priority(m) => {
                writeln!(
                    f,
                    "  Loads: y1 = {:.4}  y2 = {:.4}  y = {:.4}",
                    m.load_priority, m.load_regular, m.load_total
                )?;
                writeln!(
                    f,
                    "  Priority: wait {:.4}  in system {:.4}",
                    m.wait_priority, m.system_priority
                )?;
                writeln!(
                    f,
                    "  Regular:  wait {:.4}  in system {:.4}",
                    m.wait_regular, m.system_regular
                )
            }
            AnalysisReport::TwoPhase(r) => {
                writeln!(f, "  Effective service rate: {:.4}", r.effective_service)?;
                writeln!(f, "  Load: {:.4}", r.load)?;
                writeln!(f, "  Probabilities: {}", Vector(r.probabilities.as_slice()))?;
                metrics(f, &r.metrics)
            }
            AnalysisReport::CapacityGrid(g) => grid(f, g, "capacity", "service time (s)"),
            AnalysisReport::SingleServerGrid(g) => grid(f, g, "arrival", "service"),
        }
    }
}

struct Vector<'a>(&'a [f64]);

impl Display for Vector<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", v)?;
        }
        write!(f, "]")
    }
}

fn metrics(f: &mut Formatter<'_>, record: &MetricRecord) -> fmt::Result {
    for (metric, value) in record.populated() {
        writeln!(f, "  {:<26} {:.6}", metric.description(), value)?;
    }
    Ok(())
}

fn hole(h: &Hole) -> String {
    match h {
        Hole::Unstable { message } => format!("unstable ({})", message),
        Hole::Undefined { metric, message } => format!("{} undefined ({})", metric, message),
        Hole::Invalid { message } => format!("invalid ({})", message),
    }
}

fn channels(f: &mut Formatter<'_>, r: &ChannelsReport) -> fmt::Result {
    writeln!(
        f,
        "  {:>3} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "c", "p0", "pi", "A", "L", "W"
    )?;
    for point in r.sweep.iter() {
        match &point.outcome {
            PointOutcome::Metrics(m) => {
                let cell = |metric: Metric| {
                    m.get(metric)
                        .map(|v| format!("{:.6}", v))
                        .unwrap_or_else(|| "-".to_string())
                };
                writeln!(
                    f,
                    "  {:>3} {:>10} {:>10} {:>10} {:>10} {:>10}",
                    point.params,
                    cell(Metric::P0),
                    cell(Metric::LossProbability),
                    cell(Metric::A),
                    cell(Metric::LQueue),
                    cell(Metric::WQueue)
                )?;
            }
            PointOutcome::Hole(h) => writeln!(f, "  {:>3} {}", point.params, hole(h))?,
        }
    }
    if let Some(c) = r.stopped_at {
        writeln!(f, "  stopped: {} channels cannot carry the load", c)?;
    }
    Ok(())
}

fn grid_point(
    f: &mut Formatter<'_>,
    point: &SweepPoint<(f64, f64)>,
    row: &str,
    col: &str,
) -> fmt::Result {
    let (r, c) = point.params;
    writeln!(f, "  {} = {:.4}, {} = {:.4}", row, r, col, c)?;
    match &point.outcome {
        PointOutcome::Metrics(m) => metrics(f, m),
        PointOutcome::Hole(h) => writeln!(f, "    {}", hole(h)),
    }
}

fn grid(f: &mut Formatter<'_>, g: &GridReport, row: &str, col: &str) -> fmt::Result {
    writeln!(
        f,
        "  Grid {} x {}: {} evaluated, {} holes",
        g.rows, g.cols, g.successful, g.holes
    )?;
    if let Some(point) = &g.selected {
        writeln!(f, "  Nearest point:")?;
        grid_point(f, point, row, col)?;
    }
    if let Some(full) = &g.grid {
        for point in full.result.iter() {
            grid_point(f, point, row, col)?;
        }
    }
    Ok(())
}
