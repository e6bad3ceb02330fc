//! Sweep results: ordered points, each a metric record or a hole.

use crate::axis::nearest_index;
use ql_metrics::{Metric, MetricRecord, MetricsError};
use serde::Serialize;

/// Why a sweep point has no metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Hole {
    /// Load at or above service capacity
    Unstable { message: String },
    /// A derived metric's denominator collapsed
    Undefined { metric: Metric, message: String },
    /// The point's parameters were rejected
    Invalid { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointOutcome {
    Metrics(MetricRecord),
    Hole(Hole),
}

impl PointOutcome {
    pub fn metrics(&self) -> Option<&MetricRecord> {
        match self {
            PointOutcome::Metrics(m) => Some(m),
            PointOutcome::Hole(_) => None,
        }
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, PointOutcome::Hole(_))
    }

    /// A single metric, `None` for holes and unpopulated metrics.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics().and_then(|m| m.get(metric))
    }
}

impl From<Result<MetricRecord, MetricsError>> for PointOutcome {
    fn from(result: Result<MetricRecord, MetricsError>) -> Self {
        match result {
            Ok(record) => PointOutcome::Metrics(record),
            Err(err) => PointOutcome::Hole(Hole::from(err)),
        }
    }
}

impl From<MetricsError> for Hole {
    fn from(err: MetricsError) -> Self {
        let message = err.to_string();
        match err {
            MetricsError::Undefined { metric, .. } => Hole::Undefined { metric, message },
            e if e.is_instability() => Hole::Unstable { message },
            _ => Hole::Invalid { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint<P> {
    pub params: P,
    pub outcome: PointOutcome,
}

/// Points in axis order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult<P> {
    pub points: Vec<SweepPoint<P>>,
}

impl<P> SweepResult<P> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn num_successful(&self) -> usize {
        self.points.iter().filter(|p| !p.outcome.is_hole()).count()
    }

    pub fn num_holes(&self) -> usize {
        self.points.iter().filter(|p| p.outcome.is_hole()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SweepPoint<P>> {
        self.points.iter()
    }

    /// One metric along the sweep, `None` where it is unavailable.
    pub fn series(&self, metric: Metric) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.outcome.get(metric)).collect()
    }
}

/// A row-major 2D sweep: `rows.len() * cols.len()` points, the column index
/// varying fastest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSweepResult {
    pub rows: Vec<f64>,
    pub cols: Vec<f64>,
    pub result: SweepResult<(f64, f64)>,
}

impl GridSweepResult {
    pub fn at(&self, row: usize, col: usize) -> Option<&SweepPoint<(f64, f64)>> {
        if row >= self.rows.len() || col >= self.cols.len() {
            return None;
        }
        self.result.points.get(row * self.cols.len() + col)
    }

    /// The grid point closest to the targets, matching each axis
    /// independently by absolute difference.
    pub fn select(&self, row_target: f64, col_target: f64) -> Option<&SweepPoint<(f64, f64)>> {
        let row = nearest_index(&self.rows, row_target)?;
        let col = nearest_index(&self.cols, col_target)?;
        self.at(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_chain::ChainError;

    fn point(params: (f64, f64), q: Option<f64>) -> SweepPoint<(f64, f64)> {
        let outcome = match q {
            Some(q) => PointOutcome::Metrics(MetricRecord {
                q: Some(q),
                ..MetricRecord::default()
            }),
            None => PointOutcome::Hole(Hole::Invalid {
                message: "test".to_string(),
            }),
        };
        SweepPoint { params, outcome }
    }

    #[test]
    fn row_major_lookup() {
        let grid = GridSweepResult {
            rows: vec![1.0, 2.0],
            cols: vec![10.0, 20.0, 30.0],
            result: SweepResult {
                points: vec![
                    point((1.0, 10.0), Some(0.1)),
                    point((1.0, 20.0), Some(0.2)),
                    point((1.0, 30.0), None),
                    point((2.0, 10.0), Some(0.4)),
                    point((2.0, 20.0), Some(0.5)),
                    point((2.0, 30.0), Some(0.6)),
                ],
            },
        };
        assert_eq!(grid.at(1, 0).unwrap().params, (2.0, 10.0));
        assert!(grid.at(2, 0).is_none());
        assert_eq!(grid.select(1.9, 24.0).unwrap().params, (2.0, 20.0));
        assert!(grid.select(0.0, 99.0).unwrap().outcome.is_hole());
        assert_eq!(grid.result.num_holes(), 1);
        assert_eq!(grid.result.num_successful(), 5);
        assert_eq!(grid.result.series(Metric::Q)[2], None);
    }

    #[test]
    fn errors_map_to_hole_kinds() {
        let unstable: Hole = MetricsError::from(ChainError::Instability {
            arrival: 2.0,
            capacity: 1.0,
        })
        .into();
        assert!(matches!(unstable, Hole::Unstable { .. }));

        let undefined: Hole = MetricsError::Undefined {
            metric: Metric::WQueue,
            reason: "effective arrival rate is zero",
        }
        .into();
        assert!(matches!(
            undefined,
            Hole::Undefined {
                metric: Metric::WQueue,
                ..
            }
        ));

        let invalid: Hole = MetricsError::from(ChainError::model("bad")).into();
        assert!(matches!(invalid, Hole::Invalid { .. }));
    }
}
