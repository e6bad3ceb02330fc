//! Two-dimensional parameter grids evaluated in parallel.

use crate::axis::linspace;
use crate::error::SweepError;
use crate::result::{GridSweepResult, PointOutcome, SweepPoint, SweepResult};
use ql_chain::{BirthDeathSpec, ChainSpec, solve};
use ql_core::{as_per_minute, rate_from_mean_time, seconds};
use ql_metrics::{LossRule, MetricRecord, MetricsError, derive_metrics, derive_metrics_with};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Evaluate `eval(row, col)` for every pair, row-major. Points run on the
/// rayon pool; the output order does not depend on completion order.
pub fn grid_sweep<F>(rows: &[f64], cols: &[f64], eval: F) -> GridSweepResult
where
    F: Fn(f64, f64) -> Result<MetricRecord, MetricsError> + Sync,
{
    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .flat_map(|&r| cols.iter().map(move |&c| (r, c)))
        .collect();

    let points: Vec<SweepPoint<(f64, f64)>> = pairs
        .par_iter()
        .map(|&(r, c)| SweepPoint {
            params: (r, c),
            outcome: PointOutcome::from(eval(r, c)),
        })
        .collect();

    let result = SweepResult { points };
    let holes = result.num_holes();
    if holes > 0 {
        warn!(holes, total = result.len(), "grid sweep has holes");
    }
    debug!(
        rows = rows.len(),
        cols = cols.len(),
        successful = result.num_successful(),
        "grid sweep finished"
    );

    GridSweepResult {
        rows: rows.to_vec(),
        cols: cols.to_vec(),
        result,
    }
}

/// Waiting-room capacity against mean service time for a finite queue.
/// Rows are capacities, columns service times in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityServiceGrid {
    pub arrival_per_minute: f64,
    pub channels: usize,
    pub capacities: Vec<usize>,
    pub service_times_s: Vec<f64>,
    pub loss_rule: LossRule,
}

impl Default for CapacityServiceGrid {
    fn default() -> Self {
        Self {
            arrival_per_minute: 4.0,
            channels: 1,
            capacities: (2..=100).collect(),
            service_times_s: linspace(10.0, 250.0, 100),
            loss_rule: LossRule::ScaledTopState,
        }
    }
}

impl CapacityServiceGrid {
    pub fn validate(&self) -> Result<(), SweepError> {
        if !(self.arrival_per_minute.is_finite() && self.arrival_per_minute > 0.0) {
            return Err(SweepError::InvalidConfiguration(format!(
                "arrival rate must be positive, got {}",
                self.arrival_per_minute
            )));
        }
        if self.channels == 0 {
            return Err(SweepError::InvalidConfiguration(
                "channel count must be at least 1".to_string(),
            ));
        }
        if self.capacities.is_empty() || self.service_times_s.is_empty() {
            return Err(SweepError::InvalidConfiguration(
                "grid axes must not be empty".to_string(),
            ));
        }
        if let Some(t) = self
            .service_times_s
            .iter()
            .find(|t| !(t.is_finite() && **t > 0.0))
        {
            return Err(SweepError::InvalidConfiguration(format!(
                "service times must be positive, got {}",
                t
            )));
        }
        Ok(())
    }

    /// Service rate per minute for a mean service time in seconds.
    pub fn service_rate(service_time_s: f64) -> f64 {
        as_per_minute(rate_from_mean_time(seconds(service_time_s)))
    }

    fn evaluate(&self, capacity: f64, service_time_s: f64) -> Result<MetricRecord, MetricsError> {
        let spec = BirthDeathSpec::with_waiting(
            self.arrival_per_minute,
            Self::service_rate(service_time_s),
            self.channels,
            capacity as usize,
        );
        let p = solve(&ChainSpec::BirthDeath(spec))?;
        derive_metrics_with(&p, &ChainSpec::BirthDeath(spec), self.loss_rule)
    }
}

/// Sweep every `(capacity, service time)` pair. Points with `λ ≥ nμ` are holes.
pub fn sweep_capacity_service(grid: &CapacityServiceGrid) -> Result<GridSweepResult, SweepError> {
    grid.validate()?;
    let rows: Vec<f64> = grid.capacities.iter().map(|&m| m as f64).collect();
    Ok(grid_sweep(&rows, &grid.service_times_s, |m, t| {
        grid.evaluate(m, t)
    }))
}

/// Arrival rate against service rate for a single-server station.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleServerGrid {
    pub arrivals: Vec<f64>,
    pub services: Vec<f64>,
}

impl Default for SingleServerGrid {
    fn default() -> Self {
        Self {
            arrivals: linspace(1.5, 3.5, 50),
            services: linspace(2.5, 4.5, 50),
        }
    }
}

impl SingleServerGrid {
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.arrivals.is_empty() || self.services.is_empty() {
            return Err(SweepError::InvalidConfiguration(
                "grid axes must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sweep the M/M/1 model over `arrivals × services`; `ρ ≥ 1` points are holes.
pub fn sweep_single_server(grid: &SingleServerGrid) -> Result<GridSweepResult, SweepError> {
    grid.validate()?;
    Ok(grid_sweep(&grid.arrivals, &grid.services, |arrival, service| {
        let spec = ChainSpec::SingleServer { arrival, service };
        let p = solve(&spec)?;
        derive_metrics(&p, &spec)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Hole;
    use ql_metrics::Metric;

    #[test]
    fn service_time_converts_to_per_minute() {
        assert!((CapacityServiceGrid::service_rate(10.0) - 6.0).abs() < 1e-12);
        assert!((CapacityServiceGrid::service_rate(60.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn grid_is_row_major() {
        let result = grid_sweep(&[1.0, 2.0], &[10.0, 20.0, 30.0], |r, c| {
            Ok(MetricRecord {
                q: Some(r * 100.0 + c),
                ..MetricRecord::default()
            })
        });
        let q = result.result.series(Metric::Q);
        assert_eq!(
            q,
            vec![
                Some(110.0),
                Some(120.0),
                Some(130.0),
                Some(210.0),
                Some(220.0),
                Some(230.0)
            ]
        );
    }

    #[test]
    fn saturated_points_are_holes() {
        let grid = CapacityServiceGrid {
            capacities: vec![2, 3],
            service_times_s: vec![10.0, 16.0, 20.0],
            ..CapacityServiceGrid::default()
        };
        let result = sweep_capacity_service(&grid).unwrap();
        assert_eq!(result.result.len(), 6);
        for row in 0..2 {
            // χ = 4 / 6 at 10 s
            assert!(!result.at(row, 0).unwrap().outcome.is_hole());
            // χ = t / 15 ≥ 1 past 15 s
            for col in 1..3 {
                assert!(matches!(
                    result.at(row, col).unwrap().outcome,
                    PointOutcome::Hole(Hole::Unstable { .. })
                ));
            }
        }
    }

    #[test]
    fn single_server_grid_holes_at_full_load() {
        let grid = SingleServerGrid {
            arrivals: vec![1.0, 2.0, 3.0],
            services: vec![2.0, 3.0],
        };
        let result = sweep_single_server(&grid).unwrap();
        // (1,2) (1,3) (2,3) stable; (2,2) (3,2) (3,3) not
        assert_eq!(result.result.num_successful(), 3);
        assert_eq!(result.result.num_holes(), 3);
        let p = result.select(2.0, 3.0).unwrap();
        let rho = p.outcome.get(Metric::Utilization).unwrap();
        assert!((rho - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_axes_are_rejected() {
        let grid = CapacityServiceGrid {
            capacities: Vec::new(),
            ..CapacityServiceGrid::default()
        };
        assert!(sweep_capacity_service(&grid).is_err());
        let grid = SingleServerGrid {
            arrivals: Vec::new(),
            services: vec![1.0],
        };
        assert!(sweep_single_server(&grid).is_err());
    }
}
