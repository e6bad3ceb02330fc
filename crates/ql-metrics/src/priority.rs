//! One server, two customer classes, non-preemptive priority.
//!
//! The priority class waits only behind its own load; the regular class
//! also absorbs the priority load. These are closed forms, not a special
//! case of the birth-death recurrence.

use crate::error::{MetricsError, MetricsResult};
use crate::record::Metric;
use ql_chain::ChainError;
use ql_core::ensure_positive;
use serde::Serialize;

/// Arrival rates and mean service times of both classes, in one time unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityInput {
    pub arrival_priority: f64,
    pub arrival_regular: f64,
    pub service_time_priority: f64,
    pub service_time_regular: f64,
}

impl Default for PriorityInput {
    /// λ1 = 0.1, λ2 = 0.2 per hour; t1 = 1 h, t2 = 2.5 h.
    fn default() -> Self {
        Self {
            arrival_priority: 0.1,
            arrival_regular: 0.2,
            service_time_priority: 1.0,
            service_time_regular: 2.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityMetrics {
    /// Load of the priority class y1
    pub load_priority: f64,
    /// Load of the regular class y2
    pub load_regular: f64,
    /// y1 + y2
    pub load_total: f64,
    pub wait_priority: f64,
    pub system_priority: f64,
    pub wait_regular: f64,
    pub system_regular: f64,
}

pub fn priority_metrics(input: &PriorityInput) -> MetricsResult<PriorityMetrics> {
    let lambda1 = ensure_positive(input.arrival_priority, "priority arrival rate")
        .map_err(ChainError::from)?;
    let lambda2 = ensure_positive(input.arrival_regular, "regular arrival rate")
        .map_err(ChainError::from)?;
    let t1 = ensure_positive(input.service_time_priority, "priority service time")
        .map_err(ChainError::from)?;
    let t2 = ensure_positive(input.service_time_regular, "regular service time")
        .map_err(ChainError::from)?;

    let mu1 = 1.0 / t1;
    let mu2 = 1.0 / t2;
    let y1 = lambda1 / mu1;
    let y2 = lambda2 / mu2;
    let y = y1 + y2;

    if y >= 1.0 {
        // Capacity: the total arrival rate that would bring y to 1 at this mix
        let arrival = lambda1 + lambda2;
        return Err(ChainError::Instability {
            arrival,
            capacity: arrival / y,
        }
        .into());
    }
    if 1.0 - y1 <= 0.0 {
        return Err(MetricsError::Undefined {
            metric: Metric::WQueue,
            reason: "priority load is at or above 1",
        });
    }

    let wait_priority = y1 / (mu1 * (1.0 - y1));
    let wait_regular = (1.0 / mu2) * (((mu2 / mu1) * (y1 / (1.0 - y)) + y) / (1.0 - y));

    Ok(PriorityMetrics {
        load_priority: y1,
        load_regular: y2,
        load_total: y,
        wait_priority,
        system_priority: wait_priority + t1,
        wait_regular,
        system_regular: wait_regular + t2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fixture() {
        let m = priority_metrics(&PriorityInput::default()).unwrap();
        assert!((m.load_priority - 0.1).abs() < 1e-12);
        assert!((m.load_total - 0.6).abs() < 1e-12);
        assert!((m.wait_priority - 0.1 / 0.9).abs() < 1e-12);
        assert!((m.wait_priority - 0.111).abs() < 0.001);
        // 2.5 · ((0.4 · 0.1/0.4) + 0.6) / 0.4
        assert!((m.wait_regular - 4.375).abs() < 1e-9);
        assert!((m.system_priority - (0.1 / 0.9 + 1.0)).abs() < 1e-12);
        assert!((m.system_regular - 6.875).abs() < 1e-9);
    }

    #[test]
    fn regular_class_waits_longer() {
        let m = priority_metrics(&PriorityInput {
            service_time_regular: 1.0,
            ..PriorityInput::default()
        })
        .unwrap();
        assert!(m.wait_regular > m.wait_priority);
    }

    #[test]
    fn saturated_server_is_unstable() {
        let input = PriorityInput {
            arrival_regular: 0.4,
            ..PriorityInput::default()
        };
        // y = 0.1 + 1.0
        let err = priority_metrics(&input).unwrap_err();
        assert!(err.is_instability());
    }

    #[test]
    fn zero_service_time_is_rejected() {
        let input = PriorityInput {
            service_time_priority: 0.0,
            ..PriorityInput::default()
        };
        assert!(matches!(
            priority_metrics(&input),
            Err(MetricsError::Chain(ChainError::Model { .. }))
        ));
    }
}
