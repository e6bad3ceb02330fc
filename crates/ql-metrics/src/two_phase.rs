//! Loss system whose channels prepare and then serve each customer.
//!
//! Both stages are exponential, so one channel behaves like a single stage
//! with rate `μφ/(μ+φ)`. The chain is Erlang-B over that rate.

use crate::derive::{LossRule, derive_metrics_with};
use crate::error::MetricsResult;
use crate::record::MetricRecord;
use ql_chain::{
    BirthDeathSpec, ChainSpec, SteadyStateVector, effective_service_rate_from_times,
    solve_birth_death,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPhaseInput {
    pub arrival: f64,
    /// Mean preparation time per customer
    pub prep_time: f64,
    /// Mean service time per customer
    pub service_time: f64,
    pub channels: usize,
}

impl Default for TwoPhaseInput {
    /// λ = 0.2, t_prep = 0.5, t_service = 2.0, 3 channels.
    fn default() -> Self {
        Self {
            arrival: 0.2,
            prep_time: 0.5,
            service_time: 2.0,
            channels: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoPhaseReport {
    pub effective_service: f64,
    pub load: f64,
    pub probabilities: SteadyStateVector,
    pub metrics: MetricRecord,
}

/// Solve and derive with the `p_n · y / n` loss rule.
pub fn two_phase_loss(input: &TwoPhaseInput) -> MetricsResult<TwoPhaseReport> {
    let mu = effective_service_rate_from_times(input.prep_time, input.service_time)?;
    let spec = BirthDeathSpec::loss(input.arrival, mu, input.channels);
    let probabilities = solve_birth_death(&spec)?;
    let metrics = derive_metrics_with(
        &probabilities,
        &ChainSpec::BirthDeath(spec),
        LossRule::ScaledTopState,
    )?;

    Ok(TwoPhaseReport {
        effective_service: mu,
        load: spec.load(),
        probabilities,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fixture() {
        let r = two_phase_loss(&TwoPhaseInput::default()).unwrap();
        assert!((r.effective_service - 0.4).abs() < 1e-12);
        assert!((r.load - 0.5).abs() < 1e-12);
        assert_eq!(r.probabilities.len(), 4);

        let total = 1.0 + 0.5 + 0.125 + 0.125 / 6.0;
        assert!((r.probabilities.idle() - 1.0 / total).abs() < 1e-12);

        let pi = (0.125 / 6.0) / total * 0.5 / 3.0;
        let m = r.metrics;
        assert!((m.loss_probability.unwrap() - pi).abs() < 1e-12);
        assert!((m.loss_probability.unwrap() - 0.00211).abs() < 1e-5);
        assert!((m.q.unwrap() - 0.9979).abs() < 1e-4);
        assert!((m.a.unwrap() - 0.2 * (1.0 - pi)).abs() < 1e-12);
        // Mean number of busy channels A / μ_eff
        assert!((m.busy_channels.unwrap() - 0.2 * (1.0 - pi) / 0.4).abs() < 1e-12);
        // No waiting room
        assert_eq!(m.l_queue, Some(0.0));
    }

    #[test]
    fn overloaded_channels_fail() {
        let input = TwoPhaseInput {
            arrival: 5.0,
            ..TwoPhaseInput::default()
        };
        assert!(two_phase_loss(&input).unwrap_err().is_instability());
    }
}
