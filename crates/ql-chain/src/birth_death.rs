//! Birth-death chains over the number of customers present.
//!
//! State `k` means `k` customers in the station. Arrivals move `k -> k+1`
//! at the constant rate `λ`; completions move `k -> k-1` at `min(k, c)·μ`
//! for `c` channels. The chain stops at `c + m` for `m` waiting places, so
//! an arrival that finds the station full is lost.

use crate::error::{ChainError, ChainResult};
use crate::vector::SteadyStateVector;
use ql_core::ensure_positive;
use tracing::debug;

/// A multi-channel station with a finite waiting room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthDeathSpec {
    /// Arrival rate λ
    pub arrival: f64,
    /// Service rate μ of one channel
    pub service: f64,
    /// Number of parallel channels c
    pub channels: usize,
    /// Waiting places m (0 for a pure loss system)
    pub waiting_places: usize,
}

impl BirthDeathSpec {
    /// Pure loss system (Erlang-B): arrivals finding all channels busy leave.
    pub fn loss(arrival: f64, service: f64, channels: usize) -> Self {
        Self {
            arrival,
            service,
            channels,
            waiting_places: 0,
        }
    }

    pub fn with_waiting(arrival: f64, service: f64, channels: usize, waiting_places: usize) -> Self {
        Self {
            arrival,
            service,
            channels,
            waiting_places,
        }
    }

    /// Highest reachable state.
    pub fn capacity(&self) -> usize {
        self.channels + self.waiting_places
    }

    /// Offered load `ρ = λ/μ`.
    pub fn load(&self) -> f64 {
        self.arrival / self.service
    }

    /// Completion rate in state `k`.
    pub fn death_rate(&self, k: usize) -> f64 {
        k.min(self.channels) as f64 * self.service
    }

    pub fn validate(&self) -> ChainResult<()> {
        ensure_positive(self.arrival, "arrival rate")?;
        ensure_positive(self.service, "service rate")?;
        if self.channels == 0 {
            return Err(ChainError::model("channel count must be at least 1"));
        }
        Ok(())
    }

    /// `λ < c·μ`, else [`ChainError::Instability`].
    pub fn check_stability(&self) -> ChainResult<()> {
        let capacity = self.channels as f64 * self.service;
        if self.arrival >= capacity {
            return Err(ChainError::Instability {
                arrival: self.arrival,
                capacity,
            });
        }
        Ok(())
    }
}

/// Combined rate of a preparation stage `φ` followed by service `μ`:
/// `μφ / (μ + φ)`, i.e. the reciprocal of the summed mean times.
pub fn effective_service_rate(preparation: f64, service: f64) -> ChainResult<f64> {
    let phi = ensure_positive(preparation, "preparation rate")?;
    let mu = ensure_positive(service, "service rate")?;
    Ok(mu * phi / (mu + phi))
}

/// Same as [`effective_service_rate`] from mean stage durations.
pub fn effective_service_rate_from_times(prep_time: f64, service_time: f64) -> ChainResult<f64> {
    let t_prep = ensure_positive(prep_time, "preparation time")?;
    let t_serv = ensure_positive(service_time, "service time")?;
    effective_service_rate(1.0 / t_prep, 1.0 / t_serv)
}

/// Product-form solution of a birth-death chain on `0..=capacity`:
/// `p_k = p_0 ∏_{i=1..k} λ/μ_i`.
///
/// No stability check here; a finite chain always has a distribution.
pub fn product_form<F>(arrival: f64, death_rate: F, capacity: usize) -> ChainResult<SteadyStateVector>
where
    F: Fn(usize) -> f64,
{
    ensure_positive(arrival, "arrival rate")?;

    let mut weights = Vec::with_capacity(capacity + 1);
    let mut term = 1.0;
    weights.push(term);
    for i in 1..=capacity {
        let mu_i = death_rate(i);
        if !mu_i.is_finite() || mu_i <= 0.0 {
            return Err(ChainError::model(format!(
                "service rate in state {} must be positive, got {}",
                i, mu_i
            )));
        }
        term *= arrival / mu_i;
        weights.push(term);
    }

    SteadyStateVector::from_weights(weights)
}

/// Steady state of a c-channel station with `m` waiting places.
pub fn solve_birth_death(spec: &BirthDeathSpec) -> ChainResult<SteadyStateVector> {
    spec.validate()?;
    spec.check_stability()?;
    let p = product_form(spec.arrival, |k| spec.death_rate(k), spec.capacity())?;
    debug!(
        channels = spec.channels,
        waiting = spec.waiting_places,
        p0 = p.idle(),
        "birth-death chain solved"
    );
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erlang_b_three_channels() {
        // ρ = 0.5: weights 1, 0.5, 0.125, 0.0208333
        let p = solve_birth_death(&BirthDeathSpec::loss(2.0, 4.0, 3)).unwrap();
        assert_eq!(p.len(), 4);
        let total = 1.0 + 0.5 + 0.125 + 0.5_f64.powi(3) / 6.0;
        assert!((p.idle() - 1.0 / total).abs() < 1e-12);
        assert!((p.top() - 0.5_f64.powi(3) / 6.0 / total).abs() < 1e-12);
    }

    #[test]
    fn queue_states_serve_at_full_capacity() {
        let spec = BirthDeathSpec::with_waiting(1.0, 1.0, 2, 3);
        assert_eq!(spec.capacity(), 5);
        assert_eq!(spec.death_rate(1), 1.0);
        assert_eq!(spec.death_rate(2), 2.0);
        assert_eq!(spec.death_rate(5), 2.0);
        let p = solve_birth_death(&spec).unwrap();
        // Beyond c the ratio is constant λ/(cμ) = 0.5
        assert!((p[4] / p[3] - 0.5).abs() < 1e-12);
        assert!((p[5] / p[4] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn effective_rate_combines_stages() {
        // φ = 2, μ = 0.5 -> 1 / (0.5 + 2.0) = 0.4
        let mu = effective_service_rate(2.0, 0.5).unwrap();
        assert!((mu - 0.4).abs() < 1e-12);
        let mu = effective_service_rate_from_times(0.5, 2.0).unwrap();
        assert!((mu - 0.4).abs() < 1e-12);
        assert!(effective_service_rate(0.0, 1.0).is_err());
    }

    #[test]
    fn instability_at_and_beyond_capacity() {
        let at = BirthDeathSpec::loss(12.0, 4.0, 3);
        let err = solve_birth_death(&at).unwrap_err();
        assert!(err.is_instability());
        assert_eq!(
            err,
            ChainError::Instability {
                arrival: 12.0,
                capacity: 12.0
            }
        );
        assert!(solve_birth_death(&BirthDeathSpec::loss(11.999, 4.0, 3)).is_ok());
    }

    #[test]
    fn zero_channels_is_a_model_error() {
        let err = solve_birth_death(&BirthDeathSpec::loss(1.0, 1.0, 0)).unwrap_err();
        assert!(matches!(err, ChainError::Model { .. }));
    }

    #[test]
    fn product_form_rejects_zero_rate() {
        let err = product_form(1.0, |_| 0.0, 2).unwrap_err();
        assert!(err.to_string().contains("state 1"));
    }
}
