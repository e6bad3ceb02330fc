//! Closed forms for stations with an unlimited queue.
//!
//! The infinite tail is reported as one lumped state: the returned vector has
//! an entry per partially busy state followed by the probability that all
//! channels are busy.

use crate::error::{ChainError, ChainResult};
use crate::vector::SteadyStateVector;
use ql_core::ensure_positive;
use tracing::debug;

fn check_capacity(arrival: f64, service: f64, channels: usize) -> ChainResult<f64> {
    ensure_positive(arrival, "arrival rate")?;
    ensure_positive(service, "service rate")?;
    if channels == 0 {
        return Err(ChainError::model("channel count must be at least 1"));
    }
    let rho = arrival / service;
    if channels as f64 - rho <= 0.0 {
        return Err(ChainError::Instability {
            arrival,
            capacity: channels as f64 * service,
        });
    }
    Ok(rho)
}

/// M/M/1: `[1 - ρ, ρ]` (idle, busy).
pub fn single_server(arrival: f64, service: f64) -> ChainResult<SteadyStateVector> {
    let rho = check_capacity(arrival, service, 1)?;
    SteadyStateVector::new(vec![1.0 - rho, rho])
}

/// Unnormalized weights `ρ^k/k!` for `k < c`, followed by the lumped
/// saturated weight `ρ^c/(c!·(c − ρ))`.
///
/// Built with the running product `term *= ρ/k` so large loads stay finite.
/// Assumes `ρ < c`.
fn multi_channel_weights(rho: f64, channels: usize) -> Vec<f64> {
    let mut weights = Vec::with_capacity(channels + 1);
    let mut term = 1.0;
    weights.push(term);
    for k in 1..channels {
        term *= rho / k as f64;
        weights.push(term);
    }
    let term_c = term * rho / channels as f64;
    weights.push(term_c / (channels as f64 - rho));
    weights
}

/// Idle probability of the c-channel station:
/// `1/p0 = Σ_{k<c} ρ^k/k! + ρ^c/(c!·(c − ρ))`.
///
/// Assumes `ρ < c`.
pub fn multi_channel_idle_probability(rho: f64, channels: usize) -> f64 {
    1.0 / multi_channel_weights(rho, channels).iter().sum::<f64>()
}

/// c channels, unlimited waiting room. Entries `0..c` are `p0·ρ^k/k!`; the
/// last entry is the saturated mass `p0·ρ^c/(c!·(c − ρ))`.
pub fn multi_channel(arrival: f64, service: f64, channels: usize) -> ChainResult<SteadyStateVector> {
    let rho = check_capacity(arrival, service, channels)?;
    let p = SteadyStateVector::from_weights(multi_channel_weights(rho, channels))?;
    debug!(channels, rho, p0 = p.idle(), "multi-channel closed form solved");
    Ok(p)
}
