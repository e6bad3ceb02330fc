//! Metric derivation from a steady-state vector and its chain.
//!
//! Waiting times use Little's law with the effective (post-rejection)
//! arrival rate `A`, not the raw `λ`.

use crate::error::{MetricsError, MetricsResult};
use crate::record::{Metric, MetricRecord};
use ql_chain::{BirthDeathSpec, ChainError, ChainSpec, SteadyStateVector};
use tracing::trace;

/// How the rejection probability is read off the distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LossRule {
    /// Mass of the highest ("system full") state.
    #[default]
    TopState,
    /// Top-state mass scaled by `ρ / n`, as used by the two-phase and
    /// capacity-grid studies.
    ScaledTopState,
}

/// Loss probability as the mass of the full state.
pub fn loss_top_state(p: &SteadyStateVector) -> f64 {
    p.top()
}

/// Loss probability `p_top · ρ / n`.
pub fn loss_scaled_top_state(p: &SteadyStateVector, load: f64, channels: usize) -> f64 {
    p.top() * load / channels as f64
}

/// Derive metrics with the default [`LossRule::TopState`].
pub fn derive_metrics(p: &SteadyStateVector, spec: &ChainSpec) -> MetricsResult<MetricRecord> {
    derive_metrics_with(p, spec, LossRule::default())
}

pub fn derive_metrics_with(
    p: &SteadyStateVector,
    spec: &ChainSpec,
    rule: LossRule,
) -> MetricsResult<MetricRecord> {
    let record = match spec {
        ChainSpec::FixedTopology(_) => {
            expect_len(p, 4, spec)?;
            MetricRecord {
                p0: Some(p.idle()),
                ..MetricRecord::default()
            }
        }
        ChainSpec::SingleServer { arrival, service } => {
            expect_len(p, 2, spec)?;
            single_server_metrics(p, *arrival, *service)?
        }
        ChainSpec::MultiChannel {
            arrival,
            service,
            channels,
        } => {
            expect_len(p, channels + 1, spec)?;
            multi_channel_metrics(p, *arrival, *service, *channels, rule)?
        }
        ChainSpec::BirthDeath(bd) => {
            expect_len(p, bd.capacity() + 1, spec)?;
            birth_death_metrics(p, bd, rule)?
        }
    };
    trace!(chain = spec.label(), ?record, "metrics derived");
    Ok(record)
}

fn expect_len(p: &SteadyStateVector, len: usize, spec: &ChainSpec) -> MetricsResult<()> {
    if p.len() != len {
        return Err(ChainError::model(format!(
            "{} chain expects {} states, vector has {}",
            spec.label(),
            len,
            p.len()
        ))
        .into());
    }
    Ok(())
}

fn positive(value: f64, metric: Metric, reason: &'static str) -> MetricsResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MetricsError::Undefined { metric, reason })
    }
}

fn loss(p: &SteadyStateVector, load: f64, channels: usize, rule: LossRule) -> f64 {
    match rule {
        LossRule::TopState => loss_top_state(p),
        LossRule::ScaledTopState => loss_scaled_top_state(p, load, channels),
    }
}

/// Shared tail for loss systems: Q, A, utilization and the Little's-law
/// quantities from a known queue length.
fn throughput_metrics(
    record: &mut MetricRecord,
    arrival: f64,
    service: f64,
    channels: usize,
    pi: f64,
    l_queue: f64,
) -> MetricsResult<()> {
    let q = 1.0 - pi;
    let a = arrival * q;
    record.loss_probability = Some(pi);
    record.q = Some(q);
    record.a = Some(a);
    record.k_busy = Some(a / (channels as f64 * service));
    record.busy_channels = Some(a / service);
    record.l_queue = Some(l_queue);

    let a = positive(a, Metric::WQueue, "effective arrival rate is zero")?;
    let w_queue = l_queue / a;
    record.w_queue = Some(w_queue);
    record.l_system = Some(l_queue + a / service);
    record.w_system = Some(w_queue + 1.0 / service);
    Ok(())
}

fn single_server_metrics(
    p: &SteadyStateVector,
    arrival: f64,
    service: f64,
) -> MetricsResult<MetricRecord> {
    let rho = arrival / service;
    let slack = positive(1.0 - rho, Metric::LQueue, "utilization is at or above 1")?;
    let l_queue = rho * rho / slack;
    let w_queue = l_queue / positive(arrival, Metric::WQueue, "arrival rate is zero")?;

    Ok(MetricRecord {
        p0: Some(p.idle()),
        utilization: Some(rho),
        l_queue: Some(l_queue),
        w_queue: Some(w_queue),
        l_system: Some(l_queue + rho),
        w_system: Some(w_queue + 1.0 / service),
        ..MetricRecord::default()
    })
}

fn multi_channel_metrics(
    p: &SteadyStateVector,
    arrival: f64,
    service: f64,
    channels: usize,
    rule: LossRule,
) -> MetricsResult<MetricRecord> {
    let rho = arrival / service;
    let c = channels as f64;
    let slack = positive(c - rho, Metric::LQueue, "load is at or above the channel count")?;
    let p0 = p.idle();
    // p0·ρ^(c+1)/(c!·(c − ρ)²), read off the lumped saturated state
    let l_queue = p.top() * rho / slack;

    let mut record = MetricRecord {
        p0: Some(p0),
        utilization: Some(rho),
        ..MetricRecord::default()
    };
    let pi = loss(p, rho, channels, rule);
    throughput_metrics(&mut record, arrival, service, channels, pi, l_queue)?;
    Ok(record)
}

fn birth_death_metrics(
    p: &SteadyStateVector,
    spec: &BirthDeathSpec,
    rule: LossRule,
) -> MetricsResult<MetricRecord> {
    let rho = spec.load();
    // Customers beyond the channels are the ones waiting
    let l_queue: f64 = p
        .iter()
        .enumerate()
        .skip(spec.channels + 1)
        .map(|(k, pk)| (k - spec.channels) as f64 * pk)
        .sum();

    let mut record = MetricRecord {
        p0: Some(p.idle()),
        utilization: Some(rho),
        ..MetricRecord::default()
    };
    let pi = loss(p, rho, spec.channels, rule);
    throughput_metrics(
        &mut record,
        spec.arrival,
        spec.service,
        spec.channels,
        pi,
        l_queue,
    )?;
    Ok(record)
}
