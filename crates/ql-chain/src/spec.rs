//! Chain descriptions and the solver dispatch.

use crate::birth_death::{BirthDeathSpec, solve_birth_death};
use crate::closed_form::{multi_channel, single_server};
use crate::error::ChainResult;
use crate::fixed::solve_fixed_topology;
use crate::rates::RateParameters;
use crate::vector::SteadyStateVector;

/// A solvable chain. Built fresh for each evaluation and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainSpec {
    /// The 4-state repairable system with explicit rates
    FixedTopology(RateParameters),
    /// c channels with a finite waiting room (or none)
    BirthDeath(BirthDeathSpec),
    /// One server, unlimited queue
    SingleServer { arrival: f64, service: f64 },
    /// c channels, unlimited queue
    MultiChannel {
        arrival: f64,
        service: f64,
        channels: usize,
    },
}

impl ChainSpec {
    pub fn label(&self) -> &'static str {
        match self {
            ChainSpec::FixedTopology(_) => "fixed-topology",
            ChainSpec::BirthDeath(_) => "birth-death",
            ChainSpec::SingleServer { .. } => "single-server",
            ChainSpec::MultiChannel { .. } => "multi-channel",
        }
    }

    /// Arrival rate λ, if the chain has one.
    pub fn arrival(&self) -> Option<f64> {
        match self {
            ChainSpec::FixedTopology(_) => None,
            ChainSpec::BirthDeath(bd) => Some(bd.arrival),
            ChainSpec::SingleServer { arrival, .. } | ChainSpec::MultiChannel { arrival, .. } => {
                Some(*arrival)
            }
        }
    }

    /// Per-channel service rate μ, if the chain has one.
    pub fn service(&self) -> Option<f64> {
        match self {
            ChainSpec::FixedTopology(_) => None,
            ChainSpec::BirthDeath(bd) => Some(bd.service),
            ChainSpec::SingleServer { service, .. } | ChainSpec::MultiChannel { service, .. } => {
                Some(*service)
            }
        }
    }

    pub fn channels(&self) -> Option<usize> {
        match self {
            ChainSpec::FixedTopology(_) => None,
            ChainSpec::BirthDeath(bd) => Some(bd.channels),
            ChainSpec::SingleServer { .. } => Some(1),
            ChainSpec::MultiChannel { channels, .. } => Some(*channels),
        }
    }
}

/// Solve any supported chain. Fixed topologies go through the rounded
/// least-squares path.
pub fn solve(spec: &ChainSpec) -> ChainResult<SteadyStateVector> {
    match spec {
        ChainSpec::FixedTopology(rates) => solve_fixed_topology(rates),
        ChainSpec::BirthDeath(bd) => solve_birth_death(bd),
        ChainSpec::SingleServer { arrival, service } => single_server(*arrival, *service),
        ChainSpec::MultiChannel {
            arrival,
            service,
            channels,
        } => multi_channel(*arrival, *service, *channels),
    }
}
