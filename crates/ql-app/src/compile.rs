//! Compilation of study definitions into solver inputs.

use ql_chain::{FixedTopologyConfig, RateParameters, Transition};
use ql_metrics::{
    LossRule, PriorityInput, RepairEconomics, RepairScenario, ShopEconomics, TwoPhaseInput,
};
use ql_project::schema::{
    AxisDef, CapacityGridDef, ChannelsDef, IntRangeDef, LossRuleDef, PriorityDef, RepairDef,
    SingleServerGridDef, TwoPhaseDef,
};
use ql_sweep::{CapacityServiceGrid, ChannelSweep, SingleServerGrid, linspace};

use crate::error::{AppError, AppResult};

/// Everything the repair analysis needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairInputs {
    pub rates: RateParameters,
    pub config: FixedTopologyConfig,
    pub economics: RepairEconomics,
    pub scenario: RepairScenario,
}

pub fn compile_repair(def: &RepairDef) -> AppResult<RepairInputs> {
    let rates = RateParameters::from_named(def.rates.iter().map(|(k, v)| (k.as_str(), *v)))?;
    rates.validate()?;

    let scaled = def
        .scenario
        .scaled
        .iter()
        .map(|key| parse_transition(key))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(RepairInputs {
        rates,
        config: FixedTopologyConfig {
            precision: def.precision,
        },
        economics: RepairEconomics {
            incomes: def.incomes,
            repair_costs: def.repair_costs,
            cost_multiplier: 1.0,
            precision: def.precision,
        },
        scenario: RepairScenario {
            scaled,
            rate_factor: def.scenario.rate_factor,
            cost_multiplier: def.scenario.cost_multiplier,
        },
    })
}

fn parse_transition(key: &str) -> AppResult<Transition> {
    Transition::from_key(key)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown transition: {}", key)))
}

pub fn compile_shop(def: &ql_project::SingleServerDef) -> ShopEconomics {
    ShopEconomics {
        shift_hours: def.shift_hours,
        price_per_client: def.price_per_client,
        net_share: def.net_share,
        masters: def.masters,
    }
}

pub fn compile_channels(def: &ChannelsDef) -> ChannelSweep {
    ChannelSweep {
        arrival: def.arrival,
        service: def.service,
        max_channels: def.max_channels,
    }
}

pub fn compile_priority(def: &PriorityDef) -> PriorityInput {
    PriorityInput {
        arrival_priority: def.arrival_priority,
        arrival_regular: def.arrival_regular,
        service_time_priority: def.service_time_priority,
        service_time_regular: def.service_time_regular,
    }
}

pub fn compile_two_phase(def: &TwoPhaseDef) -> TwoPhaseInput {
    TwoPhaseInput {
        arrival: def.arrival,
        prep_time: def.prep_time,
        service_time: def.service_time,
        channels: def.channels,
    }
}

pub fn compile_loss_rule(def: LossRuleDef) -> LossRule {
    match def {
        LossRuleDef::TopState => LossRule::TopState,
        LossRuleDef::ScaledTopState => LossRule::ScaledTopState,
    }
}

fn axis_points(def: &AxisDef) -> Vec<f64> {
    linspace(def.start, def.end, def.points)
}

fn range_points(def: &IntRangeDef) -> Vec<usize> {
    (def.start..=def.end).collect()
}

pub fn compile_capacity_grid(def: &CapacityGridDef) -> CapacityServiceGrid {
    CapacityServiceGrid {
        arrival_per_minute: def.arrival_per_minute,
        channels: def.channels,
        capacities: range_points(&def.capacities),
        service_times_s: axis_points(&def.service_time_s),
        loss_rule: compile_loss_rule(def.loss_rule),
    }
}

pub fn compile_single_server_grid(def: &SingleServerGridDef) -> SingleServerGrid {
    SingleServerGrid {
        arrivals: axis_points(&def.arrival),
        services: axis_points(&def.service),
    }
}
