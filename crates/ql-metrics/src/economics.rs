//! Income figures built on top of steady-state results.

use crate::error::{MetricsError, MetricsResult};
use crate::record::Metric;
use ql_chain::{
    ChainError, RateParameters, SteadyStateVector, Transition, solve_balance_exact,
};
use ql_core::{ensure_positive, round_to};
use serde::Serialize;
use tracing::debug;

/// Per-node income while working and cost while under repair, for the
/// two-node repairable system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepairEconomics {
    pub incomes: [f64; 2],
    pub repair_costs: [f64; 2],
    /// Multiplies both repair costs
    pub cost_multiplier: f64,
    /// Decimals the probabilities and the income are rounded to
    pub precision: u32,
}

impl Default for RepairEconomics {
    fn default() -> Self {
        Self {
            incomes: [10.0, 6.0],
            repair_costs: [4.0, 2.0],
            cost_multiplier: 1.0,
            precision: 2,
        }
    }
}

/// Mean income per unit time. Node 1 works in states {0, 2}, node 2 in
/// {0, 1}; each is under repair otherwise.
pub fn repair_income(p: &SteadyStateVector, econ: &RepairEconomics) -> MetricsResult<f64> {
    if p.len() != 4 {
        return Err(ChainError::model(format!(
            "repair income needs 4 states, got {}",
            p.len()
        ))
        .into());
    }
    let p = p.rounded(econ.precision)?;

    let node1_working = p.mass(&[0, 2]);
    let node2_working = p.mass(&[0, 1]);
    let node1_repairing = p.mass(&[1, 3]);
    let node2_repairing = p.mass(&[2, 3]);

    let income = node1_working * econ.incomes[0] + node2_working * econ.incomes[1]
        - node1_repairing * econ.repair_costs[0] * econ.cost_multiplier
        - node2_repairing * econ.repair_costs[1] * econ.cost_multiplier;
    Ok(round_to(income, econ.precision))
}

/// A what-if: some repair rates scaled, and repair costs multiplied.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairScenario {
    pub scaled: Vec<Transition>,
    pub rate_factor: f64,
    pub cost_multiplier: f64,
}

impl Default for RepairScenario {
    /// Doubles the 2 -> 0 and 3 -> 1 rates and both repair costs.
    fn default() -> Self {
        Self {
            scaled: vec![Transition::T20, Transition::T31],
            rate_factor: 2.0,
            cost_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairComparison {
    pub base_probabilities: SteadyStateVector,
    pub base_income: f64,
    pub adjusted_probabilities: SteadyStateVector,
    pub adjusted_income: f64,
}

pub fn compare_repair_scenarios(
    rates: &RateParameters,
    econ: &RepairEconomics,
    scenario: &RepairScenario,
) -> MetricsResult<RepairComparison> {
    let base = solve_balance_exact(rates)?;
    let base_income = repair_income(&base, econ)?;

    let adjusted_rates = rates.scaled(&scenario.scaled, scenario.rate_factor);
    let adjusted = solve_balance_exact(&adjusted_rates)?;
    let adjusted_econ = RepairEconomics {
        cost_multiplier: econ.cost_multiplier * scenario.cost_multiplier,
        ..*econ
    };
    let adjusted_income = repair_income(&adjusted, &adjusted_econ)?;

    debug!(base_income, adjusted_income, "repair scenarios compared");
    Ok(RepairComparison {
        base_probabilities: base.rounded(econ.precision)?,
        base_income,
        adjusted_probabilities: adjusted.rounded(econ.precision)?,
        adjusted_income,
    })
}

/// Working-day figures for a shop of identical single-server masters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopEconomics {
    pub shift_hours: f64,
    pub price_per_client: f64,
    /// Share of gross revenue a master keeps
    pub net_share: f64,
    pub masters: usize,
}

impl Default for ShopEconomics {
    fn default() -> Self {
        Self {
            shift_hours: 6.0,
            price_per_client: 60.0,
            net_share: 0.3,
            masters: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShopReport {
    pub active_hours: f64,
    pub clients_served: f64,
    pub gross_per_master: f64,
    pub net_per_master: f64,
    pub gross_total: f64,
    pub net_total: f64,
}

/// Arrival and service rates are per hour.
pub fn single_server_economics(
    arrival: f64,
    service: f64,
    econ: &ShopEconomics,
) -> MetricsResult<ShopReport> {
    let service = ensure_positive(service, "service rate").map_err(ChainError::from)?;
    let rho = arrival / service;
    if !(0.0..1.0).contains(&rho) {
        return Err(MetricsError::Undefined {
            metric: Metric::Utilization,
            reason: "utilization must be in [0, 1)",
        });
    }

    let active_hours = rho * econ.shift_hours;
    let clients_served = active_hours * service;
    let gross_per_master = clients_served * econ.price_per_client;
    let net_per_master = gross_per_master * econ.net_share;
    let masters = econ.masters as f64;

    Ok(ShopReport {
        active_hours,
        clients_served,
        gross_per_master,
        net_per_master,
        gross_total: gross_per_master * masters,
        net_total: net_per_master * masters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_repair_incomes() {
        let cmp = compare_repair_scenarios(
            &RateParameters::default(),
            &RepairEconomics::default(),
            &RepairScenario::default(),
        )
        .unwrap();
        assert_eq!(cmp.base_probabilities.as_slice(), &[0.4, 0.2, 0.27, 0.13]);
        assert_eq!(cmp.adjusted_probabilities.as_slice(), &[0.5, 0.25, 0.17, 0.08]);
        assert!((cmp.base_income - 8.18).abs() < 1e-9);
        assert!((cmp.adjusted_income - 7.56).abs() < 1e-9);
    }

    #[test]
    fn repair_precision_is_bounded() {
        let econ = RepairEconomics {
            precision: 309,
            ..RepairEconomics::default()
        };
        let p = solve_balance_exact(&RateParameters::default()).unwrap();
        assert!(matches!(
            repair_income(&p, &econ),
            Err(MetricsError::Chain(ChainError::Model { .. }))
        ));
    }

    #[test]
    fn repair_income_needs_four_states() {
        let p = SteadyStateVector::new(vec![0.5, 0.5]).unwrap();
        assert!(repair_income(&p, &RepairEconomics::default()).is_err());
    }

    #[test]
    fn barber_shop_day() {
        let r = single_server_economics(2.4, 3.0, &ShopEconomics::default()).unwrap();
        assert!((r.active_hours - 4.8).abs() < 1e-9);
        assert!((r.clients_served - 14.4).abs() < 1e-9);
        assert!((r.gross_per_master - 864.0).abs() < 1e-9);
        assert!((r.net_per_master - 259.2).abs() < 1e-9);
        assert!((r.gross_total - 1728.0).abs() < 1e-9);
        assert!((r.net_total - 518.4).abs() < 1e-9);
    }

    #[test]
    fn overloaded_master_has_no_figures() {
        assert!(single_server_economics(3.0, 3.0, &ShopEconomics::default()).is_err());
    }
}
