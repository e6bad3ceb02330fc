//! Fixed-topology solver for the 4-state repairable system.
//!
//! The balance matrix is singular (its columns sum to zero), so the
//! normalization `Σ p = 1` has to be added. Two ways are offered:
//! - least squares: append the normalization row and solve the normal
//!   equations `(AᵀA) p = Aᵀb`, then round for reporting;
//! - exact: replace one balance row with the normalization row and solve the
//!   square system directly.

use crate::error::{ChainError, ChainResult};
use crate::rates::{RateParameters, STATE_COUNT, Transition};
use crate::vector::SteadyStateVector;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

const LSQ_TOL: f64 = 1e-6;

/// Reporting options for the least-squares solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTopologyConfig {
    /// Decimal places kept in the reported probabilities
    pub precision: u32,
}

impl Default for FixedTopologyConfig {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

/// Build the balance matrix: `M[i][i]` is the total outflow rate of state
/// `i`, `M[i][j]` is `-rate(j -> i)`.
pub fn balance_matrix(rates: &RateParameters) -> ChainResult<DMatrix<f64>> {
    let mut m = DMatrix::<f64>::zeros(STATE_COUNT, STATE_COUNT);
    for transition in Transition::ALL {
        let rate = rates.rate(transition)?;
        let (from, to) = transition.endpoints();
        m[(from, from)] += rate;
        m[(to, from)] -= rate;
    }
    Ok(m)
}

/// Least-squares steady state, rounded to two decimals.
pub fn solve_fixed_topology(rates: &RateParameters) -> ChainResult<SteadyStateVector> {
    solve_fixed_topology_with(rates, &FixedTopologyConfig::default())
}

pub fn solve_fixed_topology_with(
    rates: &RateParameters,
    config: &FixedTopologyConfig,
) -> ChainResult<SteadyStateVector> {
    rates.validate()?;
    let m = balance_matrix(rates)?;

    // Over-determined system: 4 balance rows + normalization row
    let a = DMatrix::from_fn(STATE_COUNT + 1, STATE_COUNT, |r, c| {
        if r < STATE_COUNT { m[(r, c)] } else { 1.0 }
    });
    let mut b = DVector::<f64>::zeros(STATE_COUNT + 1);
    b[STATE_COUNT] = 1.0;

    let at = a.transpose();
    let ata = &at * &a;
    let atb = &at * &b;
    let p = ata.lu().solve(&atb).ok_or_else(|| ChainError::Numeric {
        what: "normal equations are singular".to_string(),
    })?;

    // Normal equations square the condition number; allow for it
    let exact = SteadyStateVector::with_tolerance(p.iter().copied().collect(), LSQ_TOL)?;
    let reported = exact.rounded(config.precision)?;

    let drift = (reported.sum() - 1.0).abs();
    let step = 10f64.powi(-(config.precision as i32));
    if drift > step {
        warn!(
            drift,
            precision = config.precision,
            "rounded probabilities drift from 1 by more than one step"
        );
    }
    debug!(probabilities = ?reported.as_slice(), "fixed topology solved (least squares)");

    Ok(reported)
}

/// Unrounded steady state from the balance equations plus normalization.
pub fn solve_balance_exact(rates: &RateParameters) -> ChainResult<SteadyStateVector> {
    rates.validate()?;
    let m = balance_matrix(rates)?;

    // Any 3 balance rows are independent for a connected chain; the 4th is
    // their negated sum, so it gives way to the normalization row.
    let last = STATE_COUNT - 1;
    let a = DMatrix::from_fn(STATE_COUNT, STATE_COUNT, |r, c| {
        if r < last { m[(r, c)] } else { 1.0 }
    });
    let mut b = DVector::<f64>::zeros(STATE_COUNT);
    b[last] = 1.0;

    let p = a.lu().solve(&b).ok_or_else(|| ChainError::Numeric {
        what: "balance equations are singular".to_string(),
    })?;

    let solution = SteadyStateVector::new(p.iter().copied().collect())?;
    debug!(probabilities = ?solution.as_slice(), "fixed topology solved (exact)");
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_matrix_columns_sum_to_zero() {
        let m = balance_matrix(&RateParameters::default()).unwrap();
        for c in 0..STATE_COUNT {
            let col: f64 = (0..STATE_COUNT).map(|r| m[(r, c)]).sum();
            assert!(col.abs() < 1e-12);
        }
        // Outflow of state 0 is 0->1 + 0->2
        assert_eq!(m[(0, 0)], 3.0);
        // Inflow 1 -> 0 appears negated in row 0
        assert_eq!(m[(0, 1)], -2.0);
    }

    #[test]
    fn default_rates_least_squares() {
        let p = solve_fixed_topology(&RateParameters::default()).unwrap();
        assert_eq!(p.as_slice(), &[0.4, 0.2, 0.27, 0.13]);
    }

    #[test]
    fn default_rates_exact() {
        let p = solve_balance_exact(&RateParameters::default()).unwrap();
        let expected = [0.4, 0.2, 4.0 / 15.0, 2.0 / 15.0];
        for (got, want) in p.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{} vs {}", got, want);
        }
    }

    #[test]
    fn precision_is_configurable() {
        let config = FixedTopologyConfig { precision: 4 };
        let p = solve_fixed_topology_with(&RateParameters::default(), &config).unwrap();
        assert_eq!(p.as_slice(), &[0.4, 0.2, 0.2667, 0.1333]);
    }

    #[test]
    fn precision_beyond_f64_digits_is_a_model_error() {
        let config = FixedTopologyConfig { precision: 400 };
        let err = solve_fixed_topology_with(&RateParameters::default(), &config).unwrap_err();
        assert!(matches!(err, ChainError::Model { .. }));
    }

    #[test]
    fn incomplete_rates_are_a_model_error() {
        let rates = RateParameters::empty().with(Transition::T01, 1.0);
        let err = solve_fixed_topology(&rates).unwrap_err();
        assert!(matches!(err, ChainError::Model { .. }));
    }
}
