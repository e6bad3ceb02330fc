//! Steady-state probability vector.

use crate::error::{ChainError, ChainResult};
use ql_core::round_to;
use serde::Serialize;
use std::ops::Index;

/// Tolerance on `Σ p = 1` for freshly solved vectors.
pub const NORMALIZATION_TOL: f64 = 1e-9;

/// Most decimal places a vector can be rounded to. Past this an `f64`
/// carries no further digits and the scale factor heads for overflow.
pub const MAX_PRECISION: u32 = 15;

/// Long-run state probabilities indexed by state.
///
/// Immutable once built; every constructor checks the entries are
/// non-negative and finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SteadyStateVector {
    probabilities: Vec<f64>,
}

impl SteadyStateVector {
    /// Wrap a distribution that must sum to one within [`NORMALIZATION_TOL`].
    pub fn new(probabilities: Vec<f64>) -> ChainResult<Self> {
        Self::with_tolerance(probabilities, NORMALIZATION_TOL)
    }

    pub fn with_tolerance(probabilities: Vec<f64>, tol: f64) -> ChainResult<Self> {
        if probabilities.is_empty() {
            return Err(ChainError::model("empty probability vector"));
        }
        // Tiny negative round-off from a linear solve is not a real probability
        if let Some((k, p)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < -tol)
        {
            return Err(ChainError::Numeric {
                what: format!("state {} has invalid probability {}", k, p),
            });
        }
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > tol {
            return Err(ChainError::Numeric {
                what: format!("probabilities sum to {} instead of 1", sum),
            });
        }
        Ok(Self {
            probabilities: probabilities.into_iter().map(|p| p.max(0.0)).collect(),
        })
    }

    /// Normalize non-negative weights into a distribution.
    pub(crate) fn from_weights(weights: Vec<f64>) -> ChainResult<Self> {
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(ChainError::Numeric {
                what: format!("normalization constant is {}", total),
            });
        }
        Self::new(weights.into_iter().map(|w| w / total).collect())
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn get(&self, state: usize) -> Option<f64> {
        self.probabilities.get(state).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.probabilities.iter().copied()
    }

    /// Probability that the station is empty.
    pub fn idle(&self) -> f64 {
        self.probabilities[0]
    }

    /// Probability of the highest state.
    pub fn top(&self) -> f64 {
        self.probabilities[self.probabilities.len() - 1]
    }

    pub fn sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Total probability of a set of states; out-of-range states count as 0.
    pub fn mass(&self, states: &[usize]) -> f64 {
        states.iter().filter_map(|&s| self.get(s)).sum()
    }

    /// Copy with every component rounded to `decimals` places. The result
    /// only has to sum to one within half a step per component.
    pub fn rounded(&self, decimals: u32) -> ChainResult<Self> {
        if decimals > MAX_PRECISION {
            return Err(ChainError::model(format!(
                "precision {} is above the maximum of {} decimals",
                decimals, MAX_PRECISION
            )));
        }
        Ok(Self {
            probabilities: self
                .probabilities
                .iter()
                .map(|&p| round_to(p, decimals))
                .collect(),
        })
    }
}

impl Index<usize> for SteadyStateVector {
    type Output = f64;

    fn index(&self, state: usize) -> &f64 {
        &self.probabilities[state]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_sum() {
        assert!(SteadyStateVector::new(vec![0.5, 0.4]).is_err());
        assert!(SteadyStateVector::new(vec![]).is_err());
    }

    #[test]
    fn rejects_negative_entries() {
        assert!(SteadyStateVector::new(vec![1.5, -0.5]).is_err());
    }

    #[test]
    fn weights_are_normalized() {
        let v = SteadyStateVector::from_weights(vec![1.0, 1.0, 2.0]).unwrap();
        assert_eq!(v.as_slice(), &[0.25, 0.25, 0.5]);
        assert_eq!(v.idle(), 0.25);
        assert_eq!(v.top(), 0.5);
        assert_eq!(v.mass(&[0, 2, 9]), 0.75);
    }

    #[test]
    fn rounding_keeps_length() {
        let v = SteadyStateVector::new(vec![0.4, 0.2, 0.266_666_7, 0.133_333_3]).unwrap();
        assert_eq!(v.rounded(2).unwrap().as_slice(), &[0.4, 0.2, 0.27, 0.13]);
        assert_eq!(v.rounded(MAX_PRECISION).unwrap().len(), 4);
    }

    #[test]
    fn excessive_precision_is_rejected() {
        let v = SteadyStateVector::new(vec![0.25, 0.75]).unwrap();
        for decimals in [MAX_PRECISION + 1, 400, u32::MAX] {
            assert!(matches!(
                v.rounded(decimals),
                Err(ChainError::Model { .. })
            ));
        }
    }
}
