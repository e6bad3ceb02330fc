//! Named transition rates of the two-node repairable system.
//!
//! States: 0 = both nodes working, 1 = node 1 under repair, 2 = node 2 under
//! repair, 3 = both under repair.

use crate::error::{ChainError, ChainResult};
use std::collections::BTreeMap;
use std::fmt;

/// Number of states in the fixed topology.
pub const STATE_COUNT: usize = 4;

/// A directed edge of the fixed 4-state topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Transition {
    T01,
    T02,
    T10,
    T13,
    T20,
    T23,
    T31,
    T32,
}

impl Transition {
    pub const ALL: [Transition; 8] = [
        Transition::T01,
        Transition::T02,
        Transition::T10,
        Transition::T13,
        Transition::T20,
        Transition::T23,
        Transition::T31,
        Transition::T32,
    ];

    /// Source and target state of the edge.
    pub fn endpoints(self) -> (usize, usize) {
        match self {
            Transition::T01 => (0, 1),
            Transition::T02 => (0, 2),
            Transition::T10 => (1, 0),
            Transition::T13 => (1, 3),
            Transition::T20 => (2, 0),
            Transition::T23 => (2, 3),
            Transition::T31 => (3, 1),
            Transition::T32 => (3, 2),
        }
    }

    /// Key used in study files, e.g. `lambda_01`.
    pub fn key(self) -> &'static str {
        match self {
            Transition::T01 => "lambda_01",
            Transition::T02 => "lambda_02",
            Transition::T10 => "lambda_10",
            Transition::T13 => "lambda_13",
            Transition::T20 => "lambda_20",
            Transition::T23 => "lambda_23",
            Transition::T31 => "lambda_31",
            Transition::T32 => "lambda_32",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Transition::ALL.into_iter().find(|t| t.key() == key)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from, to) = self.endpoints();
        write!(f, "{} -> {}", from, to)
    }
}

/// Transition rates keyed by edge. Incomplete sets are allowed while
/// building; [`RateParameters::validate`] enforces the full topology.
#[derive(Debug, Clone, PartialEq)]
pub struct RateParameters {
    rates: BTreeMap<Transition, f64>,
}

impl Default for RateParameters {
    /// Defaults: `0->1 = 1, 0->2 = 2, 1->0 = 2, 1->3 = 2, 2->0 = 3,
    /// 2->3 = 1, 3->1 = 3, 3->2 = 2`.
    fn default() -> Self {
        Self::empty()
            .with(Transition::T01, 1.0)
            .with(Transition::T02, 2.0)
            .with(Transition::T10, 2.0)
            .with(Transition::T13, 2.0)
            .with(Transition::T20, 3.0)
            .with(Transition::T23, 1.0)
            .with(Transition::T31, 3.0)
            .with(Transition::T32, 2.0)
    }
}

impl RateParameters {
    pub fn empty() -> Self {
        Self {
            rates: BTreeMap::new(),
        }
    }

    pub fn with(mut self, transition: Transition, rate: f64) -> Self {
        self.rates.insert(transition, rate);
        self
    }

    pub fn set(&mut self, transition: Transition, rate: f64) {
        self.rates.insert(transition, rate);
    }

    /// Build from `(key, rate)` pairs such as `("lambda_01", 1.0)`.
    pub fn from_named<K, I>(pairs: I) -> ChainResult<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut params = Self::empty();
        for (key, rate) in pairs {
            let key = key.as_ref();
            let transition = Transition::from_key(key)
                .ok_or_else(|| ChainError::model(format!("unknown transition '{}'", key)))?;
            params.set(transition, rate);
        }
        Ok(params)
    }

    pub fn get(&self, transition: Transition) -> Option<f64> {
        self.rates.get(&transition).copied()
    }

    pub fn rate(&self, transition: Transition) -> ChainResult<f64> {
        self.get(transition).ok_or_else(|| {
            ChainError::model(format!(
                "missing rate {} ({})",
                transition.key(),
                transition
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Transition, f64)> + '_ {
        self.rates.iter().map(|(t, r)| (*t, *r))
    }

    /// Copy with the selected rates multiplied by `factor`.
    pub fn scaled(&self, transitions: &[Transition], factor: f64) -> Self {
        let mut out = self.clone();
        for (t, rate) in out.rates.iter_mut() {
            if transitions.contains(t) {
                *rate *= factor;
            }
        }
        out
    }

    /// Check that all 8 rates are present, finite and non-negative, and
    /// that the positive-rate edges connect every state to every other.
    pub fn validate(&self) -> ChainResult<()> {
        if self.rates.len() < Transition::ALL.len() {
            let missing: Vec<&str> = Transition::ALL
                .iter()
                .filter(|t| !self.rates.contains_key(t))
                .map(|t| t.key())
                .collect();
            return Err(ChainError::model(format!(
                "expected {} rates, got {} (missing: {})",
                Transition::ALL.len(),
                self.rates.len(),
                missing.join(", ")
            )));
        }

        for (t, rate) in self.iter() {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ChainError::model(format!(
                    "rate {} must be finite and non-negative, got {}",
                    t.key(),
                    rate
                )));
            }
        }

        if !self.strongly_connected() {
            return Err(ChainError::model(
                "positive rates do not connect all 4 states".to_string(),
            ));
        }

        Ok(())
    }

    fn strongly_connected(&self) -> bool {
        let edges: Vec<(usize, usize)> = self
            .iter()
            .filter(|(_, r)| *r > 0.0)
            .map(|(t, _)| t.endpoints())
            .collect();
        let forward = reachable_from(0, &edges);
        let reversed: Vec<(usize, usize)> = edges.iter().map(|&(a, b)| (b, a)).collect();
        let backward = reachable_from(0, &reversed);
        forward.iter().all(|&r| r) && backward.iter().all(|&r| r)
    }
}

fn reachable_from(start: usize, edges: &[(usize, usize)]) -> [bool; STATE_COUNT] {
    let mut seen = [false; STATE_COUNT];
    let mut stack = vec![start];
    seen[start] = true;
    while let Some(s) = stack.pop() {
        for &(from, to) in edges {
            if from == s && !seen[to] {
                seen[to] = true;
                stack.push(to);
            }
        }
    }
    seen
}
