//! Steady-state solvers for small queueing chains.
//!
//! Two families are covered: the fixed 4-state repairable system, solved
//! from its balance equations with `nalgebra`, and birth-death chains over
//! the number of customers present, solved by the product-form recurrence.
//! Unlimited-queue single and multi-channel stations use their closed forms
//! and report the saturated tail as one lumped state.

pub mod birth_death;
pub mod closed_form;
pub mod error;
pub mod fixed;
pub mod rates;
pub mod spec;
pub mod vector;

pub use birth_death::{
    BirthDeathSpec, effective_service_rate, effective_service_rate_from_times, product_form,
    solve_birth_death,
};
pub use closed_form::{multi_channel, multi_channel_idle_probability, single_server};
pub use error::{ChainError, ChainResult};
pub use fixed::{
    FixedTopologyConfig, balance_matrix, solve_balance_exact, solve_fixed_topology,
    solve_fixed_topology_with,
};
pub use rates::{RateParameters, Transition};
pub use spec::{ChainSpec, solve};
pub use vector::{MAX_PRECISION, SteadyStateVector};
