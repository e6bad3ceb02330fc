//! Performance metrics derived from steady-state distributions.
//!
//! Provides:
//! - the metric record and the deriver for every chain form
//! - the two-class non-preemptive priority formulas
//! - the two-phase (preparation + service) loss system
//! - income figures for the repairable system and a single-server shop

pub mod derive;
pub mod economics;
pub mod error;
pub mod priority;
pub mod record;
pub mod two_phase;

pub use derive::{LossRule, derive_metrics, derive_metrics_with, loss_scaled_top_state, loss_top_state};
pub use economics::{
    RepairComparison, RepairEconomics, RepairScenario, ShopEconomics, ShopReport,
    compare_repair_scenarios, repair_income, single_server_economics,
};
pub use error::{MetricsError, MetricsResult};
pub use priority::{PriorityInput, PriorityMetrics, priority_metrics};
pub use record::{Metric, MetricRecord};
pub use two_phase::{TwoPhaseInput, TwoPhaseReport, two_phase_loss};
