//! Study schema definitions.
//!
//! Every analysis block may be written partially; missing fields take the
//! values of the reference studies below.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format version written into every study file.
pub const STUDY_VERSION: u32 = 1;

fn default_version() -> u32 {
    STUDY_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Study {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub analyses: Vec<AnalysisDef>,
}

impl Default for Study {
    /// One analysis of every kind, each with its reference inputs.
    fn default() -> Self {
        Self {
            version: STUDY_VERSION,
            name: "Reference queueing study".to_string(),
            analyses: vec![
                AnalysisDef::Repair(RepairDef::default()),
                AnalysisDef::SingleServer(SingleServerDef::default()),
                AnalysisDef::Channels(ChannelsDef::default()),
                AnalysisDef::Priority(PriorityDef::default()),
                AnalysisDef::TwoPhase(TwoPhaseDef::default()),
                AnalysisDef::CapacityGrid(CapacityGridDef::default()),
                AnalysisDef::SingleServerGrid(SingleServerGridDef::default()),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisDef {
    Repair(RepairDef),
    SingleServer(SingleServerDef),
    Channels(ChannelsDef),
    Priority(PriorityDef),
    TwoPhase(TwoPhaseDef),
    CapacityGrid(CapacityGridDef),
    SingleServerGrid(SingleServerGridDef),
}

impl AnalysisDef {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisDef::Repair(_) => "repair",
            AnalysisDef::SingleServer(_) => "single_server",
            AnalysisDef::Channels(_) => "channels",
            AnalysisDef::Priority(_) => "priority",
            AnalysisDef::TwoPhase(_) => "two_phase",
            AnalysisDef::CapacityGrid(_) => "capacity_grid",
            AnalysisDef::SingleServerGrid(_) => "single_server_grid",
        }
    }
}

/// Two repairable nodes, four states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepairDef {
    /// Keyed `lambda_ij` for the transition `i -> j`
    pub rates: BTreeMap<String, f64>,
    pub precision: u32,
    pub incomes: [f64; 2],
    pub repair_costs: [f64; 2],
    pub scenario: RepairScenarioDef,
}

impl Default for RepairDef {
    fn default() -> Self {
        let rates = [
            ("lambda_01", 1.0),
            ("lambda_02", 2.0),
            ("lambda_10", 2.0),
            ("lambda_13", 2.0),
            ("lambda_20", 3.0),
            ("lambda_23", 1.0),
            ("lambda_31", 3.0),
            ("lambda_32", 2.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            rates,
            precision: 2,
            incomes: [10.0, 6.0],
            repair_costs: [4.0, 2.0],
            scenario: RepairScenarioDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepairScenarioDef {
    /// Rate keys multiplied by `rate_factor`
    pub scaled: Vec<String>,
    pub rate_factor: f64,
    pub cost_multiplier: f64,
}

impl Default for RepairScenarioDef {
    fn default() -> Self {
        Self {
            scaled: vec!["lambda_20".to_string(), "lambda_31".to_string()],
            rate_factor: 2.0,
            cost_multiplier: 2.0,
        }
    }
}

/// M/M/1 with shop economics. Rates per hour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SingleServerDef {
    pub arrival: f64,
    pub service: f64,
    pub shift_hours: f64,
    pub price_per_client: f64,
    pub net_share: f64,
    pub masters: usize,
}

impl Default for SingleServerDef {
    fn default() -> Self {
        Self {
            arrival: 2.4,
            service: 3.0,
            shift_hours: 6.0,
            price_per_client: 60.0,
            net_share: 0.3,
            masters: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelsDef {
    pub arrival: f64,
    pub service: f64,
    pub max_channels: usize,
}

impl Default for ChannelsDef {
    fn default() -> Self {
        Self {
            arrival: 2.0,
            service: 4.0,
            max_channels: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriorityDef {
    pub arrival_priority: f64,
    pub arrival_regular: f64,
    pub service_time_priority: f64,
    pub service_time_regular: f64,
}

impl Default for PriorityDef {
    fn default() -> Self {
        Self {
            arrival_priority: 0.1,
            arrival_regular: 0.2,
            service_time_priority: 1.0,
            service_time_regular: 2.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TwoPhaseDef {
    pub arrival: f64,
    pub prep_time: f64,
    pub service_time: f64,
    pub channels: usize,
}

impl Default for TwoPhaseDef {
    fn default() -> Self {
        Self {
            arrival: 0.2,
            prep_time: 0.5,
            service_time: 2.0,
            channels: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LossRuleDef {
    TopState,
    #[default]
    ScaledTopState,
}

/// Evenly spaced values, both ends included.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AxisDef {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

/// Integers `start..=end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntRangeDef {
    pub start: usize,
    pub end: usize,
}

/// Targets for picking one grid point, nearest on each axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridSelectDef {
    pub row: f64,
    pub col: f64,
}

/// Waiting places against mean service time (seconds) for a finite queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CapacityGridDef {
    pub arrival_per_minute: f64,
    pub channels: usize,
    pub capacities: IntRangeDef,
    pub service_time_s: AxisDef,
    pub loss_rule: LossRuleDef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<GridSelectDef>,
    /// Keep every grid point in the report, not only the summary
    pub include_points: bool,
}

impl Default for CapacityGridDef {
    fn default() -> Self {
        Self {
            arrival_per_minute: 4.0,
            channels: 1,
            capacities: IntRangeDef { start: 2, end: 100 },
            service_time_s: AxisDef {
                start: 10.0,
                end: 250.0,
                points: 100,
            },
            loss_rule: LossRuleDef::ScaledTopState,
            select: Some(GridSelectDef {
                row: 10.0,
                col: 120.0,
            }),
            include_points: false,
        }
    }
}

/// Arrival rate against service rate for M/M/1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SingleServerGridDef {
    pub arrival: AxisDef,
    pub service: AxisDef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<GridSelectDef>,
    pub include_points: bool,
}

impl Default for SingleServerGridDef {
    fn default() -> Self {
        Self {
            arrival: AxisDef {
                start: 1.5,
                end: 3.5,
                points: 50,
            },
            service: AxisDef {
                start: 2.5,
                end: 4.5,
                points: 50,
            },
            select: Some(GridSelectDef { row: 2.4, col: 3.0 }),
            include_points: false,
        }
    }
}
