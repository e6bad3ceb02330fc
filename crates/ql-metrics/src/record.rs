//! Named performance metrics.

use serde::Serialize;
use std::fmt;

/// Every metric the deriver can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    P0,
    LossProbability,
    Q,
    A,
    KBusy,
    BusyChannels,
    Utilization,
    LQueue,
    WQueue,
    LSystem,
    WSystem,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::P0,
        Metric::LossProbability,
        Metric::Q,
        Metric::A,
        Metric::KBusy,
        Metric::BusyChannels,
        Metric::Utilization,
        Metric::LQueue,
        Metric::WQueue,
        Metric::LSystem,
        Metric::WSystem,
    ];

    /// Short machine name, as used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Metric::P0 => "p0",
            Metric::LossProbability => "loss_probability",
            Metric::Q => "q",
            Metric::A => "a",
            Metric::KBusy => "k_busy",
            Metric::BusyChannels => "busy_channels",
            Metric::Utilization => "utilization",
            Metric::LQueue => "l_queue",
            Metric::WQueue => "w_queue",
            Metric::LSystem => "l_system",
            Metric::WSystem => "w_system",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Metric::P0 => "Idle probability (P0)",
            Metric::LossProbability => "Loss probability (pi)",
            Metric::Q => "Relative throughput (Q)",
            Metric::A => "Absolute throughput (A)",
            Metric::KBusy => "Channel utilization (k)",
            Metric::BusyChannels => "Mean busy channels",
            Metric::Utilization => "Offered load (rho)",
            Metric::LQueue => "Mean queue length (L)",
            Metric::WQueue => "Mean waiting time (W)",
            Metric::LSystem => "Mean number in system",
            Metric::WSystem => "Mean time in system",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metrics of one evaluated configuration. Which fields are set depends on
/// the chain form: loss systems fill π/Q/A, the plain single server fills
/// ρ/P0/L/W.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p0: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_busy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy_channels: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l_queue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w_queue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l_system: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w_system: Option<f64>,
}

impl MetricRecord {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::P0 => self.p0,
            Metric::LossProbability => self.loss_probability,
            Metric::Q => self.q,
            Metric::A => self.a,
            Metric::KBusy => self.k_busy,
            Metric::BusyChannels => self.busy_channels,
            Metric::Utilization => self.utilization,
            Metric::LQueue => self.l_queue,
            Metric::WQueue => self.w_queue,
            Metric::LSystem => self.l_system,
            Metric::WSystem => self.w_system,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::P0 => &mut self.p0,
            Metric::LossProbability => &mut self.loss_probability,
            Metric::Q => &mut self.q,
            Metric::A => &mut self.a,
            Metric::KBusy => &mut self.k_busy,
            Metric::BusyChannels => &mut self.busy_channels,
            Metric::Utilization => &mut self.utilization,
            Metric::LQueue => &mut self.l_queue,
            Metric::WQueue => &mut self.w_queue,
            Metric::LSystem => &mut self.l_system,
            Metric::WSystem => &mut self.w_system,
        };
        *slot = Some(value);
    }

    /// Populated metrics in declaration order.
    pub fn populated(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .into_iter()
            .filter_map(|m| self.get(m).map(|v| (m, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut record = MetricRecord::default();
        assert_eq!(record.populated().count(), 0);
        record.set(Metric::Q, 0.9);
        record.set(Metric::WSystem, 1.5);
        assert_eq!(record.get(Metric::Q), Some(0.9));
        assert_eq!(record.get(Metric::A), None);
        let names: Vec<&str> = record.populated().map(|(m, _)| m.name()).collect();
        assert_eq!(names, vec!["q", "w_system"]);
    }
}
