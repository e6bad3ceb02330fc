//! Channel-count sweep for a multi-channel station.

use crate::error::SweepError;
use crate::result::{PointOutcome, SweepPoint, SweepResult};
use ql_chain::{ChainSpec, solve};
use ql_metrics::{MetricsError, derive_metrics};
use std::ops::ControlFlow;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSweep {
    pub arrival: f64,
    pub service: f64,
    /// Channel counts run `1..=max_channels`
    pub max_channels: usize,
}

impl Default for ChannelSweep {
    fn default() -> Self {
        Self {
            arrival: 2.0,
            service: 4.0,
            max_channels: 10,
        }
    }
}

impl ChannelSweep {
    pub fn validate(&self) -> Result<(), SweepError> {
        if !(self.arrival.is_finite() && self.arrival > 0.0) {
            return Err(SweepError::InvalidConfiguration(format!(
                "arrival rate must be positive, got {}",
                self.arrival
            )));
        }
        if !(self.service.is_finite() && self.service > 0.0) {
            return Err(SweepError::InvalidConfiguration(format!(
                "service rate must be positive, got {}",
                self.service
            )));
        }
        if self.max_channels == 0 {
            return Err(SweepError::InvalidConfiguration(
                "max_channels must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Metrics for `c = 1, 2, ...` in order. The sweep ends before the first
/// channel count whose station is unstable, so the result may be shorter
/// than `max_channels` (or empty).
pub fn sweep_channels(sweep: &ChannelSweep) -> Result<SweepResult<usize>, SweepError> {
    sweep.validate()?;

    let flow = (1..=sweep.max_channels).try_fold(Vec::new(), |mut points, channels| {
        let spec = ChainSpec::MultiChannel {
            arrival: sweep.arrival,
            service: sweep.service,
            channels,
        };
        let evaluated = solve(&spec)
            .map_err(MetricsError::from)
            .and_then(|p| derive_metrics(&p, &spec));
        match evaluated {
            Err(e) if e.is_instability() => {
                warn!(channels, error = %e, "channel sweep stopped");
                ControlFlow::Break(points)
            }
            result => {
                points.push(SweepPoint {
                    params: channels,
                    outcome: PointOutcome::from(result),
                });
                ControlFlow::Continue(points)
            }
        }
    });

    let points = match flow {
        ControlFlow::Continue(points) | ControlFlow::Break(points) => points,
    };
    debug!(evaluated = points.len(), "channel sweep finished");
    Ok(SweepResult { points })
}
