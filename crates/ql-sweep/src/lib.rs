//! Parameter sweeps over queueing models.
//!
//! Every point is solved and derived independently. A point that cannot be
//! evaluated becomes a hole in the result instead of failing the sweep; the
//! channel-count sweep is the exception and stops at the first unstable
//! configuration.

pub mod axis;
pub mod channels;
pub mod error;
pub mod grid;
pub mod result;

pub use axis::{linspace, nearest_index};
pub use channels::{ChannelSweep, sweep_channels};
pub use error::SweepError;
pub use grid::{
    CapacityServiceGrid, SingleServerGrid, grid_sweep, sweep_capacity_service,
    sweep_single_server,
};
pub use result::{GridSweepResult, Hole, PointOutcome, SweepPoint, SweepResult};
