//! ql-core: stable foundation for queuelab.
//!
//! Contains:
//! - numeric (Real + finiteness guards + rounding)
//! - units (uom time/rate types + conversions)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::QlError;
pub use numeric::*;
pub use units::*;
