// ql-core/src/units.rs

use uom::si::f64::{Frequency as UomFrequency, Time as UomTime};
use uom::si::frequency::hertz;
use uom::si::time::second;

pub type Time = UomTime;
/// Event rate (arrivals or service completions per unit time).
pub type Rate = UomFrequency;

#[inline]
pub fn seconds(v: f64) -> Time {
    Time::new::<second>(v)
}

/// Rate of an exponential stage with the given mean duration.
#[inline]
pub fn rate_from_mean_time(t: Time) -> Rate {
    Rate::new::<hertz>(1.0 / t.get::<second>())
}

#[inline]
pub fn as_per_minute(r: Rate) -> f64 {
    r.get::<hertz>() * 60.0
}
