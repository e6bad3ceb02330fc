use crate::QlError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, QlError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(QlError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, QlError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(QlError::NonPositive { what, value: v })
    }
}

/// Round half away from zero to a fixed number of decimal places.
///
/// Reported probabilities go through this so repeated runs print and
/// compare identically. Callers bound `decimals`; past ~300 the scale
/// factor overflows.
pub fn round_to(v: Real, decimals: u32) -> Real {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}
