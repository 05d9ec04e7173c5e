use crate::CfError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CfError::NonFinite { what, value: v })
    }
}

/// Check that `v` is finite and inside `[min, max]`.
pub fn ensure_in_range(v: Real, min: Real, max: Real, what: &'static str) -> Result<Real, CfError> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(CfError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// Move `current` toward `target` by at most `step`.
///
/// Snaps onto `target` when the remaining distance is strictly below `step`,
/// so repeated calls never overshoot or oscillate.
pub fn step_toward(current: Real, target: Real, step: Real) -> Real {
    let diff = target - current;
    if diff.abs() < step {
        target
    } else if diff > 0.0 {
        current + step
    } else {
        current - step
    }
}
