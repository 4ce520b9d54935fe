use crate::error::{PhzError, Result};

const TOLERANCE: f64 = 1e-12;

/// Values `start, start + step, ...` up to `stop`.
///
/// `stop` is included when it lies an integer number of steps from `start`
/// within a relative tolerance of `1e-12`; in that case the last value is
/// exactly `stop`.
#[allow(clippy::cast_precision_loss)]
pub fn numeric_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
        return Err(PhzError::config(format!(
            "range bounds must be finite (start {start}, stop {stop}, step {step})"
        )));
    }
    if start.total_cmp(&stop).is_eq() {
        return Ok(vec![start]);
    }
    if step <= 0.0 {
        return Err(PhzError::config(format!("range step must be positive, got {step}")));
    }
    if stop < start {
        return Err(PhzError::config(format!("range stop {stop} precedes start {start}")));
    }

    let steps = (stop - start) / step;
    let tolerance = TOLERANCE * steps.abs().max(1.0);
    let count = (steps + tolerance).floor() as usize;

    let mut values: Vec<f64> = (0..=count).map(|i| start + i as f64 * step).collect();
    if (steps - steps.round()).abs() <= tolerance {
        if let Some(last) = values.last_mut() {
            *last = stop;
        }
    }
    Ok(values)
}
