//! Interpolants over tabulated `(x, y)` data.
//!
//! Both kinds produce a [`Piecewise`](crate::Piecewise) of polynomials, so the
//! result takes the exact integration and multiplication fast paths.

mod linear;
mod spline;

use crate::dataset::XYDataset;
use crate::error::{PhzError, Result};
use crate::function::Function;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationType {
    #[default]
    Linear,
    /// Natural cubic spline.
    CubicSpline,
}

/// Interpolate `y(x)`.
///
/// Outside `[x₀, xₙ₋₁]` the interpolant is zero, or, with `extrapolate`, the
/// outermost segments continue to ±∞ for both kinds.
pub fn interpolate(x: &[f64], y: &[f64], kind: InterpolationType, extrapolate: bool) -> Result<Function> {
    validate(x, y)?;
    let piecewise = match kind {
        InterpolationType::Linear => linear::linear_interpolation(x, y)?,
        InterpolationType::CubicSpline => spline::spline_interpolation(x, y)?,
    };
    Ok(Function::Piecewise(piecewise.with_extrapolation(extrapolate)))
}

pub fn interpolate_dataset(dataset: &XYDataset, kind: InterpolationType, extrapolate: bool) -> Result<Function> {
    let (x, y): (Vec<f64>, Vec<f64>) = dataset.iter().copied().unzip();
    interpolate(&x, &y, kind, extrapolate)
}

fn validate(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(PhzError::domain(format!(
            "x and y must have the same length ({} != {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(PhzError::domain(format!(
            "interpolation needs at least two points, got {}",
            x.len()
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(PhzError::domain("interpolation data contains non-finite values"));
    }
    let unordered = x.windows(2).enumerate().find_map(|(i, w)| match *w {
        [a, b] if a >= b => Some((i, a, b)),
        _ => None,
    });
    if let Some((i, a, b)) = unordered {
        return Err(PhzError::domain(format!(
            "x values must be strictly increasing (x[{i}] = {a}, x[{}] = {b})",
            i + 1
        )));
    }
    Ok(())
}
