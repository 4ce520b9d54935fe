use crate::error::Result;
use crate::function::{Function, Piecewise, Polynomial};

/// Natural cubic spline: continuous `f`, `f'`, `f''` at interior knots and
/// `f'' = 0` at both ends.
///
/// The second derivatives `Mᵢ` come from a tridiagonal sweep; each interval
/// is then written as `aᵢ + bᵢ t + cᵢ t² + dᵢ t³` with `t = x - xᵢ` and
/// expanded into an ordinary polynomial in `x`.
pub(super) fn spline_interpolation(x: &[f64], y: &[f64]) -> Result<Piecewise> {
    let m = second_derivatives(x, y);

    let functions = x
        .windows(2)
        .zip(y.windows(2))
        .zip(m.windows(2))
        .filter_map(|((xs, ys), ms)| {
            let (&[x0, x1], &[y0, y1], &[m0, m1]) = (xs, ys, ms) else {
                return None;
            };
            let h = x1 - x0;
            let b = (y1 - y0) / h - h * (2.0 * m0 + m1) / 6.0;
            let c = m0 / 2.0;
            let d = (m1 - m0) / (6.0 * h);
            Some(Function::Polynomial(expand_local(y0, b, c, d, x0)))
        })
        .collect();
    Piecewise::new(x.to_vec(), functions)
}

fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    // Forward sweep, natural boundary M₀ = 0
    let mut diagonal = vec![0.0];
    let mut rhs = vec![0.0];
    for (xs, ys) in x.windows(3).zip(y.windows(3)) {
        let (&[x0, x1, x2], &[y0, y1, y2]) = (xs, ys) else {
            continue;
        };
        let previous = diagonal.last().copied().unwrap_or(0.0);
        let previous_rhs = rhs.last().copied().unwrap_or(0.0);
        let sig = (x1 - x0) / (x2 - x0);
        let p = sig * previous + 2.0;
        diagonal.push((sig - 1.0) / p);
        let slope_change = (y2 - y1) / (x2 - x1) - (y1 - y0) / (x1 - x0);
        rhs.push((6.0 * slope_change / (x2 - x0) - sig * previous_rhs) / p);
    }
    // Natural boundary Mₙ₋₁ = 0
    diagonal.push(0.0);
    rhs.push(0.0);

    // Back substitution
    let mut next = 0.0;
    let mut m: Vec<f64> = diagonal
        .iter()
        .zip(&rhs)
        .rev()
        .map(|(&d, &r)| {
            next = d * next + r;
            next
        })
        .collect();
    m.reverse();
    m
}

/// `a + b(x-x0) + c(x-x0)² + d(x-x0)³` as coefficients in `x`.
fn expand_local(a: f64, b: f64, c: f64, d: f64, x0: f64) -> Polynomial {
    Polynomial::new(vec![
        a - b * x0 + c * x0 * x0 - d * x0 * x0 * x0,
        b - 2.0 * c * x0 + 3.0 * d * x0 * x0,
        c - 3.0 * d * x0,
        d,
    ])
}
