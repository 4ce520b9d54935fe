use crate::error::Result;
use crate::function::{Function, Piecewise, Polynomial};

/// One degree-1 polynomial per interval.
pub(super) fn linear_interpolation(x: &[f64], y: &[f64]) -> Result<Piecewise> {
    let functions = x
        .windows(2)
        .zip(y.windows(2))
        .filter_map(|(xs, ys)| {
            let (&[x0, x1], &[y0, y1]) = (xs, ys) else {
                return None;
            };
            let slope = (y1 - y0) / (x1 - x0);
            let intercept = y0 - slope * x0;
            Some(Function::Polynomial(Polynomial::new(vec![intercept, slope])))
        })
        .collect();
    Piecewise::new(x.to_vec(), functions)
}
