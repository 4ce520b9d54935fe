use std::cmp::Ordering;

use super::{Evaluate, Function};
use crate::error::{PhzError, Result};
use crate::math::KahanSum;

/// Function defined by sub-functions on consecutive knot intervals.
///
/// Sub-function `i` covers `[kᵢ, kᵢ₊₁)`; the last one also covers the final
/// knot. Outside `[k₀, kₘ]` the value is zero, unless extrapolation is
/// enabled, in which case the outermost sub-functions extend to ±∞.
#[derive(Debug, Clone, PartialEq)]
pub struct Piecewise {
    knots: Vec<f64>,
    functions: Vec<Function>,
    extrapolate: bool,
}

impl Piecewise {
    pub fn new(knots: Vec<f64>, functions: Vec<Function>) -> Result<Self> {
        if knots.len() < 2 {
            return Err(PhzError::domain(format!(
                "piecewise function needs at least two knots, got {}",
                knots.len()
            )));
        }
        if functions.len() != knots.len() - 1 {
            return Err(PhzError::domain(format!(
                "{} knots require {} sub-functions, got {}",
                knots.len(),
                knots.len() - 1,
                functions.len()
            )));
        }
        let unordered = knots.windows(2).find_map(|w| match *w {
            [a, b] if !(a < b) => Some((a, b)),
            _ => None,
        });
        if let Some((a, b)) = unordered {
            return Err(PhzError::domain(format!(
                "knots must be strictly increasing ({a} followed by {b})"
            )));
        }
        Ok(Self { knots, functions, extrapolate: false })
    }

    #[must_use]
    pub fn with_extrapolation(mut self, extrapolate: bool) -> Self {
        self.extrapolate = extrapolate;
        self
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn is_extrapolating(&self) -> bool {
        self.extrapolate
    }

    /// `(k₀, kₘ)`
    pub fn range(&self) -> (f64, f64) {
        let first = self.knots.first().copied().unwrap_or_default();
        let last = self.knots.last().copied().unwrap_or_default();
        (first, last)
    }

    /// Index of the sub-function responsible for `x`, `None` outside the support.
    pub fn interval_index(&self, x: f64) -> Option<usize> {
        let (lo, hi) = self.range();
        let last = self.functions.len().checked_sub(1)?;
        if x.is_nan() {
            return None;
        }
        if x < lo {
            return self.extrapolate.then_some(0);
        }
        match x.partial_cmp(&hi)? {
            Ordering::Less => self.knots.partition_point(|&k| k <= x).checked_sub(1),
            // The final knot belongs to the last interval.
            Ordering::Equal => Some(last),
            Ordering::Greater => self.extrapolate.then_some(last),
        }
    }

    /// Sub-function covering `x`, ignoring the extrapolation flag.
    pub(crate) fn function_covering(&self, x: f64) -> Option<&Function> {
        let i = self.knots.partition_point(|&k| k <= x).clamp(1, self.functions.len());
        self.functions.get(i - 1)
    }

    /// Exact integral over `[a, b]` ∩ support, summed interval by interval.
    pub fn integrate(&self, a: f64, b: f64) -> Result<f64> {
        if a.total_cmp(&b).is_eq() {
            return Ok(0.0);
        }
        if a > b {
            return self.integrate(b, a).map(|v| -v);
        }
        let (lo, hi) = if self.extrapolate {
            (a, b)
        } else {
            let (k0, km) = self.range();
            (a.max(k0), b.min(km))
        };
        if lo >= hi {
            return Ok(0.0);
        }

        let last = self.functions.len().saturating_sub(1);
        let mut total = KahanSum::new();
        let intervals = self.knots.windows(2).zip(&self.functions).enumerate();
        for (i, (bounds, function)) in intervals {
            let &[knot_start, knot_end] = bounds else {
                continue;
            };
            let start = if i == 0 && self.extrapolate { f64::NEG_INFINITY } else { knot_start };
            let end = if i == last && self.extrapolate { f64::INFINITY } else { knot_end };
            let from = lo.max(start);
            let to = hi.min(end);
            if from < to {
                total += function.integrate(from, to)?;
            }
        }
        Ok(total.value())
    }
}

impl Evaluate for Piecewise {
    fn value(&self, x: f64) -> f64 {
        self.interval_index(x)
            .and_then(|i| self.functions.get(i))
            .map_or(0.0, |f| f.value(x))
    }
}
