use crate::math::KahanSum;

/// Closed Newton-Cotes rule applied to `2^order + 1` equally spaced samples.
pub trait QuadratureRule {
    /// Smallest order the rule can be applied at.
    fn min_order(&self) -> u32;

    /// Integral estimate from `samples` spaced by `step`.
    fn apply(&self, samples: &[f64], step: f64) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Trapezoidal;

impl QuadratureRule for Trapezoidal {
    fn min_order(&self) -> u32 {
        1
    }

    fn apply(&self, samples: &[f64], step: f64) -> f64 {
        let [first, interior @ .., last] = samples else {
            return 0.0;
        };
        let mut sum = KahanSum::new();
        sum += 0.5 * (first + last);
        for &s in interior {
            sum += s;
        }
        sum.value() * step
    }
}

/// Composite Simpson rule; needs an even number of intervals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simpson;

impl QuadratureRule for Simpson {
    fn min_order(&self) -> u32 {
        2
    }

    fn apply(&self, samples: &[f64], step: f64) -> f64 {
        let [first, interior @ .., last] = samples else {
            return 0.0;
        };
        if interior.len() % 2 == 0 {
            return Trapezoidal.apply(samples, step);
        }
        let mut sum = KahanSum::new();
        sum += first + last;
        for (i, &s) in interior.iter().enumerate() {
            sum += if i % 2 == 0 { 4.0 * s } else { 2.0 * s };
        }
        sum.value() * step / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn samples(f: impl Fn(f64) -> f64, a: f64, b: f64, intervals: usize) -> (Vec<f64>, f64) {
        let step = (b - a) / intervals as f64;
        ((0..=intervals).map(|i| f(a + i as f64 * step)).collect(), step)
    }

    #[test]
    fn trapezoidal_is_exact_for_lines() {
        let (s, h) = samples(|x| 3.0 * x - 1.0, 0.0, 2.0, 4);
        assert_abs_diff_eq!(Trapezoidal.apply(&s, h), 4.0, epsilon = 1e-14);
    }

    #[test]
    fn simpson_is_exact_for_cubics() {
        let (s, h) = samples(|x| x * x * x, 0.0, 2.0, 4);
        assert_abs_diff_eq!(Simpson.apply(&s, h), 4.0, epsilon = 1e-14);
    }
}
