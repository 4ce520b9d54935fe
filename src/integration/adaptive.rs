use super::QuadratureRule;
use crate::error::{PhzError, Result};

const DEFAULT_MAX_ORDER: u32 = 20;

/// Orders at or above this are refused: `2^30` sub-intervals is the most the
/// sample buffer is allowed to hold.
pub const ORDER_LIMIT: u32 = 30;

/// Doubles the sampling of `[a, b]` until two successive estimates agree.
///
/// The interval is first sampled with `2^initial_order` sub-intervals; the
/// loop stops when `|Iₙ - Iₙ₋₁| / |Iₙ|` is below `relative_precision`.
/// Samples of the previous order are reused, only the midpoints are new.
/// At least one refinement always happens, so `max_order` is raised to
/// `initial_order + 1` when it is lower.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveIntegration<Q> {
    rule: Q,
    relative_precision: f64,
    initial_order: u32,
    max_order: u32,
}

impl<Q: QuadratureRule> AdaptiveIntegration<Q> {
    pub fn new(rule: Q, relative_precision: f64, initial_order: u32) -> Self {
        Self {
            rule,
            relative_precision,
            initial_order,
            max_order: DEFAULT_MAX_ORDER,
        }
    }

    #[must_use]
    pub fn with_max_order(mut self, max_order: u32) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<f64>
    where
        F: Fn(f64) -> f64,
    {
        if a.total_cmp(&b).is_eq() {
            return Ok(0.0);
        }
        if a > b {
            return self.integrate(f, b, a).map(|v| -v);
        }

        let mut order = self.initial_order.max(self.rule.min_order());
        if order >= ORDER_LIMIT {
            return Err(PhzError::domain(format!(
                "initial integration order {order} is not below the limit {ORDER_LIMIT}"
            )));
        }
        let max_order = self.max_order.max(order + 1).min(ORDER_LIMIT);

        let mut intervals = sub_intervals(order)?;
        let mut step = (b - a) / intervals as f64;
        let mut samples: Vec<f64> = (0..=intervals).map(|i| f(a + i as f64 * step)).collect();
        let mut previous = self.rule.apply(&samples, step);

        loop {
            order += 1;
            intervals = sub_intervals(order)?;
            step = (b - a) / intervals as f64;
            let mut refined = Vec::with_capacity(intervals + 1);
            if let Some((&last, rest)) = samples.split_last() {
                for (i, &s) in rest.iter().enumerate() {
                    refined.push(s);
                    refined.push(f(a + (2 * i + 1) as f64 * step));
                }
                refined.push(last);
            }
            samples = refined;

            let current = self.rule.apply(&samples, step);
            let difference = (current - previous).abs();
            if difference <= 0.0 {
                return Ok(current);
            }
            let relative_difference = difference / current.abs();
            if relative_difference < self.relative_precision {
                return Ok(current);
            }
            if order >= max_order {
                return Err(PhzError::Convergence { order, relative_difference });
            }
            previous = current;
        }
    }
}

fn sub_intervals(order: u32) -> Result<usize> {
    1usize
        .checked_shl(order)
        .ok_or_else(|| PhzError::domain(format!("integration order {order} overflows the sample count")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{Simpson, Trapezoidal};
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_is_exact_for_every_initial_order() {
        for order in 0..8 {
            let trapezoid = AdaptiveIntegration::new(Trapezoidal, 1e-10, order);
            let simpson = AdaptiveIntegration::new(Simpson, 1e-10, order);
            assert_abs_diff_eq!(trapezoid.integrate(|_| 3.5, -2.0, 5.0).unwrap(), 24.5, epsilon = 1e-12);
            assert_abs_diff_eq!(simpson.integrate(|_| 3.5, -2.0, 5.0).unwrap(), 24.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_function_converges() {
        let integration = AdaptiveIntegration::new(Trapezoidal, 1e-10, 2);
        assert_eq!(integration.integrate(|_| 0.0, 0.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn exponential_to_requested_precision() {
        let integration = AdaptiveIntegration::new(Simpson, 1e-10, 3);
        let value = integration.integrate(f64::exp, 0.0, 1.0).unwrap();
        assert_abs_diff_eq!(value, std::f64::consts::E - 1.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_interval_is_negated() {
        let integration = AdaptiveIntegration::new(Simpson, 1e-10, 3);
        let forward = integration.integrate(|x| x * x, 0.0, 3.0).unwrap();
        let backward = integration.integrate(|x| x * x, 3.0, 0.0).unwrap();
        assert_abs_diff_eq!(forward, 9.0, epsilon = 1e-9);
        assert_abs_diff_eq!(backward, -forward, epsilon = 1e-12);
    }

    #[test]
    fn initial_order_at_the_default_maximum() {
        let integration = AdaptiveIntegration::new(Trapezoidal, 1e-10, 20);
        assert_abs_diff_eq!(integration.integrate(|_| 3.5, -2.0, 5.0).unwrap(), 24.5, epsilon = 1e-9);
    }

    #[test]
    fn initial_order_above_max_order_still_refines() {
        let integration = AdaptiveIntegration::new(Simpson, 1e-10, 6).with_max_order(2);
        assert_abs_diff_eq!(integration.integrate(|x| x * x, 0.0, 3.0).unwrap(), 9.0, epsilon = 1e-9);
    }

    #[test]
    fn oversized_initial_order_is_an_error() {
        let integration = AdaptiveIntegration::new(Trapezoidal, 1e-10, 64);
        let result = integration.integrate(|_| 3.5, -2.0, 5.0);
        assert!(matches!(result, Err(PhzError::Domain { .. })));
        let result = AdaptiveIntegration::new(Simpson, 1e-10, ORDER_LIMIT).integrate(|_| 1.0, 0.0, 1.0);
        assert!(matches!(result, Err(PhzError::Domain { .. })));
    }

    #[test]
    fn convergence_error_reports_a_finite_difference() {
        let integration = AdaptiveIntegration::new(Trapezoidal, 1e-15, 1).with_max_order(1);
        match integration.integrate(|x: f64| (50.0 * x).sin() + 2.0, 0.0, 10.0) {
            Err(PhzError::Convergence { order, relative_difference }) => {
                assert_eq!(order, 2);
                assert!(relative_difference.is_finite());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fails_beyond_max_order() {
        let integration = AdaptiveIntegration::new(Trapezoidal, 1e-15, 1).with_max_order(4);
        let result = integration.integrate(|x: f64| (50.0 * x).sin() + 2.0, 0.0, 10.0);
        assert!(matches!(result, Err(PhzError::Convergence { .. })));
    }
}
