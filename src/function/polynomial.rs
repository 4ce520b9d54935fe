use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::{Differentiable, Evaluate, Integrable};
use crate::error::Result;

/// Polynomial `Σ cᵢ xⁱ`, coefficient `i` multiplying `xⁱ`.
///
/// The derivative and the indefinite integral are computed on first request
/// and published through a once-cell, so a polynomial shared between threads
/// computes each of them at most once.
#[derive(Debug, Clone)]
pub struct Polynomial {
    coefficients: Vec<f64>,
    derivative: OnceCell<Arc<Polynomial>>,
    indefinite_integral: OnceCell<Arc<Polynomial>>,
}

impl Polynomial {
    /// An empty coefficient vector is the zero polynomial.
    pub fn new(coefficients: Vec<f64>) -> Self {
        let coefficients = if coefficients.is_empty() { vec![0.0] } else { coefficients };
        Self {
            coefficients,
            derivative: OnceCell::new(),
            indefinite_integral: OnceCell::new(),
        }
    }

    pub fn zero() -> Self {
        Self::new(vec![0.0])
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree as stored, trailing zero coefficients included.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficient convolution.
    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0.0; a.len() + b.len() - 1];
        for (i, &ai) in a.iter().enumerate() {
            let shifted = product.iter_mut().skip(i);
            for (slot, &bj) in shifted.zip(b) {
                *slot += ai * bj;
            }
        }
        Polynomial::new(product)
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.coefficients == other.coefficients
    }
}

impl Evaluate for Polynomial {
    /// Horner evaluation.
    #[inline]
    fn value(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }
}

impl Differentiable for Polynomial {
    fn derivative(&self) -> Arc<Polynomial> {
        self.derivative
            .get_or_init(|| {
                let coefficients = self
                    .coefficients
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(i, &c)| i as f64 * c)
                    .collect();
                Arc::new(Polynomial::new(coefficients))
            })
            .clone()
    }

    fn indefinite_integral(&self) -> Arc<Polynomial> {
        self.indefinite_integral
            .get_or_init(|| {
                let coefficients = std::iter::once(0.0)
                    .chain(
                        self.coefficients
                            .iter()
                            .enumerate()
                            .map(|(i, &c)| c / (i + 1) as f64),
                    )
                    .collect();
                Arc::new(Polynomial::new(coefficients))
            })
            .clone()
    }
}

impl Integrable for Polynomial {
    fn integrate(&self, a: f64, b: f64) -> Result<f64> {
        Ok(self.antiderivative_difference(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn evaluates_with_horner() {
        let p = Polynomial::new(vec![1.0, 0.5, -2.0]);
        assert_abs_diff_eq!(p.value(0.0), 1.0);
        assert_abs_diff_eq!(p.value(2.0), 1.0 + 1.0 - 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.value(-1.5), 1.0 - 0.75 - 4.5, epsilon = 1e-12);
    }

    #[test]
    fn empty_coefficients_is_zero() {
        let p = Polynomial::new(vec![]);
        assert_eq!(p.coefficients(), &[0.0]);
        assert_eq!(p.value(42.0), 0.0);
    }

    #[test]
    fn convolution_of_coefficients() {
        let p = Polynomial::new(vec![1.0, 0.5, -2.0]);
        let q = Polynomial::new(vec![3.0, 0.0, 2.0]);
        assert_eq!(p.multiply(&q).coefficients(), &[3.0, 1.5, -4.0, 1.0, -4.0]);
    }

    #[test]
    fn derivative_coefficients() {
        let p = Polynomial::new(vec![5.0, 3.0, 2.0, 1.0]);
        assert_eq!(p.derivative().coefficients(), &[3.0, 4.0, 3.0]);
        assert_eq!(Polynomial::constant(7.0).derivative().coefficients(), &[0.0]);
    }

    #[test]
    fn indefinite_integral_has_zero_constant() {
        let p = Polynomial::new(vec![3.0, 4.0, 3.0]);
        let integral = p.indefinite_integral();
        assert_eq!(integral.coefficients(), &[0.0, 3.0, 2.0, 1.0]);
        assert_eq!(integral.value(0.0), 0.0);
    }

    #[test]
    fn cached_derivative_is_shared() {
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        let first = p.derivative();
        let second = p.derivative();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_callers_share_one_cached_result() {
        let p = Arc::new(Polynomial::new(vec![5.0, 3.0, 2.0, 1.0]));

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let p = Arc::clone(&p);
                    scope.spawn(move || (p.derivative(), p.indefinite_integral()))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let (first_derivative, first_integral) = &results[0];
        assert_eq!(first_derivative.coefficients(), &[3.0, 4.0, 3.0]);
        assert_eq!(first_integral.coefficients(), &[0.0, 5.0, 1.5, 2.0 / 3.0, 0.25]);
        for (derivative, integral) in &results {
            assert!(Arc::ptr_eq(derivative, first_derivative));
            assert!(Arc::ptr_eq(integral, first_integral));
        }
        assert!(Arc::ptr_eq(&p.derivative(), first_derivative));
    }

    #[test]
    fn definite_integral_matches_antiderivative() {
        let p = Polynomial::new(vec![1.0, -2.0, 0.5, 3.0]);
        let f = p.indefinite_integral();
        let exact = f.value(2.5) - f.value(-1.0);
        assert_abs_diff_eq!(p.integrate(-1.0, 2.5).unwrap(), exact, epsilon = 1e-12);
    }
}
