//! Real functions of one variable.
//!
//! [`Function`] is a tagged value: the concrete variants the multiplication
//! and integration fast paths know about (polynomials and piecewise
//! functions) plus a generic variant that only promises evaluation.
//!
//! Capabilities are expressed as traits:
//! - [`Evaluate`]: every function,
//! - [`Integrable`]: functions with an exact definite integral,
//! - [`Differentiable`]: functions with a derivative and an antiderivative,
//!   integrated as `F(b) - F(a)`.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::integration::{AdaptiveIntegration, Simpson};

mod multiplication;
mod piecewise;
mod polynomial;

pub use multiplication::{MultiplicationTable, MultiplyFn, multiply};
pub use piecewise::Piecewise;
pub use polynomial::Polynomial;

pub trait Evaluate {
    fn value(&self, x: f64) -> f64;
}

pub trait Integrable: Evaluate {
    /// Definite integral over `[a, b]`.
    fn integrate(&self, a: f64, b: f64) -> Result<f64>;
}

pub trait Differentiable: Evaluate {
    fn derivative(&self) -> Arc<Self>;
    fn indefinite_integral(&self) -> Arc<Self>;

    #[inline]
    fn antiderivative_difference(&self, a: f64, b: f64) -> f64 {
        let antiderivative = self.indefinite_integral();
        antiderivative.value(b) - antiderivative.value(a)
    }
}

/// User supplied function, wrapped by [`Function::Generic`].
///
/// `integral` may return an exact value; the default falls back to adaptive
/// quadrature.
pub trait RealFunction: Send + Sync + fmt::Debug {
    fn value(&self, x: f64) -> f64;

    fn integral(&self, _a: f64, _b: f64) -> Option<f64> {
        None
    }
}

/// Dispatch tag carried by every [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionTag {
    Polynomial,
    Piecewise,
    Generic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Polynomial(Polynomial),
    /// Also the representation of linear and spline interpolants.
    Piecewise(Piecewise),
    Generic(Generic),
}

impl Function {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Function::Generic(Generic::new(FromFn(f)))
    }

    pub fn generic(f: impl RealFunction + 'static) -> Self {
        Function::Generic(Generic::new(f))
    }

    #[inline]
    pub fn tag(&self) -> FunctionTag {
        match self {
            Function::Polynomial(_) => FunctionTag::Polynomial,
            Function::Piecewise(_) => FunctionTag::Piecewise,
            Function::Generic(_) => FunctionTag::Generic,
        }
    }

    /// Definite integral over `[a, b]`.
    ///
    /// Polynomials and piecewise functions integrate exactly; generic
    /// functions use their own integral when they provide one, adaptive
    /// Simpson quadrature otherwise.
    pub fn integrate(&self, a: f64, b: f64) -> Result<f64> {
        if a.total_cmp(&b).is_eq() {
            return Ok(0.0);
        }
        match self {
            Function::Polynomial(p) => p.integrate(a, b),
            Function::Piecewise(p) => p.integrate(a, b),
            Function::Generic(g) => g.integrate(a, b),
        }
    }

    /// Only differentiable variants answer.
    pub fn derivative(&self) -> Option<Function> {
        match self {
            Function::Polynomial(p) => Some(Function::Polynomial((*p.derivative()).clone())),
            _ => None,
        }
    }

    pub fn indefinite_integral(&self) -> Option<Function> {
        match self {
            Function::Polynomial(p) => {
                Some(Function::Polynomial((*p.indefinite_integral()).clone()))
            }
            _ => None,
        }
    }

    pub fn as_polynomial(&self) -> Option<&Polynomial> {
        match self {
            Function::Polynomial(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_piecewise(&self) -> Option<&Piecewise> {
        match self {
            Function::Piecewise(p) => Some(p),
            _ => None,
        }
    }
}

impl Evaluate for Function {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        match self {
            Function::Polynomial(p) => p.value(x),
            Function::Piecewise(p) => p.value(x),
            Function::Generic(g) => g.value(x),
        }
    }
}

impl Integrable for Function {
    fn integrate(&self, a: f64, b: f64) -> Result<f64> {
        Function::integrate(self, a, b)
    }
}

impl From<Polynomial> for Function {
    fn from(p: Polynomial) -> Self {
        Function::Polynomial(p)
    }
}

impl From<Piecewise> for Function {
    fn from(p: Piecewise) -> Self {
        Function::Piecewise(p)
    }
}

/// Shared handle to a [`RealFunction`]; cloning is a reference count bump.
#[derive(Debug, Clone)]
pub struct Generic(Arc<dyn RealFunction>);

impl Generic {
    pub fn new(f: impl RealFunction + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn integrate(&self, a: f64, b: f64) -> Result<f64> {
        if let Some(exact) = self.0.integral(a, b) {
            return Ok(exact);
        }
        AdaptiveIntegration::new(Simpson, 1e-8, 4).integrate(|x| self.0.value(x), a, b)
    }
}

impl Evaluate for Generic {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        self.0.value(x)
    }
}

impl PartialEq for Generic {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn")
    }
}

impl<F> RealFunction for FromFn<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    #[inline]
    fn value(&self, x: f64) -> f64 {
        (self.0)(x)
    }
}

/// Lazy `f(x)·g(x)`, the fallback when no specialisation applies.
#[derive(Debug)]
pub(crate) struct Product {
    left: Function,
    right: Function,
}

impl Product {
    pub(crate) fn function(left: &Function, right: &Function) -> Function {
        Function::generic(Product { left: left.clone(), right: right.clone() })
    }
}

impl RealFunction for Product {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        self.left.value(x) * self.right.value(x)
    }
}

/// `integrate(f, a, b)` dispatch entry point.
pub fn integrate(f: &Function, a: f64, b: f64) -> Result<f64> {
    f.integrate(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[derive(Debug)]
    struct Constant(f64);

    impl RealFunction for Constant {
        fn value(&self, _x: f64) -> f64 {
            self.0
        }

        fn integral(&self, a: f64, b: f64) -> Option<f64> {
            Some(self.0 * (b - a))
        }
    }

    #[test]
    fn tags_follow_variants() {
        assert_eq!(Function::from(Polynomial::zero()).tag(), FunctionTag::Polynomial);
        assert_eq!(Function::from_fn(|x| x).tag(), FunctionTag::Generic);
    }

    #[test]
    fn generic_uses_exact_integral_when_available() {
        let f = Function::generic(Constant(2.5));
        assert_eq!(f.integrate(1.0, 3.0).unwrap(), 5.0);
    }

    #[test]
    fn generic_falls_back_to_quadrature() {
        let f = Function::from_fn(|x: f64| x.sin());
        assert_abs_diff_eq!(
            integrate(&f, 0.0, std::f64::consts::PI).unwrap(),
            2.0,
            epsilon = 1e-7
        );
    }

    #[test]
    fn reversed_bounds_flip_sign() {
        let f = Function::from(Polynomial::new(vec![0.0, 1.0]));
        assert_abs_diff_eq!(f.integrate(2.0, 0.0).unwrap(), -2.0, epsilon = 1e-12);
        assert_eq!(f.integrate(1.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn only_polynomials_differentiate() {
        let p = Function::from(Polynomial::new(vec![1.0, 2.0, 3.0]));
        let d = p.derivative().unwrap();
        assert_eq!(d.as_polynomial().unwrap().coefficients(), &[2.0, 6.0]);
        assert!(Function::from_fn(|x| x).derivative().is_none());
    }

    #[test]
    fn clones_are_independent_values() {
        let p = Function::from(Polynomial::new(vec![1.0, 1.0]));
        let q = p.clone();
        drop(p);
        assert_eq!(q.value(2.0), 3.0);
    }
}
