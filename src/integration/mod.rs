//! Adaptive 1-D quadrature.

mod adaptive;
mod rules;

pub use adaptive::{AdaptiveIntegration, ORDER_LIMIT};
pub use rules::{QuadratureRule, Simpson, Trapezoidal};
