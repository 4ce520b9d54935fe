//! Numeric helpers shared by the quadrature and photometry code.

mod sum;

pub use sum::{KahanSum, kahan_sum};
