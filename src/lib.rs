//! Model photometry for photometric-redshift template fitting.
//!
//! SED templates are reddened and redshifted over a grid of
//! `(z, E(B-V), reddening curve, SED)` and integrated through a set of
//! filter transmissions. The numerical core is a small algebra of real
//! functions (polynomials, piecewise functions and interpolants) with exact
//! integration and multiplication fast paths.

// Only the binary and the test suites initialise logging.
use env_logger as _;
#[cfg(test)]
use {criterion as _, itertools as _};

mod math;
mod error;

mod function;
mod integration;
mod interpolation;
mod dataset;
mod grid;
mod modeling;
mod photometry;
mod display;
mod config;

pub use math::{KahanSum, kahan_sum};
pub use crate::error::{PhzError, Result};
pub use crate::function::{
    Differentiable, Evaluate, Function, FunctionTag, Generic, Integrable, MultiplicationTable,
    MultiplyFn, Piecewise, Polynomial, RealFunction, integrate, multiply,
};
pub use crate::integration::{AdaptiveIntegration, ORDER_LIMIT, QuadratureRule, Simpson, Trapezoidal};
pub use crate::interpolation::{InterpolationType, interpolate, interpolate_dataset};
pub use crate::dataset::{
    AsciiParser, DatasetProvider, FileSystemProvider, InMemoryProvider, QualifiedName, XYDataset,
};
pub use crate::grid::{CellIndex, CellIter, CellParameters, GridAxes, GridAxis, numeric_range};
pub use crate::modeling::{
    ModelDatasetGenerator, ModelMatrix, NO_REDDENING, attenuate, redshift, transform_sed,
};
pub use crate::photometry::{
    AbortSignal, COMPENSATION_RANGE, FilterInfo, FluxErrorPair, NeverAbort, Photometry,
    PhotometryBuilder, PhotometryMatrix, SPEED_OF_LIGHT_ANGSTROM,
};
pub use crate::config::{ModelingArgs, ModelingConfig};
