//! Model spectra for every grid cell.
//!
//! A model is an SED template attenuated by a reddening curve and moved to
//! the cell redshift. Templates and curves are loaded once; cells are then
//! produced on demand without further I/O.

mod generator;
mod transform;

pub use generator::{ModelDatasetGenerator, ModelMatrix};
pub use transform::{NO_REDDENING, attenuate, redshift, transform_sed};
