use crate::dataset::XYDataset;
use crate::error::{PhzError, Result};
use crate::function::{Evaluate, Function};
use crate::interpolation::{InterpolationType, interpolate, interpolate_dataset};

/// Speed of light in Å/s.
pub const SPEED_OF_LIGHT_ANGSTROM: f64 = 2.997_924_58e18;

/// Wavelength range, in Å, of the normalisation integral.
pub const COMPENSATION_RANGE: (f64, f64) = (0.0, 120_000.0);

/// Filter response prepared for flux integration.
#[derive(Debug, Clone)]
pub struct FilterInfo {
    range: (f64, f64),
    response: Function,
    compensation: f64,
}

impl FilterInfo {
    /// Linear response interpolant, support and `∫ f(λ)·c/λ² dλ`.
    pub fn from_dataset(dataset: &XYDataset) -> Result<Self> {
        let (first, _) = dataset.front();
        if first <= 0.0 {
            return Err(PhzError::domain(format!(
                "filter wavelengths must be strictly positive, found {first}"
            )));
        }
        let response = interpolate_dataset(dataset, InterpolationType::Linear, false)?;

        let (x, y): (Vec<f64>, Vec<f64>) = dataset
            .iter()
            .map(|&(x, y)| (x, y * SPEED_OF_LIGHT_ANGSTROM / (x * x)))
            .unzip();
        let (lo, hi) = COMPENSATION_RANGE;
        let compensation = interpolate(&x, &y, InterpolationType::Linear, false)?.integrate(lo, hi)?;
        if !(compensation.is_normal() || compensation.is_subnormal()) {
            return Err(PhzError::domain(format!(
                "filter normalisation is {compensation}, the response must be non-zero"
            )));
        }

        Ok(Self {
            range: (first, dataset.back().0),
            response,
            compensation,
        })
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn response(&self) -> &Function {
        &self.response
    }

    pub fn compensation(&self) -> f64 {
        self.compensation
    }

    /// Normalised flux of a model spectrum.
    ///
    /// Only model samples inside the filter support contribute; fewer than
    /// two of them give zero.
    pub fn flux(&self, model: &XYDataset) -> Result<f64> {
        let (lo, hi) = self.range;
        let (x, y): (Vec<f64>, Vec<f64>) = model
            .iter()
            .filter(|(x, _)| (lo..=hi).contains(x))
            .map(|&(x, y)| (x, y * self.response.value(x)))
            .unzip();
        if x.len() < 2 {
            return Ok(0.0);
        }
        let filtered = interpolate(&x, &y, InterpolationType::Linear, false)?;
        Ok(filtered.integrate(lo, hi)? / self.compensation)
    }
}
