//! Synthetic photometry of model spectra.

mod abort;
mod builder;
mod filter;
mod matrix;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PhzError, Result};

pub use abort::{AbortSignal, NeverAbort};
pub use builder::PhotometryBuilder;
pub use filter::{COMPENSATION_RANGE, FilterInfo, SPEED_OF_LIGHT_ANGSTROM};
pub use matrix::PhotometryMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FluxErrorPair {
    pub flux: f64,
    /// Zero for synthetic photometry.
    pub error: f64,
}

impl FluxErrorPair {
    pub fn new(flux: f64, error: f64) -> Self {
        Self { flux, error }
    }
}

/// Per-filter fluxes of one source.
///
/// The filter names are shared by every photometry of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Photometry {
    filters: Arc<Vec<String>>,
    values: Vec<FluxErrorPair>,
}

impl Photometry {
    pub fn new(filters: Arc<Vec<String>>, values: Vec<FluxErrorPair>) -> Result<Self> {
        if filters.len() != values.len() {
            return Err(PhzError::domain(format!(
                "{} filters but {} flux values",
                filters.len(),
                values.len()
            )));
        }
        Ok(Self { filters, values })
    }

    pub fn filter_names(&self) -> &Arc<Vec<String>> {
        &self.filters
    }

    pub fn values(&self) -> &[FluxErrorPair] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &FluxErrorPair)> {
        self.filters.iter().map(String::as_str).zip(&self.values)
    }

    pub fn find(&self, filter: &str) -> Option<&FluxErrorPair> {
        self.filters
            .iter()
            .position(|name| name == filter)
            .and_then(|i| self.values.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters() -> Arc<Vec<String>> {
        Arc::new(vec!["sdss/g".to_string(), "sdss/r".to_string()])
    }

    #[test]
    fn lookup_by_filter_name() {
        let phot = Photometry::new(filters(), vec![FluxErrorPair::new(1.0, 0.0), FluxErrorPair::new(2.0, 0.0)])
            .unwrap();
        assert_eq!(phot.find("sdss/r").map(|p| p.flux), Some(2.0));
        assert!(phot.find("sdss/i").is_none());
        let names: Vec<&str> = phot.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["sdss/g", "sdss/r"]);
    }

    #[test]
    fn length_mismatch_is_domain_error() {
        let err = Photometry::new(filters(), vec![FluxErrorPair::default()]).unwrap_err();
        assert!(matches!(err, PhzError::Domain { .. }));
    }
}
