//! Model parameter grid.
//!
//! Four ordered axes span the model space: redshift, colour excess
//! E(B-V), reddening curve and SED template. Cells are enumerated with the
//! SED as the slowest axis and the redshift as the fastest, and the flat
//! index of a cell follows the same precedence.

use serde::{Deserialize, Serialize};

use crate::dataset::QualifiedName;
use crate::error::{PhzError, Result};

mod iter;
mod range;

pub use iter::CellIter;
pub use range::numeric_range;

/// A named, ordered, non-empty list of knots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis<T> {
    name: String,
    knots: Vec<T>,
}

impl<T> GridAxis<T> {
    pub fn new(name: impl Into<String>, knots: Vec<T>) -> Result<Self> {
        let name = name.into();
        if knots.is_empty() {
            return Err(PhzError::domain(format!("grid axis '{name}' has no knots")));
        }
        Ok(Self { name, knots })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn knots(&self) -> &[T] {
        &self.knots
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    /// Always false for a constructed axis.
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.knots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.knots.iter()
    }
}

impl<T: PartialEq> GridAxis<T> {
    pub fn index_of(&self, knot: &T) -> Option<usize> {
        self.knots.iter().position(|k| k == knot)
    }
}

/// Position of a cell along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellIndex {
    pub z: usize,
    pub ebv: usize,
    pub curve: usize,
    pub sed: usize,
}

impl CellIndex {
    pub fn new(z: usize, ebv: usize, curve: usize, sed: usize) -> Self {
        Self { z, ebv, curve, sed }
    }
}

/// Physical parameters of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParameters<'a> {
    pub z: f64,
    pub ebv: f64,
    pub curve: &'a QualifiedName,
    pub sed: &'a QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    z: GridAxis<f64>,
    ebv: GridAxis<f64>,
    curves: GridAxis<QualifiedName>,
    seds: GridAxis<QualifiedName>,
}

impl GridAxes {
    /// Redshifts must be finite and above -1, colour excesses finite.
    pub fn new(
        z: Vec<f64>,
        ebv: Vec<f64>,
        curves: Vec<QualifiedName>,
        seds: Vec<QualifiedName>,
    ) -> Result<Self> {
        if let Some(bad) = z.iter().find(|&&z| !z.is_finite() || z <= -1.0) {
            return Err(PhzError::domain(format!("invalid redshift {bad}")));
        }
        if let Some(bad) = ebv.iter().find(|e| !e.is_finite()) {
            return Err(PhzError::domain(format!("invalid E(B-V) {bad}")));
        }
        Ok(Self {
            z: GridAxis::new("Z", z)?,
            ebv: GridAxis::new("E(B-V)", ebv)?,
            curves: GridAxis::new("Reddening Curve", curves)?,
            seds: GridAxis::new("SED", seds)?,
        })
    }

    pub fn z(&self) -> &GridAxis<f64> {
        &self.z
    }

    pub fn ebv(&self) -> &GridAxis<f64> {
        &self.ebv
    }

    pub fn curves(&self) -> &GridAxis<QualifiedName> {
        &self.curves
    }

    pub fn seds(&self) -> &GridAxis<QualifiedName> {
        &self.seds
    }

    /// Axis lengths, fastest first: `[z, ebv, curve, sed]`.
    pub fn dimensions(&self) -> [usize; 4] {
        [self.z.len(), self.ebv.len(), self.curves.len(), self.seds.len()]
    }

    pub fn size(&self) -> usize {
        self.dimensions().iter().product()
    }

    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimensions())
    }

    pub fn contains(&self, cell: CellIndex) -> bool {
        let [nz, ne, nc, ns] = self.dimensions();
        cell.z < nz && cell.ebv < ne && cell.curve < nc && cell.sed < ns
    }

    pub fn linear_index(&self, cell: CellIndex) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let [nz, ne, nc, _] = self.dimensions();
        Some(((cell.sed * nc + cell.curve) * ne + cell.ebv) * nz + cell.z)
    }

    pub fn cell_at(&self, linear: usize) -> Option<CellIndex> {
        (linear < self.size()).then(|| iter::unravel(linear, self.dimensions()))
    }

    pub fn parameters(&self, cell: CellIndex) -> Option<CellParameters<'_>> {
        Some(CellParameters {
            z: *self.z.get(cell.z)?,
            ebv: *self.ebv.get(cell.ebv)?,
            curve: self.curves.get(cell.curve)?,
            sed: self.seds.get(cell.sed)?,
        })
    }
}

impl<'a> IntoIterator for &'a GridAxes {
    type Item = CellIndex;
    type IntoIter = CellIter;

    fn into_iter(self) -> CellIter {
        self.iter()
    }
}
