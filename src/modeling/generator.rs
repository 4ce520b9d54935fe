use std::io;
use std::iter::FusedIterator;

use log::{debug, info};

use super::transform::{NO_REDDENING, transform_sed};
use crate::dataset::{DatasetProvider, QualifiedName, XYDataset};
use crate::error::{PhzError, Result};
use crate::function::Function;
use crate::grid::{CellIndex, CellIter, GridAxes};
use crate::interpolation::{InterpolationType, interpolate_dataset};

/// Produces the transformed SED of any grid cell.
///
/// Every template and curve named by the axes is read from its provider in
/// [`new`](Self::new); later calls only compute.
#[derive(Debug, Clone)]
pub struct ModelDatasetGenerator {
    axes: GridAxes,
    seds: Vec<XYDataset>,
    /// `None` for [`NO_REDDENING`].
    curves: Vec<Option<Function>>,
}

impl ModelDatasetGenerator {
    pub fn new(
        axes: GridAxes,
        sed_provider: &dyn DatasetProvider,
        curve_provider: Option<&dyn DatasetProvider>,
    ) -> Result<Self> {
        let seds = axes
            .seds()
            .iter()
            .map(|name| fetch(sed_provider, name))
            .collect::<Result<Vec<_>>>()?;

        let curves = axes
            .curves()
            .iter()
            .map(|name| load_curve(curve_provider, name))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "loaded {} SEDs and {} reddening curves for {} models",
            seds.len(),
            curves.len(),
            axes.size()
        );
        Ok(Self { axes, seds, curves })
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn size(&self) -> usize {
        self.axes.size()
    }

    pub fn model(&self, cell: CellIndex) -> Result<XYDataset> {
        let parameters = self
            .axes
            .parameters(cell)
            .ok_or_else(|| PhzError::domain(format!("cell {cell:?} is outside the grid")))?;
        let (Some(sed), Some(curve)) = (self.seds.get(cell.sed), self.curves.get(cell.curve)) else {
            return Err(PhzError::domain(format!("no dataset loaded for cell {cell:?}")));
        };
        transform_sed(sed, parameters.z, parameters.ebv, curve.as_ref())
        .map_err(|e| e.with_name(parameters.sed))
    }

    /// Linear interpolant of [`model`](Self::model), zero outside its samples.
    pub fn model_function(&self, cell: CellIndex) -> Result<Function> {
        interpolate_dataset(&self.model(cell)?, InterpolationType::Linear, false)
    }

    /// Lazily yields every model in grid order.
    pub fn iter(&self) -> ModelMatrix<'_> {
        ModelMatrix { generator: self, cells: self.axes.iter() }
    }
}

fn fetch(provider: &dyn DatasetProvider, name: &QualifiedName) -> Result<XYDataset> {
    debug!("loading dataset {name}");
    provider.get_dataset(name)?.ok_or_else(|| {
        PhzError::io(
            name.to_string(),
            io::Error::new(io::ErrorKind::NotFound, "dataset not found"),
        )
    })
}

fn load_curve(provider: Option<&dyn DatasetProvider>, name: &QualifiedName) -> Result<Option<Function>> {
    if name.qualified_name() == NO_REDDENING {
        return Ok(None);
    }
    let provider = provider.ok_or_else(|| {
        PhzError::config(format!("reddening curve '{name}' requested without a curve provider"))
    })?;
    let dataset = fetch(provider, name)?;
    interpolate_dataset(&dataset, InterpolationType::Linear, false)
        .map(Some)
        .map_err(|e| e.with_name(name))
}

/// Iterator over `(cell, model)` in grid order.
#[derive(Debug, Clone)]
pub struct ModelMatrix<'a> {
    generator: &'a ModelDatasetGenerator,
    cells: CellIter,
}

impl Iterator for ModelMatrix<'_> {
    type Item = Result<(CellIndex, XYDataset)>;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cells.next()?;
        Some(self.generator.model(cell).map(|model| (cell, model)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

impl ExactSizeIterator for ModelMatrix<'_> {}
impl FusedIterator for ModelMatrix<'_> {}
