use std::sync::Arc;

use log::{debug, info};

use super::{AbortSignal, FilterInfo, FluxErrorPair, Photometry, PhotometryMatrix};
use crate::dataset::{DatasetProvider, QualifiedName, XYDataset};
use crate::error::{PhzError, Result};
use crate::grid::CellIndex;
use crate::modeling::ModelDatasetGenerator;

const PROGRESS_INTERVAL: usize = 1000;

/// Integrates every model of a grid through a fixed set of filters.
#[derive(Debug, Clone)]
pub struct PhotometryBuilder {
    names: Arc<Vec<String>>,
    filters: Vec<FilterInfo>,
}

impl PhotometryBuilder {
    pub fn new(filters: Vec<(QualifiedName, XYDataset)>) -> Result<Self> {
        if filters.is_empty() {
            return Err(PhzError::config("no filters to compute photometry for"));
        }
        let mut names = Vec::with_capacity(filters.len());
        let mut infos = Vec::with_capacity(filters.len());
        for (name, dataset) in filters {
            infos.push(FilterInfo::from_dataset(&dataset).map_err(|e| e.with_name(&name))?);
            debug!("prepared filter {name}");
            names.push(name.qualified_name());
        }
        Ok(Self { names: Arc::new(names), filters: infos })
    }

    /// Reads the named filters from `provider`, keeping their order.
    pub fn from_provider(provider: &dyn DatasetProvider, names: &[QualifiedName]) -> Result<Self> {
        let filters = names
            .iter()
            .map(|name| {
                let dataset = provider.get_dataset(name)?.ok_or_else(|| {
                    PhzError::io(
                        name.to_string(),
                        std::io::Error::new(std::io::ErrorKind::NotFound, "filter not found"),
                    )
                })?;
                Ok((name.clone(), dataset))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(filters)
    }

    pub fn filter_names(&self) -> &Arc<Vec<String>> {
        &self.names
    }

    pub fn filters(&self) -> &[FilterInfo] {
        &self.filters
    }

    pub fn compute_photometry(&self, model: &XYDataset) -> Result<Photometry> {
        photometry(&self.filters, &self.names, model)
    }

    /// Photometry of every model, in grid order.
    ///
    /// `abort` is polled before each cell; a requested abort discards the
    /// partial result.
    pub fn build(&self, models: &ModelDatasetGenerator, abort: &dyn AbortSignal) -> Result<PhotometryMatrix> {
        info!("Number of models to create photometry for: {}", models.size());
        let mut photometries = Vec::with_capacity(models.size());
        for (completed, cell) in models.axes().iter().enumerate() {
            if abort.should_abort() {
                return Err(PhzError::Aborted { completed });
            }
            photometries.push(self.cell_photometry(&self.filters, models, cell)?);
            if (completed + 1) % PROGRESS_INTERVAL == 0 {
                info!("Number of models processed: {}", completed + 1);
            }
        }
        PhotometryMatrix::new(models.axes().clone(), photometries)
    }

    /// Same result as [`build`](Self::build), cells spread over the rayon pool.
    ///
    /// Every worker integrates with its own copy of the filters.
    #[cfg(feature = "rayon")]
    pub fn build_parallel(&self, models: &ModelDatasetGenerator, abort: &dyn AbortSignal) -> Result<PhotometryMatrix> {
        use rayon::prelude::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        info!("Number of models to create photometry for: {}", models.size());
        let axes = models.axes();
        let completed = AtomicUsize::new(0);
        let photometries = (0..models.size())
            .into_par_iter()
            .map_init(
                || self.filters.clone(),
                |filters, linear| {
                    if abort.should_abort() {
                        return Err(PhzError::Aborted { completed: completed.load(Ordering::Relaxed) });
                    }
                    let cell = axes
                        .cell_at(linear)
                        .ok_or_else(|| PhzError::domain(format!("cell {linear} is outside the grid")))?;
                    let photometry = self.cell_photometry(filters, models, cell)?;
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % PROGRESS_INTERVAL == 0 {
                        info!("Number of models processed: {done}");
                    }
                    Ok(photometry)
                },
            )
            .collect::<Result<Vec<_>>>()?;
        PhotometryMatrix::new(axes.clone(), photometries)
    }

    fn cell_photometry(
        &self,
        filters: &[FilterInfo],
        models: &ModelDatasetGenerator,
        cell: CellIndex,
    ) -> Result<Photometry> {
        let model = models.model(cell)?;
        photometry(filters, &self.names, &model).map_err(|e| match models.axes().parameters(cell) {
            Some(parameters) => e.with_name(parameters.sed),
            None => e,
        })
    }
}

fn photometry(filters: &[FilterInfo], names: &Arc<Vec<String>>, model: &XYDataset) -> Result<Photometry> {
    let values = filters
        .iter()
        .map(|filter| filter.flux(model).map(|flux| FluxErrorPair::new(flux, 0.0)))
        .collect::<Result<Vec<_>>>()?;
    Photometry::new(Arc::clone(names), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemoryProvider;
    use crate::grid::GridAxes;
    use crate::modeling::NO_REDDENING;
    use crate::photometry::{NeverAbort, SPEED_OF_LIGHT_ANGSTROM};
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Lets `limit` cells through, then asks to stop.
    struct AbortAfter {
        polls: AtomicUsize,
        limit: usize,
    }

    impl AbortSignal for AbortAfter {
        fn should_abort(&self) -> bool {
            self.polls.fetch_add(1, Ordering::Relaxed) >= self.limit
        }
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn name(n: &str) -> QualifiedName {
        QualifiedName::parse(n).unwrap()
    }

    // Sampled on ten equal steps so that a model on the same grid integrates
    // exactly like the normalisation.
    fn top_hat(lo: f64, hi: f64) -> XYDataset {
        let step = (hi - lo) / 10.0;
        XYDataset::from_pairs((0..=10).map(|i| (lo + step * f64::from(i), 1.0)).collect()).unwrap()
    }

    fn flat_f_nu() -> XYDataset {
        let pairs = (1..=100)
            .map(|i| {
                let x = 100.0 * f64::from(i);
                (x, SPEED_OF_LIGHT_ANGSTROM / (x * x))
            })
            .collect();
        XYDataset::from_pairs(pairs).unwrap()
    }

    fn generator(z: Vec<f64>) -> ModelDatasetGenerator {
        let seds = InMemoryProvider::new().with(name("flat"), flat_f_nu());
        let axes = GridAxes::new(z, vec![0.0], vec![name(NO_REDDENING)], vec![name("flat")]).unwrap();
        ModelDatasetGenerator::new(axes, &seds, None).unwrap()
    }

    fn builder() -> PhotometryBuilder {
        PhotometryBuilder::new(vec![
            (name("f/blue"), top_hat(1000.0, 2000.0)),
            (name("f/far"), top_hat(20_000.0, 30_000.0)),
        ])
        .unwrap()
    }

    #[test]
    fn unit_flux_for_matching_sampling() {
        init();
        let matrix = builder().build(&generator(vec![0.0]), &NeverAbort).unwrap();
        assert_eq!(matrix.size(), 1);
        let phot = matrix.at(0, 0, 0, 0).unwrap();
        assert_relative_eq!(phot.values()[0].flux, 1.0, max_relative = 1e-12);
        assert_eq!(phot.values()[0].error, 0.0);
        assert_eq!(phot.values()[1].flux, 0.0);
    }

    #[test]
    fn shares_filter_names() {
        init();
        let matrix = builder().build(&generator(vec![0.0, 0.5]), &NeverAbort).unwrap();
        let mut rows = matrix.iter();
        let (_, first) = rows.next().unwrap();
        let (_, second) = rows.next().unwrap();
        assert!(Arc::ptr_eq(first.filter_names(), second.filter_names()));
        assert_eq!(first.filter_names().as_slice(), &["f/blue".to_string(), "f/far".to_string()]);
    }

    #[test]
    fn rebuilding_is_deterministic() {
        init();
        let generator = generator(vec![0.0, 0.25, 0.5]);
        let a = builder().build(&generator, &NeverAbort).unwrap();
        let b = builder().build(&generator, &NeverAbort).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn abort_discards_result() {
        init();
        let abort = AtomicBool::new(true);
        let err = builder().build(&generator(vec![0.0]), &abort).unwrap_err();
        assert!(matches!(err, PhzError::Aborted { completed: 0 }));
    }

    #[test]
    fn abort_midway_reports_completed_cells() {
        init();
        let abort = AbortAfter { polls: AtomicUsize::new(0), limit: 2 };
        let err = builder().build(&generator(vec![0.0, 0.1, 0.2, 0.3]), &abort).unwrap_err();
        assert!(matches!(err, PhzError::Aborted { completed: 2 }));
        assert_eq!(abort.polls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn missing_filter_is_io_error() {
        let provider = InMemoryProvider::new();
        let err = PhotometryBuilder::from_provider(&provider, &[name("f/none")]).unwrap_err();
        assert!(matches!(err, PhzError::Io { .. }));
    }

    #[test]
    fn bad_filter_reports_its_name() {
        let err = PhotometryBuilder::new(vec![(
            name("f/dead"),
            XYDataset::from_pairs(vec![(1.0, 0.0), (2.0, 0.0)]).unwrap(),
        )])
        .unwrap_err();
        assert!(matches!(err, PhzError::Domain { name: Some(ref n), .. } if n == "f/dead"));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_sequential() {
        init();
        let generator = generator(vec![0.0, 0.1, 0.2, 0.3, 0.4]);
        let sequential = builder().build(&generator, &NeverAbort).unwrap();
        let parallel = builder().build_parallel(&generator, &NeverAbort).unwrap();
        assert_eq!(sequential, parallel);
    }
}
