//! Command-line options of `create-model-photometry` and their resolution
//! into a model grid, a filter list and dataset providers.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use crate::dataset::{DatasetProvider, FileSystemProvider, QualifiedName};
use crate::error::{PhzError, Result};
use crate::grid::{GridAxes, numeric_range};
use crate::modeling::{ModelDatasetGenerator, NO_REDDENING};
use crate::photometry::{AbortSignal, PhotometryBuilder, PhotometryMatrix};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "create-model-photometry",
    about = "Computes the photometry of every model of a redshift, E(B-V), reddening curve and SED grid",
    long_about = None
)]
pub struct ModelingArgs {
    /// Output file of the binary photometry matrix
    #[arg(long)]
    pub binary_photometry_matrix: Option<PathBuf>,

    /// Optional CSV export of the matrix
    #[arg(long)]
    pub csv_photometry_matrix: Option<PathBuf>,

    /// Root directory of the SED templates
    #[arg(long)]
    pub sed_root_path: Option<PathBuf>,

    /// SED group to include (repeatable)
    #[arg(long)]
    pub sed_group: Vec<String>,

    /// Qualified SED name to include (repeatable)
    #[arg(long)]
    pub sed_list: Vec<String>,

    /// Root directory of the reddening curves
    #[arg(long)]
    pub reddening_curve_root_path: Option<PathBuf>,

    /// Reddening curve group to include (repeatable)
    #[arg(long)]
    pub reddening_curve_group: Vec<String>,

    /// Qualified reddening curve name to include, `none` for no reddening (repeatable)
    #[arg(long)]
    pub reddening_curve_list: Vec<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub ebv_start: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub ebv_stop: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub ebv_step: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub z_start: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub z_stop: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub z_step: Option<f64>,

    /// Root directory of the filter transmissions
    #[arg(long)]
    pub filter_root_path: Option<PathBuf>,

    /// Filter group to include (repeatable)
    #[arg(long)]
    pub filter_group: Vec<String>,

    /// Qualified filter name to include (repeatable)
    #[arg(long)]
    pub filter_list: Vec<String>,

    /// Spread the cells over all cores (needs the `rayon` feature)
    #[arg(long)]
    pub parallel: bool,
}

/// Resolved inputs of a photometry run.
pub struct ModelingConfig {
    output: PathBuf,
    csv_output: Option<PathBuf>,
    axes: GridAxes,
    filters: Vec<QualifiedName>,
    sed_provider: Box<dyn DatasetProvider>,
    curve_provider: Option<Box<dyn DatasetProvider>>,
    filter_provider: Box<dyn DatasetProvider>,
    parallel: bool,
}

impl fmt::Debug for ModelingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelingConfig")
            .field("output", &self.output)
            .field("csv_output", &self.csv_output)
            .field("axes", &self.axes)
            .field("filters", &self.filters)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl ModelingConfig {
    /// Indexes the three root directories, then resolves the selections.
    pub fn from_args(args: &ModelingArgs) -> Result<Self> {
        let sed_root = required(args.sed_root_path.as_ref(), "sed-root-path")?;
        let filter_root = required(args.filter_root_path.as_ref(), "filter-root-path")?;
        let curve_provider = args
            .reddening_curve_root_path
            .as_ref()
            .map(|root| FileSystemProvider::new(root).map(|p| Box::new(p) as Box<dyn DatasetProvider>))
            .transpose()?;
        Self::with_providers(
            args,
            Box::new(FileSystemProvider::new(sed_root)?),
            curve_provider,
            Box::new(FileSystemProvider::new(filter_root)?),
        )
    }

    /// Resolves the selections against already built providers.
    pub fn with_providers(
        args: &ModelingArgs,
        sed_provider: Box<dyn DatasetProvider>,
        curve_provider: Option<Box<dyn DatasetProvider>>,
        filter_provider: Box<dyn DatasetProvider>,
    ) -> Result<Self> {
        let output = required(args.binary_photometry_matrix.as_ref(), "binary-photometry-matrix")?.clone();

        let z = range("z", args.z_start, args.z_stop, args.z_step)?;
        let ebv = range("ebv", args.ebv_start, args.ebv_stop, args.ebv_step)?;
        let seds = select(sed_provider.as_ref(), &args.sed_group, &args.sed_list, "SED")?;
        let curves = select_curves(
            curve_provider.as_deref(),
            &args.reddening_curve_group,
            &args.reddening_curve_list,
        )?;
        let filters = select(filter_provider.as_ref(), &args.filter_group, &args.filter_list, "filter")?;

        Ok(Self {
            output,
            csv_output: args.csv_photometry_matrix.clone(),
            axes: GridAxes::new(z, ebv, curves, seds)?,
            filters,
            sed_provider,
            curve_provider,
            filter_provider,
            parallel: args.parallel,
        })
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn filters(&self) -> &[QualifiedName] {
        &self.filters
    }

    pub fn output(&self) -> &PathBuf {
        &self.output
    }

    pub fn generator(&self) -> Result<ModelDatasetGenerator> {
        ModelDatasetGenerator::new(
            self.axes.clone(),
            self.sed_provider.as_ref(),
            self.curve_provider.as_deref(),
        )
    }

    pub fn photometry_builder(&self) -> Result<PhotometryBuilder> {
        PhotometryBuilder::from_provider(self.filter_provider.as_ref(), &self.filters)
    }

    /// Builds the matrix and writes it to the configured outputs.
    pub fn run(&self, abort: &dyn AbortSignal) -> Result<PhotometryMatrix> {
        let generator = self.generator()?;
        let builder = self.photometry_builder()?;

        #[cfg(feature = "rayon")]
        let matrix = if self.parallel {
            builder.build_parallel(&generator, abort)?
        } else {
            builder.build(&generator, abort)?
        };
        #[cfg(not(feature = "rayon"))]
        let matrix = {
            if self.parallel {
                warn!("built without the rayon feature, computing sequentially");
            }
            builder.build(&generator, abort)?
        };

        matrix.save(&self.output)?;
        if let Some(path) = &self.csv_output {
            let file = File::create(path).map_err(|e| PhzError::io(path, e))?;
            matrix.write_csv(BufWriter::new(file))?;
            info!("CSV export written to {}", path.display());
        }
        Ok(matrix)
    }
}

fn required<'a, T>(value: Option<&'a T>, option: &str) -> Result<&'a T> {
    value.ok_or_else(|| PhzError::config(format!("missing required option --{option}")))
}

/// A missing stop means a single value; a missing step is only valid then.
fn range(axis: &str, start: Option<f64>, stop: Option<f64>, step: Option<f64>) -> Result<Vec<f64>> {
    let start = start.ok_or_else(|| PhzError::config(format!("missing required option --{axis}-start")))?;
    let stop = stop.unwrap_or(start);
    match step {
        Some(step) => numeric_range(start, stop, step),
        None if start.total_cmp(&stop).is_eq() => Ok(vec![start]),
        None => Err(PhzError::config(format!("missing required option --{axis}-step"))),
    }
}

/// Group contents followed by the explicit list, first occurrence kept.
fn select(
    provider: &dyn DatasetProvider,
    groups: &[String],
    list: &[String],
    kind: &str,
) -> Result<Vec<QualifiedName>> {
    let mut names = Vec::new();
    for group in groups {
        let contents = provider.list_contents(group)?;
        if contents.is_empty() {
            warn!("{kind} group '{group}' is empty");
        }
        names.extend(contents);
    }
    for name in list {
        let parsed = QualifiedName::parse(name)
            .map_err(|e| PhzError::config(format!("invalid {kind} list entry '{name}': {e}")))?;
        names.push(parsed);
    }
    let names = dedup(names);
    if names.is_empty() {
        return Err(PhzError::config(format!("no {kind} selected")));
    }
    info!("selected {} {kind}s", names.len());
    Ok(names)
}

fn select_curves(
    provider: Option<&dyn DatasetProvider>,
    groups: &[String],
    list: &[String],
) -> Result<Vec<QualifiedName>> {
    match provider {
        Some(provider) => select(provider, groups, list, "reddening curve"),
        None if !groups.is_empty() => Err(PhzError::config(
            "reddening curve groups need --reddening-curve-root-path",
        )),
        None => {
            if let Some(name) = list.iter().find(|n| n.as_str() != NO_REDDENING) {
                return Err(PhzError::config(format!(
                    "reddening curve '{name}' needs --reddening-curve-root-path"
                )));
            }
            select(&crate::dataset::InMemoryProvider::new(), groups, list, "reddening curve")
        }
    }
}

fn dedup(names: Vec<QualifiedName>) -> Vec<QualifiedName> {
    let mut seen = HashSet::new();
    names.into_iter().filter(|n| seen.insert(n.clone())).collect()
}
