use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use super::{FluxErrorPair, Photometry};
use crate::error::{PhzError, Result};
use crate::grid::{CellIndex, GridAxes};

const FORMAT_VERSION: u32 = 1;

/// Photometry of every cell of a model grid.
///
/// Entries are stored flat in grid order: SED slowest, then reddening curve,
/// then E(B-V), with the redshift varying fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotometryMatrix {
    axes: GridAxes,
    filters: Arc<Vec<String>>,
    photometries: Vec<Photometry>,
}

/// On-disk layout.
#[derive(Serialize, Deserialize)]
struct MatrixRecord {
    version: u32,
    axes: GridAxes,
    filters: Vec<String>,
    rows: Vec<Vec<FluxErrorPair>>,
}

impl PhotometryMatrix {
    /// One photometry per cell, all over the same filters.
    pub fn new(axes: GridAxes, photometries: Vec<Photometry>) -> Result<Self> {
        if photometries.len() != axes.size() {
            return Err(PhzError::domain(format!(
                "grid has {} cells but {} photometries were given",
                axes.size(),
                photometries.len()
            )));
        }
        let filters = photometries
            .first()
            .map(|p| Arc::clone(p.filter_names()))
            .ok_or_else(|| PhzError::domain("photometry matrix is empty"))?;
        if let Some(bad) = photometries.iter().find(|p| p.filter_names() != &filters) {
            return Err(PhzError::domain(format!(
                "photometry over filters {:?} differs from {:?}",
                bad.filter_names(),
                filters
            )));
        }
        Ok(Self { axes, filters, photometries })
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn filter_names(&self) -> &Arc<Vec<String>> {
        &self.filters
    }

    pub fn size(&self) -> usize {
        self.photometries.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (CellIndex, &Photometry)> {
        self.axes.iter().zip(&self.photometries)
    }

    pub fn get(&self, cell: CellIndex) -> Option<&Photometry> {
        self.axes.linear_index(cell).and_then(|i| self.photometries.get(i))
    }

    pub fn at(&self, z: usize, ebv: usize, curve: usize, sed: usize) -> Option<&Photometry> {
        self.get(CellIndex::new(z, ebv, curve, sed))
    }

    pub fn flux(&self, filter: usize, z: usize, ebv: usize, curve: usize, sed: usize) -> Option<f64> {
        self.at(z, ebv, curve, sed)?.values().get(filter).map(|v| v.flux)
    }

    /// Smallest and largest flux of one filter over the grid.
    pub fn flux_range(&self, filter: usize) -> Option<(f64, f64)> {
        self.photometries
            .iter()
            .filter_map(|p| p.values().get(filter).map(|v| v.flux))
            .fold(None, |acc, f| match acc {
                None => Some((f, f)),
                Some((lo, hi)) => Some((lo.min(f), hi.max(f))),
            })
    }

    pub fn write_binary<W: Write>(&self, writer: &mut W) -> Result<()> {
        let record = MatrixRecord {
            version: FORMAT_VERSION,
            axes: self.axes.clone(),
            filters: self.filters.as_ref().clone(),
            rows: self.photometries.iter().map(|p| p.values().to_vec()).collect(),
        };
        rmp_serde::encode::write(writer, &record)?;
        Ok(())
    }

    pub fn read_binary<R: Read>(reader: &mut R) -> Result<Self> {
        let record: MatrixRecord = rmp_serde::decode::from_read(reader)?;
        if record.version != FORMAT_VERSION {
            return Err(PhzError::Serialization(format!(
                "unsupported photometry matrix version {}",
                record.version
            )));
        }
        // Deserialisation bypasses the axis checks.
        let axes = GridAxes::new(
            record.axes.z().knots().to_vec(),
            record.axes.ebv().knots().to_vec(),
            record.axes.curves().knots().to_vec(),
            record.axes.seds().knots().to_vec(),
        )?;
        let filters = Arc::new(record.filters);
        let photometries = record
            .rows
            .into_iter()
            .map(|row| Photometry::new(Arc::clone(&filters), row))
            .collect::<Result<Vec<_>>>()?;
        Self::new(axes, photometries)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| PhzError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_binary(&mut writer)?;
        writer.flush().map_err(|e| PhzError::io(path, e))?;
        info!("photometry matrix of {} models written to {}", self.size(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PhzError::io(path, e))?;
        Self::read_binary(&mut BufReader::new(file))
    }

    /// One row per cell: parameters, then one flux column per filter.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let header = ["z", "ebv", "reddening_curve", "sed"]
            .into_iter()
            .map(str::to_string)
            .chain(self.filters.iter().cloned());
        csv.write_record(header)?;

        for (cell, photometry) in self.iter() {
            let parameters = self
                .axes
                .parameters(cell)
                .ok_or_else(|| PhzError::domain(format!("cell {cell:?} is outside the grid")))?;
            let row = [
                parameters.z.to_string(),
                parameters.ebv.to_string(),
                parameters.curve.to_string(),
                parameters.sed.to_string(),
            ]
            .into_iter()
            .chain(photometry.values().iter().map(|v| v.flux.to_string()));
            csv.write_record(row)?;
        }
        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::QualifiedName;

    fn names(names: &[&str]) -> Vec<QualifiedName> {
        names.iter().map(|n| QualifiedName::parse(n).unwrap()).collect()
    }

    fn matrix() -> PhotometryMatrix {
        let axes = GridAxes::new(vec![0.0, 1.0], vec![0.0], names(&["none"]), names(&["a", "b"])).unwrap();
        let filters = Arc::new(vec!["g".to_string(), "r".to_string()]);
        let photometries = (0..4)
            .map(|i| {
                let f = f64::from(i);
                Photometry::new(
                    Arc::clone(&filters),
                    vec![FluxErrorPair::new(f, 0.0), FluxErrorPair::new(10.0 * f, 0.0)],
                )
                .unwrap()
            })
            .collect();
        PhotometryMatrix::new(axes, photometries).unwrap()
    }

    #[test]
    fn random_access_follows_grid_order() {
        let m = matrix();
        assert_eq!(m.size(), 4);
        assert_eq!(m.flux(0, 1, 0, 0, 0), Some(1.0));
        assert_eq!(m.flux(1, 0, 0, 0, 1), Some(20.0));
        assert_eq!(m.flux(2, 0, 0, 0, 0), None);
        assert!(m.at(2, 0, 0, 0).is_none());
        assert_eq!(m.flux_range(1), Some((0.0, 30.0)));
    }

    #[test]
    fn size_must_match_grid() {
        let m = matrix();
        let err = PhotometryMatrix::new(m.axes().clone(), m.photometries[..3].to_vec()).unwrap_err();
        assert!(matches!(err, PhzError::Domain { .. }));
    }

    #[test]
    fn binary_round_trip() {
        let m = matrix();
        let mut buffer = Vec::new();
        m.write_binary(&mut buffer).unwrap();
        let back = PhotometryMatrix::read_binary(&mut buffer.as_slice()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn truncated_stream_is_serialization_error() {
        let mut buffer = Vec::new();
        matrix().write_binary(&mut buffer).unwrap();
        buffer.truncate(buffer.len() / 2);
        let err = PhotometryMatrix::read_binary(&mut buffer.as_slice()).unwrap_err();
        assert!(matches!(err, PhzError::Serialization(_)));
    }

    #[test]
    fn csv_has_one_row_per_cell() {
        let mut out = Vec::new();
        matrix().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "z,ebv,reddening_curve,sed,g,r");
        assert_eq!(lines[2], "1,0,none,a,1,10");
        assert_eq!(lines.len(), 5);
    }
}
