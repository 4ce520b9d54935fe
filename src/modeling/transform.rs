use crate::dataset::XYDataset;
use crate::error::{PhzError, Result};
use crate::function::{Evaluate, Function};

/// Reddening curve name standing for `k(λ) ≡ 0`.
pub const NO_REDDENING: &str = "none";

/// `y(λ) · 10^(-0.4 · ebv · k(λ))` at every sample.
pub fn attenuate(sed: &XYDataset, ebv: f64, curve: &Function) -> Result<XYDataset> {
    let pairs = sed
        .iter()
        .map(|&(x, y)| (x, y * 10f64.powf(-0.4 * ebv * curve.value(x))))
        .collect();
    XYDataset::from_pairs(pairs)
}

/// `λ → λ(1+z)`, `y → y/(1+z)`.
pub fn redshift(sed: &XYDataset, z: f64) -> Result<XYDataset> {
    if !(z > -1.0) {
        return Err(PhzError::domain(format!("redshift must be above -1, got {z}")));
    }
    let factor = 1.0 + z;
    XYDataset::from_pairs(sed.iter().map(|&(x, y)| (x * factor, y / factor)).collect())
}

/// Attenuate in the rest frame, then redshift.
///
/// `curve` is `None` for [`NO_REDDENING`]; a zero `ebv` or redshift skips the
/// corresponding step.
pub fn transform_sed(sed: &XYDataset, z: f64, ebv: f64, curve: Option<&Function>) -> Result<XYDataset> {
    let (first, _) = sed.front();
    if first <= 0.0 {
        return Err(PhzError::domain(format!(
            "SED wavelengths must be strictly positive, found {first}"
        )));
    }

    let reddened = match curve {
        Some(curve) if ebv.abs() > 0.0 => attenuate(sed, ebv, curve)?,
        _ => sed.clone(),
    };
    if z.abs() > 0.0 {
        redshift(&reddened, z)
    } else {
        Ok(reddened)
    }
}
