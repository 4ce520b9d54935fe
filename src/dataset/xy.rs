use crate::error::{PhzError, Result};

/// Immutable `(x, y)` sequence, strictly increasing in `x`, at least two entries.
#[derive(Debug, Clone, PartialEq)]
pub struct XYDataset {
    pairs: Vec<(f64, f64)>,
}

impl XYDataset {
    pub fn from_pairs(pairs: Vec<(f64, f64)>) -> Result<Self> {
        if pairs.len() < 2 {
            return Err(PhzError::domain(format!(
                "dataset needs at least two entries, got {}",
                pairs.len()
            )));
        }
        if let Some(&(x, y)) = pairs.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(PhzError::domain(format!("non-finite dataset entry ({x}, {y})")));
        }
        let unordered = pairs.windows(2).find_map(|w| match *w {
            [(a, _), (b, _)] if a >= b => Some((a, b)),
            _ => None,
        });
        if let Some((a, b)) = unordered {
            return Err(PhzError::domain(format!(
                "x values must be strictly increasing ({a} followed by {b})"
            )));
        }
        Ok(Self { pairs })
    }

    pub fn from_columns(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(PhzError::domain(format!(
                "column lengths differ ({} != {})",
                x.len(),
                y.len()
            )));
        }
        Self::from_pairs(x.into_iter().zip(y).collect())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always `false`; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (f64, f64)> {
        self.pairs.iter()
    }

    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.pairs
    }

    // Both ends exist: construction requires two entries.
    pub fn front(&self) -> (f64, f64) {
        self.pairs.first().copied().unwrap_or_default()
    }

    pub fn back(&self) -> (f64, f64) {
        self.pairs.last().copied().unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a XYDataset {
    type Item = &'a (f64, f64);
    type IntoIter = std::slice::Iter<'a, (f64, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_bounds() {
        let ds = XYDataset::from_pairs(vec![(1.0, 5.0), (2.0, 6.0), (4.0, 7.0)]).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.front(), (1.0, 5.0));
        assert_eq!(ds.back(), (4.0, 7.0));
        let xs: Vec<f64> = ds.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn rejects_single_entry() {
        assert!(matches!(
            XYDataset::from_pairs(vec![(1.0, 1.0)]),
            Err(PhzError::Domain { .. })
        ));
    }

    #[test]
    fn rejects_non_increasing_x() {
        assert!(XYDataset::from_pairs(vec![(1.0, 1.0), (1.0, 2.0)]).is_err());
        assert!(XYDataset::from_columns(vec![2.0, 1.0], vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(XYDataset::from_pairs(vec![(1.0, f64::NAN), (2.0, 1.0)]).is_err());
    }
}
