use std::iter::FusedIterator;

use super::CellIndex;

/// Enumerates every cell of a grid, z fastest and SED slowest.
///
/// A fresh iterator is obtained from [`GridAxes::iter`](super::GridAxes::iter)
/// for every pass.
#[derive(Debug, Clone)]
pub struct CellIter {
    dimensions: [usize; 4],
    front: usize,
    back: usize,
}

impl CellIter {
    pub(super) fn new(dimensions: [usize; 4]) -> Self {
        Self {
            dimensions,
            front: 0,
            back: dimensions.iter().product(),
        }
    }
}

pub(super) fn unravel(linear: usize, [nz, ne, nc, _]: [usize; 4]) -> CellIndex {
    let z = linear % nz;
    let rest = linear / nz;
    let ebv = rest % ne;
    let rest = rest / ne;
    CellIndex {
        z,
        ebv,
        curve: rest % nc,
        sed: rest / nc,
    }
}

impl Iterator for CellIter {
    type Item = CellIndex;

    #[inline]
    fn next(&mut self) -> Option<CellIndex> {
        if self.front >= self.back {
            return None;
        }
        let cell = unravel(self.front, self.dimensions);
        self.front += 1;
        Some(cell)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<CellIndex> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for CellIter {
    fn next_back(&mut self) -> Option<CellIndex> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(unravel(self.back, self.dimensions))
    }
}

impl ExactSizeIterator for CellIter {}
impl FusedIterator for CellIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let mut it = CellIter::new([2, 1, 1, 1]);
        assert!(it.next().is_some());
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn nth_skips_cells() {
        let mut it = CellIter::new([2, 2, 2, 2]);
        assert_eq!(it.nth(5), Some(CellIndex::new(1, 0, 1, 0)));
        assert_eq!(it.len(), 10);
        assert_eq!(it.nth(100), None);
    }

    #[test]
    fn reversed_order() {
        let cells: Vec<_> = CellIter::new([2, 1, 1, 2]).rev().collect();
        assert_eq!(cells.first(), Some(&CellIndex::new(1, 0, 0, 1)));
        assert_eq!(cells.last(), Some(&CellIndex::new(0, 0, 0, 0)));
    }
}
