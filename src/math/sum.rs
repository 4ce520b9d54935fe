use num_traits::Float;
use std::iter::Sum;
use std::ops::AddAssign;

/// Compensated (Kahan) accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum<F> {
    sum: F,
    c: F,
}

impl<F: Float> KahanSum<F> {
    pub fn new() -> Self {
        Self { sum: F::zero(), c: F::zero() }
    }

    #[inline]
    pub fn add(&mut self, x: F) {
        let y = x - self.c;
        let t = self.sum + y;
        self.c = (t - self.sum) - y;
        self.sum = t;
    }

    #[inline]
    pub fn value(&self) -> F {
        self.sum
    }
}

impl<F: Float> AddAssign<F> for KahanSum<F> {
    #[inline]
    fn add_assign(&mut self, x: F) {
        self.add(x);
    }
}

impl<F: Float> Sum<F> for KahanSum<F> {
    fn sum<I: Iterator<Item = F>>(iter: I) -> Self {
        let mut acc = KahanSum::new();
        for x in iter {
            acc.add(x);
        }
        acc
    }
}

/// Kahan summation of any float iterator.
#[inline]
pub fn kahan_sum<F: Float, I: IntoIterator<Item = F>>(values: I) -> F {
    values.into_iter().sum::<KahanSum<F>>().value()
}
