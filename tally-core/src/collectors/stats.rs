//! Numeric element types and summary statistics

use std::fmt;
use std::ops::Add;

use serde::Serialize;

use crate::aggregator::Aggregator;
use crate::error::Result;

/// A primitive numeric type that can be summed and widened to `f64`
pub trait Numeric: Copy + Default + Add<Output = Self> {
    /// Widen to `f64` for averaging and statistics
    fn to_f64(self) -> f64;

    /// Add, or `None` when the result does not fit in `Self`.
    ///
    /// Floating point sums never overflow; they saturate to infinity.
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_numeric {
    (int: $($t:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                #[allow(clippy::cast_lossless, clippy::cast_precision_loss)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
    (float: $($t:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                #[allow(clippy::cast_lossless)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn checked_add(self, rhs: Self) -> Option<Self> {
                    Some(self + rhs)
                }
            }
        )*
    };
}

impl_numeric!(int: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_numeric!(float: f32, f64);

/// Count, sum, minimum and maximum of a numeric projection.
///
/// An empty bundle has count 0, sum 0, minimum `+∞`, maximum `-∞` and an
/// average of NaN. Once a NaN is recorded the sum, minimum, maximum and
/// average are all NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

fn lesser(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn greater(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

impl Statistics {
    /// Record one value
    pub fn accept(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = lesser(self.min, value);
        self.max = greater(self.max, value);
    }

    /// Fold another bundle into this one
    pub fn combine(&mut self, other: &Statistics) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = lesser(self.min, other.min);
        self.max = greater(self.max, other.max);
    }

    /// Number of values recorded
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of the values
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Smallest value, `+∞` when empty
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest value, `-∞` when empty
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Arithmetic mean, NaN when empty
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Statistics {{ count: {}, sum: {}, min: {}, average: {}, max: {} }}",
            self.count,
            self.sum,
            self.min,
            self.average(),
            self.max
        )
    }
}

/// Summary statistics over a numeric projection
#[derive(Debug, Clone, Copy)]
pub struct Summarizing<F> {
    mapper: F,
}

/// Gather [`Statistics`] over `mapper(element)`
pub fn summarizing<T, N, F>(mapper: F) -> Summarizing<F>
where
    F: Fn(&T) -> N,
{
    Summarizing { mapper }
}

impl<T, N, F> Aggregator<T> for Summarizing<F>
where
    F: Fn(&T) -> N,
    N: Numeric,
{
    type Acc = Statistics;
    type Output = Statistics;

    fn seed(&self) -> Statistics {
        Statistics::default()
    }

    fn fold(&self, acc: &mut Statistics, item: T) -> Result<()> {
        acc.accept((self.mapper)(&item).to_f64());
        Ok(())
    }

    fn merge(&self, mut left: Statistics, right: Statistics) -> Result<Statistics> {
        left.combine(&right);
        Ok(left)
    }

    fn finish(&self, acc: Statistics) -> Result<Statistics> {
        Ok(acc)
    }
}
