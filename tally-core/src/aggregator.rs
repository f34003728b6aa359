//! Aggregator trait: the terminal reduction policy of a pipeline

use crate::error::Result;

/// A terminal reduction from a sequence of `T` to a single result.
///
/// An aggregator is a stateless descriptor: every evaluation asks it for a
/// fresh accumulator with [`seed`](Aggregator::seed), folds each element into
/// that accumulator and finally turns it into the result with
/// [`finish`](Aggregator::finish). The same descriptor can be evaluated any
/// number of times and nested inside other aggregators.
pub trait Aggregator<T> {
    /// Mutable state owned by a single evaluation
    type Acc;

    /// The type of the final result
    type Output;

    /// Create the initial accumulator for one evaluation
    fn seed(&self) -> Self::Acc;

    /// Fold one element into the accumulator
    fn fold(&self, acc: &mut Self::Acc, item: T) -> Result<()>;

    /// Combine two partial accumulators built over adjacent ranges, `left` first
    fn merge(&self, left: Self::Acc, right: Self::Acc) -> Result<Self::Acc>;

    /// Turn the final accumulator into the result
    fn finish(&self, acc: Self::Acc) -> Result<Self::Output>;

    /// Whether partial accumulators may be built independently and merged
    fn parallelizable(&self) -> bool {
        true
    }

    /// Evaluate this aggregator over any iterable, left to right
    fn aggregate<I>(&self, items: I) -> Result<Self::Output>
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        let mut acc = self.seed();

        for item in items {
            self.fold(&mut acc, item)?;
        }

        self.finish(acc)
    }
}

impl<T, A> Aggregator<T> for &A
where
    A: Aggregator<T> + ?Sized,
{
    type Acc = A::Acc;
    type Output = A::Output;

    fn seed(&self) -> Self::Acc {
        (**self).seed()
    }

    fn fold(&self, acc: &mut Self::Acc, item: T) -> Result<()> {
        (**self).fold(acc, item)
    }

    fn merge(&self, left: Self::Acc, right: Self::Acc) -> Result<Self::Acc> {
        (**self).merge(left, right)
    }

    fn finish(&self, acc: Self::Acc) -> Result<Self::Output> {
        (**self).finish(acc)
    }

    fn parallelizable(&self) -> bool {
        (**self).parallelizable()
    }
}
