//! Aggregators built from other aggregators
//!
//! Pre-transform wrappers ([`filtering`], [`mapping`], [`flat_mapping`])
//! adjust elements before delegating, [`collecting_and_then`] post-processes a
//! result, and [`teeing`] fans every element out to two aggregators.

use crate::aggregator::Aggregator;
use crate::error::Result;

/// Drops elements before they reach the downstream aggregator
#[derive(Debug, Clone, Copy)]
pub struct Filtering<P, A> {
    predicate: P,
    downstream: A,
}

/// Forward only elements for which `predicate` holds to `downstream`
pub fn filtering<T, P, A>(predicate: P, downstream: A) -> Filtering<P, A>
where
    P: Fn(&T) -> bool,
{
    Filtering {
        predicate,
        downstream,
    }
}

impl<T, P, A> Aggregator<T> for Filtering<P, A>
where
    P: Fn(&T) -> bool,
    A: Aggregator<T>,
{
    type Acc = A::Acc;
    type Output = A::Output;

    fn seed(&self) -> A::Acc {
        self.downstream.seed()
    }

    fn fold(&self, acc: &mut A::Acc, item: T) -> Result<()> {
        if (self.predicate)(&item) {
            self.downstream.fold(acc, item)?;
        }
        Ok(())
    }

    fn merge(&self, left: A::Acc, right: A::Acc) -> Result<A::Acc> {
        self.downstream.merge(left, right)
    }

    fn finish(&self, acc: A::Acc) -> Result<A::Output> {
        self.downstream.finish(acc)
    }

    fn parallelizable(&self) -> bool {
        self.downstream.parallelizable()
    }
}

/// Transforms elements before they reach the downstream aggregator
#[derive(Debug, Clone, Copy)]
pub struct Mapping<F, A> {
    mapper: F,
    downstream: A,
}

/// Forward `mapper(element)` to `downstream`
pub fn mapping<T, U, F, A>(mapper: F, downstream: A) -> Mapping<F, A>
where
    F: Fn(T) -> U,
{
    Mapping { mapper, downstream }
}

impl<T, U, F, A> Aggregator<T> for Mapping<F, A>
where
    F: Fn(T) -> U,
    A: Aggregator<U>,
{
    type Acc = A::Acc;
    type Output = A::Output;

    fn seed(&self) -> A::Acc {
        self.downstream.seed()
    }

    fn fold(&self, acc: &mut A::Acc, item: T) -> Result<()> {
        self.downstream.fold(acc, (self.mapper)(item))
    }

    fn merge(&self, left: A::Acc, right: A::Acc) -> Result<A::Acc> {
        self.downstream.merge(left, right)
    }

    fn finish(&self, acc: A::Acc) -> Result<A::Output> {
        self.downstream.finish(acc)
    }

    fn parallelizable(&self) -> bool {
        self.downstream.parallelizable()
    }
}

/// Expands elements into zero or more downstream elements
#[derive(Debug, Clone, Copy)]
pub struct FlatMapping<F, A> {
    mapper: F,
    downstream: A,
}

/// Forward every element of `mapper(element)` to `downstream`, in order
pub fn flat_mapping<T, I, F, A>(mapper: F, downstream: A) -> FlatMapping<F, A>
where
    F: Fn(T) -> I,
    I: IntoIterator,
{
    FlatMapping { mapper, downstream }
}

impl<T, I, F, A> Aggregator<T> for FlatMapping<F, A>
where
    F: Fn(T) -> I,
    I: IntoIterator,
    A: Aggregator<I::Item>,
{
    type Acc = A::Acc;
    type Output = A::Output;

    fn seed(&self) -> A::Acc {
        self.downstream.seed()
    }

    fn fold(&self, acc: &mut A::Acc, item: T) -> Result<()> {
        for expanded in (self.mapper)(item) {
            self.downstream.fold(acc, expanded)?;
        }
        Ok(())
    }

    fn merge(&self, left: A::Acc, right: A::Acc) -> Result<A::Acc> {
        self.downstream.merge(left, right)
    }

    fn finish(&self, acc: A::Acc) -> Result<A::Output> {
        self.downstream.finish(acc)
    }

    fn parallelizable(&self) -> bool {
        self.downstream.parallelizable()
    }
}

/// Post-processes the result of another aggregator
#[derive(Debug, Clone, Copy)]
pub struct CollectingAndThen<A, F> {
    downstream: A,
    finisher: F,
}

/// Run `downstream`, then apply `finisher` to its result
pub fn collecting_and_then<A, F>(downstream: A, finisher: F) -> CollectingAndThen<A, F> {
    CollectingAndThen {
        downstream,
        finisher,
    }
}

impl<T, R, A, F> Aggregator<T> for CollectingAndThen<A, F>
where
    A: Aggregator<T>,
    F: Fn(A::Output) -> R,
{
    type Acc = A::Acc;
    type Output = R;

    fn seed(&self) -> A::Acc {
        self.downstream.seed()
    }

    fn fold(&self, acc: &mut A::Acc, item: T) -> Result<()> {
        self.downstream.fold(acc, item)
    }

    fn merge(&self, left: A::Acc, right: A::Acc) -> Result<A::Acc> {
        self.downstream.merge(left, right)
    }

    fn finish(&self, acc: A::Acc) -> Result<R> {
        let result = self.downstream.finish(acc)?;
        Ok((self.finisher)(result))
    }

    fn parallelizable(&self) -> bool {
        self.downstream.parallelizable()
    }
}

/// Runs two aggregators over the same elements and combines their results
#[derive(Debug, Clone, Copy)]
pub struct Teeing<A, B, F> {
    left: A,
    right: B,
    combiner: F,
}

/// Feed every element to both `left` and `right`, then call `combiner` once
/// with both results
pub fn teeing<A, B, F>(left: A, right: B, combiner: F) -> Teeing<A, B, F> {
    Teeing {
        left,
        right,
        combiner,
    }
}

impl<T, R, A, B, F> Aggregator<T> for Teeing<A, B, F>
where
    T: Clone,
    A: Aggregator<T>,
    B: Aggregator<T>,
    F: Fn(A::Output, B::Output) -> R,
{
    type Acc = (A::Acc, B::Acc);
    type Output = R;

    fn seed(&self) -> Self::Acc {
        (self.left.seed(), self.right.seed())
    }

    fn fold(&self, acc: &mut Self::Acc, item: T) -> Result<()> {
        self.left.fold(&mut acc.0, item.clone())?;
        self.right.fold(&mut acc.1, item)
    }

    fn merge(&self, left: Self::Acc, right: Self::Acc) -> Result<Self::Acc> {
        Ok((
            self.left.merge(left.0, right.0)?,
            self.right.merge(left.1, right.1)?,
        ))
    }

    fn finish(&self, acc: Self::Acc) -> Result<R> {
        let left = self.left.finish(acc.0)?;
        let right = self.right.finish(acc.1)?;
        Ok((self.combiner)(left, right))
    }

    fn parallelizable(&self) -> bool {
        self.left.parallelizable() && self.right.parallelizable()
    }
}
