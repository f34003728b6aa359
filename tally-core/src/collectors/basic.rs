//! Scalar and container aggregators

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::aggregator::Aggregator;
use crate::collectors::stats::Numeric;
use crate::error::{Error, Result};

/// Counts elements
#[derive(Debug, Clone, Copy, Default)]
pub struct Counting;

/// Count the elements of a sequence; an empty sequence counts 0
pub fn counting() -> Counting {
    Counting
}

impl<T> Aggregator<T> for Counting {
    type Acc = u64;
    type Output = u64;

    fn seed(&self) -> u64 {
        0
    }

    fn fold(&self, acc: &mut u64, _item: T) -> Result<()> {
        *acc += 1;
        Ok(())
    }

    fn merge(&self, left: u64, right: u64) -> Result<u64> {
        Ok(left + right)
    }

    fn finish(&self, acc: u64) -> Result<u64> {
        Ok(acc)
    }
}

/// Sums a numeric projection of each element
#[derive(Debug, Clone, Copy)]
pub struct Summing<F> {
    mapper: F,
}

/// Sum `mapper(element)` over the sequence; an empty sequence sums to zero.
///
/// An integer sum that leaves the range of `N` fails with
/// [`Error::InvalidArgument`].
pub fn summing<T, N, F>(mapper: F) -> Summing<F>
where
    F: Fn(&T) -> N,
{
    Summing { mapper }
}

impl<T, N, F> Aggregator<T> for Summing<F>
where
    F: Fn(&T) -> N,
    N: Numeric,
{
    type Acc = N;
    type Output = N;

    fn seed(&self) -> N {
        N::default()
    }

    fn fold(&self, acc: &mut N, item: T) -> Result<()> {
        *acc = checked_sum(*acc, (self.mapper)(&item))?;
        Ok(())
    }

    fn merge(&self, left: N, right: N) -> Result<N> {
        checked_sum(left, right)
    }

    fn finish(&self, acc: N) -> Result<N> {
        Ok(acc)
    }
}

fn checked_sum<N: Numeric>(left: N, right: N) -> Result<N> {
    left.checked_add(right).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "sum overflowed {}",
            std::any::type_name::<N>()
        ))
    })
}

/// Running count and sum for an arithmetic mean
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    count: u64,
    sum: f64,
}

/// Arithmetic mean of a numeric projection
#[derive(Debug, Clone, Copy)]
pub struct Averaging<F> {
    mapper: F,
}

/// Average `mapper(element)` over the sequence.
///
/// An empty sequence has no mean and fails with [`Error::EmptyAggregation`].
pub fn averaging<T, N, F>(mapper: F) -> Averaging<F>
where
    F: Fn(&T) -> N,
{
    Averaging { mapper }
}

impl<T, N, F> Aggregator<T> for Averaging<F>
where
    F: Fn(&T) -> N,
    N: Numeric,
{
    type Acc = Mean;
    type Output = f64;

    fn seed(&self) -> Mean {
        Mean::default()
    }

    fn fold(&self, acc: &mut Mean, item: T) -> Result<()> {
        acc.count += 1;
        acc.sum += (self.mapper)(&item).to_f64();
        Ok(())
    }

    fn merge(&self, left: Mean, right: Mean) -> Result<Mean> {
        Ok(Mean {
            count: left.count + right.count,
            sum: left.sum + right.sum,
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: Mean) -> Result<f64> {
        if acc.count == 0 {
            return Err(Error::EmptyAggregation(
                "averaging requires at least one element".into(),
            ));
        }

        Ok(acc.sum / acc.count as f64)
    }
}

/// Keeps the extreme element under a comparator
#[derive(Debug, Clone, Copy)]
pub struct Extreme<C> {
    compare: C,
    keep: Ordering,
}

/// Smallest element under `compare`; ties keep the earlier element
pub fn min_by<T, C>(compare: C) -> Extreme<C>
where
    C: Fn(&T, &T) -> Ordering,
{
    Extreme {
        compare,
        keep: Ordering::Less,
    }
}

/// Largest element under `compare`; ties keep the earlier element
pub fn max_by<T, C>(compare: C) -> Extreme<C>
where
    C: Fn(&T, &T) -> Ordering,
{
    Extreme {
        compare,
        keep: Ordering::Greater,
    }
}

/// Element with the smallest key
pub fn min_by_key<T, K, F>(key: F) -> Extreme<impl Fn(&T, &T) -> Ordering>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    min_by(move |a: &T, b: &T| key(a).cmp(&key(b)))
}

/// Element with the largest key
pub fn max_by_key<T, K, F>(key: F) -> Extreme<impl Fn(&T, &T) -> Ordering>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    max_by(move |a: &T, b: &T| key(a).cmp(&key(b)))
}

impl<C> Extreme<C> {
    fn pick<T>(&self, current: T, candidate: T) -> T
    where
        C: Fn(&T, &T) -> Ordering,
    {
        if (self.compare)(&candidate, &current) == self.keep {
            candidate
        } else {
            current
        }
    }
}

impl<T, C> Aggregator<T> for Extreme<C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Acc = Option<T>;
    type Output = Option<T>;

    fn seed(&self) -> Option<T> {
        None
    }

    fn fold(&self, acc: &mut Option<T>, item: T) -> Result<()> {
        *acc = Some(match acc.take() {
            Some(current) => self.pick(current, item),
            None => item,
        });
        Ok(())
    }

    fn merge(&self, left: Option<T>, right: Option<T>) -> Result<Option<T>> {
        Ok(match (left, right) {
            (Some(l), Some(r)) => Some(self.pick(l, r)),
            (l, r) => l.or(r),
        })
    }

    fn finish(&self, acc: Option<T>) -> Result<Option<T>> {
        Ok(acc)
    }
}

/// Reduces elements pairwise without a seed
#[derive(Debug, Clone, Copy)]
pub struct Reducing<F> {
    op: F,
}

/// Combine elements left to right with `op`; an empty sequence yields `None`
pub fn reducing<T, F>(op: F) -> Reducing<F>
where
    F: Fn(T, T) -> T,
{
    Reducing { op }
}

impl<T, F> Aggregator<T> for Reducing<F>
where
    F: Fn(T, T) -> T,
{
    type Acc = Option<T>;
    type Output = Option<T>;

    fn seed(&self) -> Option<T> {
        None
    }

    fn fold(&self, acc: &mut Option<T>, item: T) -> Result<()> {
        *acc = Some(match acc.take() {
            Some(current) => (self.op)(current, item),
            None => item,
        });
        Ok(())
    }

    fn merge(&self, left: Option<T>, right: Option<T>) -> Result<Option<T>> {
        Ok(match (left, right) {
            (Some(l), Some(r)) => Some((self.op)(l, r)),
            (l, r) => l.or(r),
        })
    }

    fn finish(&self, acc: Option<T>) -> Result<Option<T>> {
        Ok(acc)
    }
}

/// Reduces elements pairwise starting from a seed
#[derive(Debug, Clone, Copy)]
pub struct ReducingWith<T, F> {
    seed: T,
    op: F,
}

/// Combine elements left to right with `op`, starting from `seed`.
///
/// An empty sequence yields `seed`. Partial results are merged with `op`
/// too, so `seed` must be an identity of `op` for parallel evaluation.
pub fn reducing_with<T, F>(seed: T, op: F) -> ReducingWith<T, F>
where
    F: Fn(T, T) -> T,
{
    ReducingWith { seed, op }
}

impl<T, F> Aggregator<T> for ReducingWith<T, F>
where
    T: Clone,
    F: Fn(T, T) -> T,
{
    type Acc = Option<T>;
    type Output = T;

    fn seed(&self) -> Option<T> {
        Some(self.seed.clone())
    }

    fn fold(&self, acc: &mut Option<T>, item: T) -> Result<()> {
        if let Some(current) = acc.take() {
            *acc = Some((self.op)(current, item));
        }
        Ok(())
    }

    fn merge(&self, left: Option<T>, right: Option<T>) -> Result<Option<T>> {
        Ok(match (left, right) {
            (Some(l), Some(r)) => Some((self.op)(l, r)),
            (l, r) => l.or(r),
        })
    }

    fn finish(&self, acc: Option<T>) -> Result<T> {
        Ok(acc.unwrap_or_else(|| self.seed.clone()))
    }
}

/// Left fold into an accumulator of a different type
#[derive(Debug, Clone, Copy)]
pub struct Folding<B, F> {
    seed: B,
    step: F,
}

/// Fold elements left to right into `seed` with `step`.
///
/// Partial folds cannot be combined, so this aggregator always runs
/// sequentially.
pub fn folding<T, B, F>(seed: B, step: F) -> Folding<B, F>
where
    F: Fn(B, T) -> B,
{
    Folding { seed, step }
}

impl<T, B, F> Aggregator<T> for Folding<B, F>
where
    B: Clone,
    F: Fn(B, T) -> B,
{
    type Acc = Option<B>;
    type Output = B;

    fn seed(&self) -> Option<B> {
        Some(self.seed.clone())
    }

    fn fold(&self, acc: &mut Option<B>, item: T) -> Result<()> {
        if let Some(current) = acc.take() {
            *acc = Some((self.step)(current, item));
        }
        Ok(())
    }

    fn merge(&self, _left: Option<B>, _right: Option<B>) -> Result<Option<B>> {
        Err(Error::IllegalState(
            "a left fold cannot merge partial results".into(),
        ))
    }

    fn finish(&self, acc: Option<B>) -> Result<B> {
        Ok(acc.unwrap_or_else(|| self.seed.clone()))
    }

    fn parallelizable(&self) -> bool {
        false
    }
}

/// Keeps the first element seen
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

/// The first element in encounter order, or `None` when empty
pub fn first() -> First {
    First
}

impl<T> Aggregator<T> for First {
    type Acc = Option<T>;
    type Output = Option<T>;

    fn seed(&self) -> Option<T> {
        None
    }

    fn fold(&self, acc: &mut Option<T>, item: T) -> Result<()> {
        if acc.is_none() {
            *acc = Some(item);
        }
        Ok(())
    }

    fn merge(&self, left: Option<T>, right: Option<T>) -> Result<Option<T>> {
        Ok(left.or(right))
    }

    fn finish(&self, acc: Option<T>) -> Result<Option<T>> {
        Ok(acc)
    }

    fn parallelizable(&self) -> bool {
        false
    }
}

/// Collects elements into a container
pub struct ToCollection<C> {
    _container: PhantomData<fn() -> C>,
}

impl<C> Clone for ToCollection<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ToCollection<C> {}

impl<C> std::fmt::Debug for ToCollection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToCollection")
            .field("container", &std::any::type_name::<C>())
            .finish()
    }
}

/// Collect into any container built with `Default` and `Extend`, e.g. a `LinkedList`
pub fn to_collection<C>() -> ToCollection<C> {
    ToCollection {
        _container: PhantomData,
    }
}

/// Collect into a `Vec` in encounter order
pub fn to_list<T>() -> ToCollection<Vec<T>> {
    to_collection()
}

/// Collect distinct elements into a `HashSet`
pub fn to_set<T: Eq + Hash>() -> ToCollection<HashSet<T>> {
    to_collection()
}

/// Collect distinct elements into a `BTreeSet`
pub fn to_sorted_set<T: Ord>() -> ToCollection<BTreeSet<T>> {
    to_collection()
}

impl<T, C> Aggregator<T> for ToCollection<C>
where
    C: Default + Extend<T> + IntoIterator<Item = T>,
{
    type Acc = C;
    type Output = C;

    fn seed(&self) -> C {
        C::default()
    }

    fn fold(&self, acc: &mut C, item: T) -> Result<()> {
        acc.extend(std::iter::once(item));
        Ok(())
    }

    fn merge(&self, mut left: C, right: C) -> Result<C> {
        left.extend(right);
        Ok(left)
    }

    fn finish(&self, acc: C) -> Result<C> {
        Ok(acc)
    }
}
