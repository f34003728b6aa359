//! Keyed aggregators: grouping, partitioning and map building

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::Index;

use crate::aggregator::Aggregator;
use crate::collectors::basic::{to_list, ToCollection};
use crate::error::{Error, Result};

/// A family of map containers keyed by `K`.
///
/// Keyed aggregators are generic over the family so callers choose the
/// result container, hashed or ordered, without changing the aggregator.
pub trait MapFamily<K> {
    /// The map type holding values of type `V`
    type Map<V>: IntoIterator<Item = (K, V)> + FromIterator<(K, V)>;

    /// Create an empty map
    fn empty<V>() -> Self::Map<V>;

    /// Value stored under `key`, inserted with `init` when absent
    fn bucket<V>(map: &mut Self::Map<V>, key: K, init: impl FnOnce() -> V) -> &mut V;

    /// Remove and return the value stored under `key`
    fn remove<V>(map: &mut Self::Map<V>, key: &K) -> Option<V>;

    /// Store `value` under `key`
    fn insert<V>(map: &mut Self::Map<V>, key: K, value: V);
}

/// Keyed results in a `HashMap`
#[derive(Debug, Clone, Copy, Default)]
pub struct Hashed;

/// Keyed results in a `BTreeMap`, iterated in key order
#[derive(Debug, Clone, Copy, Default)]
pub struct Sorted;

impl<K: Eq + Hash> MapFamily<K> for Hashed {
    type Map<V> = HashMap<K, V>;

    fn empty<V>() -> HashMap<K, V> {
        HashMap::new()
    }

    fn bucket<V>(map: &mut HashMap<K, V>, key: K, init: impl FnOnce() -> V) -> &mut V {
        map.entry(key).or_insert_with(init)
    }

    fn remove<V>(map: &mut HashMap<K, V>, key: &K) -> Option<V> {
        map.remove(key)
    }

    fn insert<V>(map: &mut HashMap<K, V>, key: K, value: V) {
        map.insert(key, value);
    }
}

impl<K: Ord> MapFamily<K> for Sorted {
    type Map<V> = BTreeMap<K, V>;

    fn empty<V>() -> BTreeMap<K, V> {
        BTreeMap::new()
    }

    fn bucket<V>(map: &mut BTreeMap<K, V>, key: K, init: impl FnOnce() -> V) -> &mut V {
        map.entry(key).or_insert_with(init)
    }

    fn remove<V>(map: &mut BTreeMap<K, V>, key: &K) -> Option<V> {
        map.remove(key)
    }

    fn insert<V>(map: &mut BTreeMap<K, V>, key: K, value: V) {
        map.insert(key, value);
    }
}

// Merge `right` into `left` bucket by bucket, resolving shared keys with `combine`.
fn merge_maps<K, V, M, C>(
    mut left: M::Map<V>,
    right: M::Map<V>,
    mut combine: C,
) -> Result<M::Map<V>>
where
    M: MapFamily<K>,
    C: FnMut(&K, V, V) -> Result<V>,
{
    for (key, value) in right {
        let merged = match M::remove(&mut left, &key) {
            Some(existing) => combine(&key, existing, value)?,
            None => value,
        };
        M::insert(&mut left, key, merged);
    }

    Ok(left)
}

/// Groups elements into buckets by a classifier key
pub struct GroupingBy<F, A, M = Hashed> {
    classifier: F,
    downstream: A,
    _family: PhantomData<M>,
}

/// Group elements into lists keyed by `classifier(element)`.
///
/// Elements sharing a key land in the same bucket in encounter order.
pub fn grouping_by<T, K, F>(classifier: F) -> GroupingBy<F, ToCollection<Vec<T>>>
where
    F: Fn(&T) -> K,
{
    grouping_by_with(classifier, to_list())
}

/// Group elements by `classifier(element)` and aggregate each bucket with `downstream`
pub fn grouping_by_with<T, K, F, A>(classifier: F, downstream: A) -> GroupingBy<F, A>
where
    F: Fn(&T) -> K,
{
    GroupingBy {
        classifier,
        downstream,
        _family: PhantomData,
    }
}

impl<F, A, M> GroupingBy<F, A, M> {
    /// Produce the buckets in a `BTreeMap` ordered by key
    pub fn sorted(self) -> GroupingBy<F, A, Sorted> {
        GroupingBy {
            classifier: self.classifier,
            downstream: self.downstream,
            _family: PhantomData,
        }
    }
}

impl<F: Clone, A: Clone, M> Clone for GroupingBy<F, A, M> {
    fn clone(&self) -> Self {
        Self {
            classifier: self.classifier.clone(),
            downstream: self.downstream.clone(),
            _family: PhantomData,
        }
    }
}

impl<T, K, F, A, M> Aggregator<T> for GroupingBy<F, A, M>
where
    F: Fn(&T) -> K,
    A: Aggregator<T>,
    M: MapFamily<K>,
{
    type Acc = M::Map<A::Acc>;
    type Output = M::Map<A::Output>;

    fn seed(&self) -> Self::Acc {
        M::empty()
    }

    fn fold(&self, acc: &mut Self::Acc, item: T) -> Result<()> {
        let key = (self.classifier)(&item);
        let bucket = M::bucket(acc, key, || self.downstream.seed());
        self.downstream.fold(bucket, item)
    }

    fn merge(&self, left: Self::Acc, right: Self::Acc) -> Result<Self::Acc> {
        merge_maps::<K, A::Acc, M, _>(left, right, |_, l, r| self.downstream.merge(l, r))
    }

    fn finish(&self, acc: Self::Acc) -> Result<Self::Output> {
        acc.into_iter()
            .map(|(key, bucket)| Ok((key, self.downstream.finish(bucket)?)))
            .collect()
    }

    fn parallelizable(&self) -> bool {
        self.downstream.parallelizable()
    }
}

/// The two buckets produced by a partitioning aggregator.
///
/// Both buckets are always present, even when one of them received nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Partitioned<O> {
    /// Result for elements matching the predicate
    pub matched: O,

    /// Result for elements not matching the predicate
    pub unmatched: O,
}

impl<O> Partitioned<O> {
    /// Bucket for the given predicate outcome
    pub fn get(&self, key: bool) -> &O {
        if key {
            &self.matched
        } else {
            &self.unmatched
        }
    }

    /// Convert into a map with exactly the keys `true` and `false`
    pub fn into_map(self) -> BTreeMap<bool, O> {
        BTreeMap::from([(false, self.unmatched), (true, self.matched)])
    }
}

impl<O> Index<bool> for Partitioned<O> {
    type Output = O;

    fn index(&self, key: bool) -> &O {
        self.get(key)
    }
}

impl<O> From<Partitioned<O>> for BTreeMap<bool, O> {
    fn from(partitioned: Partitioned<O>) -> Self {
        partitioned.into_map()
    }
}

/// Splits elements into two buckets by a predicate
#[derive(Debug, Clone, Copy)]
pub struct PartitioningBy<P, A> {
    predicate: P,
    downstream: A,
}

/// Split elements into lists by `predicate(element)`
pub fn partitioning_by<T, P>(predicate: P) -> PartitioningBy<P, ToCollection<Vec<T>>>
where
    P: Fn(&T) -> bool,
{
    partitioning_by_with(predicate, to_list())
}

/// Split elements by `predicate(element)` and aggregate each bucket with `downstream`
pub fn partitioning_by_with<T, P, A>(predicate: P, downstream: A) -> PartitioningBy<P, A>
where
    P: Fn(&T) -> bool,
{
    PartitioningBy {
        predicate,
        downstream,
    }
}

impl<T, P, A> Aggregator<T> for PartitioningBy<P, A>
where
    P: Fn(&T) -> bool,
    A: Aggregator<T>,
{
    type Acc = Partitioned<A::Acc>;
    type Output = Partitioned<A::Output>;

    fn seed(&self) -> Self::Acc {
        Partitioned {
            matched: self.downstream.seed(),
            unmatched: self.downstream.seed(),
        }
    }

    fn fold(&self, acc: &mut Self::Acc, item: T) -> Result<()> {
        if (self.predicate)(&item) {
            self.downstream.fold(&mut acc.matched, item)
        } else {
            self.downstream.fold(&mut acc.unmatched, item)
        }
    }

    fn merge(&self, left: Self::Acc, right: Self::Acc) -> Result<Self::Acc> {
        Ok(Partitioned {
            matched: self.downstream.merge(left.matched, right.matched)?,
            unmatched: self.downstream.merge(left.unmatched, right.unmatched)?,
        })
    }

    fn finish(&self, acc: Self::Acc) -> Result<Self::Output> {
        Ok(Partitioned {
            matched: self.downstream.finish(acc.matched)?,
            unmatched: self.downstream.finish(acc.unmatched)?,
        })
    }

    fn parallelizable(&self) -> bool {
        self.downstream.parallelizable()
    }
}

/// How a map-building aggregator resolves two values for one key
pub trait MergePolicy<K, V> {
    /// Combine the value already stored under `key` with an incoming one
    fn resolve(&self, key: &K, existing: V, incoming: V) -> Result<V>;
}

/// Fail with [`Error::DuplicateKey`] on any key collision
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectDuplicates;

impl<K: Debug, V> MergePolicy<K, V> for RejectDuplicates {
    fn resolve(&self, key: &K, _existing: V, _incoming: V) -> Result<V> {
        Err(Error::DuplicateKey(format!("{key:?}")))
    }
}

/// Resolve key collisions with a binary function, existing value first
#[derive(Debug, Clone, Copy)]
pub struct MergeWith<F>(F);

impl<K, V, F> MergePolicy<K, V> for MergeWith<F>
where
    F: Fn(V, V) -> V,
{
    fn resolve(&self, _key: &K, existing: V, incoming: V) -> Result<V> {
        Ok((self.0)(existing, incoming))
    }
}

/// Builds a map from key and value projections of each element
pub struct ToMap<KF, VF, R = RejectDuplicates, M = Hashed> {
    key: KF,
    value: VF,
    policy: R,
    _family: PhantomData<M>,
}

/// Map `key(element)` to `value(element)`; a repeated key fails with
/// [`Error::DuplicateKey`]
pub fn to_map<T, K, V, KF, VF>(key: KF, value: VF) -> ToMap<KF, VF>
where
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> V,
{
    ToMap {
        key,
        value,
        policy: RejectDuplicates,
        _family: PhantomData,
    }
}

/// Map `key(element)` to `value(element)`, combining values of a repeated
/// key with `merge(existing, incoming)`
pub fn to_map_merging<T, K, V, KF, VF, F>(
    key: KF,
    value: VF,
    merge: F,
) -> ToMap<KF, VF, MergeWith<F>>
where
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> V,
    F: Fn(V, V) -> V,
{
    ToMap {
        key,
        value,
        policy: MergeWith(merge),
        _family: PhantomData,
    }
}

impl<KF, VF, R, M> ToMap<KF, VF, R, M> {
    /// Produce a `BTreeMap` ordered by key
    pub fn sorted(self) -> ToMap<KF, VF, R, Sorted> {
        ToMap {
            key: self.key,
            value: self.value,
            policy: self.policy,
            _family: PhantomData,
        }
    }
}

impl<T, K, V, KF, VF, R, M> Aggregator<T> for ToMap<KF, VF, R, M>
where
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> V,
    R: MergePolicy<K, V>,
    M: MapFamily<K>,
{
    type Acc = M::Map<V>;
    type Output = M::Map<V>;

    fn seed(&self) -> Self::Acc {
        M::empty()
    }

    fn fold(&self, acc: &mut Self::Acc, item: T) -> Result<()> {
        let key = (self.key)(&item);
        let value = (self.value)(&item);

        let value = match M::remove(acc, &key) {
            Some(existing) => self.policy.resolve(&key, existing, value)?,
            None => value,
        };
        M::insert(acc, key, value);
        Ok(())
    }

    fn merge(&self, left: Self::Acc, right: Self::Acc) -> Result<Self::Acc> {
        merge_maps::<K, V, M, _>(left, right, |key, l, r| self.policy.resolve(key, l, r))
    }

    fn finish(&self, acc: Self::Acc) -> Result<Self::Output> {
        Ok(acc)
    }
}
