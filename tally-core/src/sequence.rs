//! Lazy, single-pass sequences and their intermediate stages

use std::any::type_name;
use std::iter::{Filter, FlatMap, Inspect, Map, Skip, Take};

use tracing::debug;

use crate::aggregator::Aggregator;
use crate::collectors::counting;
use crate::error::{Error, Result};

/// Evaluation state of a sequence
enum State<I> {
    /// Source not yet consumed
    Ready(I),

    /// A stage was configured with an invalid argument
    Failed(Error),

    /// A terminal operation already ran
    Consumed,
}

/// An ordered, lazily evaluated view over a source of elements.
///
/// Stages wrap the underlying iterator without pulling any element. Exactly
/// one terminal operation ([`collect`](Sequence::collect) or
/// [`count`](Sequence::count)) drives the whole chain in a single pass; any
/// later terminal call fails with [`Error::IllegalState`]. Configuration
/// errors raised while building the chain, such as a negative
/// [`limit`](Sequence::limit), are held back and reported by the terminal
/// operation.
pub struct Sequence<I> {
    state: State<I>,
}

impl<I: Iterator> Sequence<I> {
    /// Create a sequence over any iterable source
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            state: State::Ready(source.into_iter()),
        }
    }

    /// Whether a terminal operation already consumed this sequence
    pub fn is_consumed(&self) -> bool {
        matches!(self.state, State::Consumed)
    }

    /// Keep only elements for which `predicate` holds
    pub fn filter<P>(self, predicate: P) -> Sequence<Filter<I, P>>
    where
        P: FnMut(&I::Item) -> bool,
    {
        self.stage(|iter| iter.filter(predicate))
    }

    /// Replace each element with `transform(element)`
    pub fn map<B, F>(self, transform: F) -> Sequence<Map<I, F>>
    where
        F: FnMut(I::Item) -> B,
    {
        self.stage(|iter| iter.map(transform))
    }

    /// Replace each element with zero or more elements, keeping expansion order
    pub fn flat_map<U, F>(self, transform: F) -> Sequence<FlatMap<I, U, F>>
    where
        U: IntoIterator,
        F: FnMut(I::Item) -> U,
    {
        self.stage(|iter| iter.flat_map(transform))
    }

    /// Observe each element as it flows past without changing it
    pub fn peek<F>(self, observer: F) -> Sequence<Inspect<I, F>>
    where
        F: FnMut(&I::Item),
    {
        self.stage(|iter| iter.inspect(observer))
    }

    /// Bound the sequence to at most `n` elements from the front
    pub fn limit(self, n: i64) -> Sequence<Take<I>> {
        match usize::try_from(n) {
            Ok(n) => self.stage(|iter| iter.take(n)),
            Err(_) => self.fail(Error::InvalidArgument(format!(
                "limit must be non-negative, got {n}"
            ))),
        }
    }

    /// Drop the first `n` elements
    pub fn skip(self, n: i64) -> Sequence<Skip<I>> {
        match usize::try_from(n) {
            Ok(n) => self.stage(|iter| iter.skip(n)),
            Err(_) => self.fail(Error::InvalidArgument(format!(
                "skip must be non-negative, got {n}"
            ))),
        }
    }

    /// Drive the sequence through `aggregator` and return its result
    pub fn collect<A>(&mut self, aggregator: &A) -> Result<A::Output>
    where
        A: Aggregator<I::Item>,
    {
        let source = self.take_source()?;
        let mut acc = aggregator.seed();
        let mut elements: u64 = 0;

        for item in source {
            aggregator.fold(&mut acc, item)?;
            elements += 1;
        }

        debug!(
            aggregator = type_name::<A>(),
            elements, "sequence collected"
        );

        aggregator.finish(acc)
    }

    /// Count the remaining elements
    pub fn count(&mut self) -> Result<u64> {
        self.collect(&counting())
    }

    /// Hand the source to a terminal operation, leaving the sequence consumed
    pub(crate) fn take_source(&mut self) -> Result<I> {
        match std::mem::replace(&mut self.state, State::Consumed) {
            State::Ready(source) => Ok(source),
            State::Failed(error) => Err(error),
            State::Consumed => Err(Error::IllegalState(
                "sequence has already been consumed".into(),
            )),
        }
    }

    fn stage<J>(self, wrap: impl FnOnce(I) -> J) -> Sequence<J> {
        let state = match self.state {
            State::Ready(source) => State::Ready(wrap(source)),
            State::Failed(error) => State::Failed(error),
            State::Consumed => State::Consumed,
        };

        Sequence { state }
    }

    fn fail<J>(self, error: Error) -> Sequence<J> {
        let state = match self.state {
            State::Ready(_) => State::Failed(error),
            State::Failed(earlier) => State::Failed(earlier),
            State::Consumed => State::Consumed,
        };

        Sequence { state }
    }
}

impl<T> From<Vec<T>> for Sequence<std::vec::IntoIter<T>> {
    fn from(items: Vec<T>) -> Self {
        Sequence::new(items)
    }
}

/// An infinite sequence `seed, next(seed), next(next(seed)), ...`
pub fn iterate<T, F>(seed: T, mut next: F) -> Sequence<impl Iterator<Item = T>>
where
    F: FnMut(&T) -> T,
{
    Sequence::new(std::iter::successors(Some(seed), move |prev| Some(next(prev))))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;
    use crate::collectors::{joining_with, to_list};

    #[test]
    fn stages_apply_in_declared_order() {
        let mut seq = Sequence::new(1..=10)
            .filter(|n| n % 2 == 0)
            .map(|n| n * 10)
            .skip(1)
            .limit(3);

        assert_eq!(seq.collect(&to_list()).unwrap(), vec![40, 60, 80]);
    }

    #[test]
    fn flat_map_preserves_expansion_order() {
        let mut seq = Sequence::from(vec![1usize, 2, 3]).flat_map(|n| vec![n; n]);

        assert_eq!(seq.collect(&to_list()).unwrap(), vec![1, 2, 2, 3, 3, 3]);
    }

    #[test_case(0, vec![] ; "limit zero")]
    #[test_case(2, vec![1, 2] ; "limit two")]
    #[test_case(10, vec![1, 2, 3, 4, 5] ; "limit past end")]
    fn limit_bounds_sequence(n: i64, expected: Vec<i32>) {
        let mut seq = Sequence::new(vec![1, 2, 3, 4, 5]).limit(n);
        assert_eq!(seq.collect(&to_list()).unwrap(), expected);
    }

    #[test_case(0, vec![1, 2, 3] ; "skip zero")]
    #[test_case(2, vec![3] ; "skip two")]
    #[test_case(7, vec![] ; "skip past end")]
    fn skip_drops_front(n: i64, expected: Vec<i32>) {
        let mut seq = Sequence::new(vec![1, 2, 3]).skip(n);
        assert_eq!(seq.collect(&to_list()).unwrap(), expected);
    }

    #[test]
    fn negative_limit_is_reported_by_terminal_step() {
        let mut seq = Sequence::new(vec![1, 2, 3]).limit(-1).map(|n| n + 1);

        let err = seq.count().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn negative_skip_is_invalid() {
        let mut seq = Sequence::new(vec!["a"]).skip(-5);
        assert!(matches!(seq.count(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn first_configuration_error_wins() {
        let mut seq = Sequence::new(0..3).skip(-1).limit(-2);

        match seq.count() {
            Err(Error::InvalidArgument(msg)) => assert!(msg.contains("skip")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn second_terminal_call_is_illegal() {
        let mut seq = Sequence::new(vec![1, 2, 3]);

        assert_eq!(seq.count().unwrap(), 3);
        assert!(seq.is_consumed());
        assert!(matches!(seq.count(), Err(Error::IllegalState(_))));
    }

    #[test]
    fn evaluation_is_lazy() {
        let pulled = Cell::new(0);

        let mut seq = iterate(1u64, |n| n + 1)
            .peek(|_| pulled.set(pulled.get() + 1))
            .limit(3);

        assert_eq!(seq.collect(&to_list()).unwrap(), vec![1, 2, 3]);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn nothing_is_pulled_before_terminal_step() {
        let pulled = Cell::new(0);

        let seq = Sequence::new(vec![1, 2, 3]).peek(|_| pulled.set(pulled.get() + 1));

        assert_eq!(pulled.get(), 0);
        drop(seq);
        assert_eq!(pulled.get(), 0);
    }

    #[test]
    fn iterate_produces_successive_values() {
        let mut squares = iterate(1u32, |n| n + 1)
            .map(|n| (n * n).to_string())
            .limit(5);

        assert_eq!(squares.collect(&joining_with(",")).unwrap(), "1,4,9,16,25");
    }

    proptest! {
        #[test]
        fn identity_stages_preserve_count(items in prop::collection::vec(any::<i32>(), 0..200)) {
            let expected = items.len() as u64;
            let mut seq = Sequence::from(items).map(|n| n.wrapping_mul(3)).peek(|_| {});
            prop_assert_eq!(seq.count().unwrap(), expected);
        }

        #[test]
        fn skip_then_limit_matches_slice(
            items in prop::collection::vec(any::<u8>(), 0..64),
            skip in 0i64..80,
            limit in 0i64..80,
        ) {
            let start = (skip as usize).min(items.len());
            let end = (start + limit as usize).min(items.len());
            let expected = items[start..end].to_vec();

            let mut seq = Sequence::from(items).skip(skip).limit(limit);
            prop_assert_eq!(seq.collect(&to_list()).unwrap(), expected);
        }
    }
}
