//! Chunked parallel evaluation of sequences

use std::any::type_name;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::aggregator::Aggregator;
use crate::error::{Error, Result};
use crate::sequence::Sequence;

/// Configuration for parallel evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Smallest number of elements handed to one partial accumulator
    pub min_chunk_size: usize,

    /// Chunks scheduled per worker thread
    pub chunks_per_thread: usize,

    /// Number of worker threads
    pub worker_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: 1024,
            chunks_per_thread: 4,
            worker_threads: num_cpus::get(),
        }
    }
}

impl ParallelConfig {
    /// Configuration with an explicit thread count and default chunking
    pub fn with_threads(worker_threads: usize) -> Self {
        Self {
            worker_threads,
            ..Self::default()
        }
    }

    /// Reject zero-sized settings
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(Error::InvalidArgument("worker_threads must be positive".into()));
        }
        if self.chunks_per_thread == 0 {
            return Err(Error::InvalidArgument("chunks_per_thread must be positive".into()));
        }
        if self.min_chunk_size == 0 {
            return Err(Error::InvalidArgument("min_chunk_size must be positive".into()));
        }
        Ok(())
    }

    /// Number of elements per chunk for an input of `len` elements
    pub fn chunk_size(&self, len: usize) -> usize {
        let target_chunks = (self.worker_threads * self.chunks_per_thread).max(1);
        len.div_ceil(target_chunks).max(self.min_chunk_size).max(1)
    }

    /// Start a dedicated pool with `worker_threads` threads
    pub fn build_pool(&self) -> Result<ThreadPool> {
        ThreadPoolBuilder::new()
            .num_threads(self.worker_threads)
            .thread_name(|index| format!("tally-worker-{index}"))
            .build()
            .map_err(|e| Error::IllegalState(format!("failed to start worker pool: {e}")))
    }
}

impl<I> Sequence<I>
where
    I: Iterator,
    I::Item: Send,
{
    /// Drive the sequence through `aggregator` on a worker pool.
    ///
    /// The source is materialized and split into contiguous chunks. Each
    /// chunk is folded into its own accumulator and the partial accumulators
    /// are merged left to right, so the result equals that of
    /// [`collect`](Sequence::collect). Aggregators that are not
    /// [parallelizable](Aggregator::parallelizable) are evaluated
    /// sequentially on the calling thread.
    pub fn par_collect<A>(&mut self, aggregator: &A, config: &ParallelConfig) -> Result<A::Output>
    where
        A: Aggregator<I::Item> + Sync,
        A::Acc: Send,
    {
        if !aggregator.parallelizable() {
            debug!(
                aggregator = type_name::<A>(),
                "aggregator is order dependent, collecting sequentially"
            );
            return self.collect(aggregator);
        }

        config.validate()?;
        let items: Vec<I::Item> = self.take_source()?.collect();
        let elements = items.len();
        let chunk_size = config.chunk_size(elements);
        let pool = config.build_pool()?;

        let merged = pool.install(|| {
            items
                .into_par_iter()
                .chunks(chunk_size)
                .map(|chunk| -> Result<A::Acc> {
                    let mut acc = aggregator.seed();
                    for item in chunk {
                        aggregator.fold(&mut acc, item)?;
                    }
                    Ok(acc)
                })
                .try_reduce_with(|left, right| aggregator.merge(left, right))
        });

        debug!(
            aggregator = type_name::<A>(),
            elements,
            chunk_size,
            threads = config.worker_threads,
            "sequence collected in parallel"
        );

        let acc = match merged {
            Some(acc) => acc?,
            None => aggregator.seed(),
        };
        aggregator.finish(acc)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;
    use crate::collectors::{
        counting, first, folding, grouping_by, joining_with, mapping, partitioning_by, summing,
        to_list,
    };

    fn small_chunks(threads: usize) -> ParallelConfig {
        ParallelConfig {
            min_chunk_size: 1,
            chunks_per_thread: 2,
            worker_threads: threads,
        }
    }

    #[test_case(0, 1024 ; "empty input uses minimum")]
    #[test_case(10, 1024 ; "small input uses minimum")]
    #[test_case(1_000_000, 31_250 ; "large input divided across chunks")]
    fn chunk_sizes(len: usize, expected: usize) {
        let config = ParallelConfig {
            min_chunk_size: 1024,
            chunks_per_thread: 4,
            worker_threads: 8,
        };
        assert_eq!(config.chunk_size(len), expected);
    }

    #[test]
    fn zero_threads_rejected() {
        let mut seq = Sequence::new(vec![1, 2, 3]);
        let err = seq.par_collect(&counting(), &small_chunks(0)).unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(!seq.is_consumed());
    }

    #[test]
    fn ordered_results_survive_merge() {
        let mut seq = Sequence::new(0..1000u32).map(|n| n * 2);
        let list = seq.par_collect(&to_list(), &small_chunks(4)).unwrap();

        assert_eq!(list, (0..1000u32).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn joining_matches_sequential() {
        let joiner = mapping(|n: u32| n.to_string(), joining_with(","));

        let parallel = Sequence::new(1..=200u32)
            .par_collect(&joiner, &small_chunks(3))
            .unwrap();
        let sequential = Sequence::new(1..=200u32).collect(&joiner).unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn order_dependent_aggregators_fall_back() {
        let config = small_chunks(4);

        let head = Sequence::new(10..20).par_collect(&first(), &config).unwrap();
        assert_eq!(head, Some(10));

        let digits = folding(String::new(), |mut acc: String, n: u8| {
            acc.push(char::from(b'0' + n));
            acc
        });
        let text = Sequence::new(0..10u8).par_collect(&digits, &config).unwrap();
        assert_eq!(text, "0123456789");
    }

    #[test]
    fn empty_source_finishes_seed() {
        let mut seq = Sequence::new(Vec::<i32>::new());
        let sum = seq.par_collect(&summing(|n: &i32| *n), &small_chunks(2)).unwrap();
        assert_eq!(sum, 0);
    }

    #[test]
    fn second_parallel_collect_is_illegal() {
        let mut seq = Sequence::new(vec![1, 2, 3]);
        seq.par_collect(&counting(), &small_chunks(2)).unwrap();

        let err = seq.par_collect(&counting(), &small_chunks(2)).unwrap_err();
        assert!(matches!(err, Error::IllegalState(_)));
    }

    proptest! {
        #[test]
        fn parallel_equals_sequential(
            items in prop::collection::vec(any::<i32>(), 0..500),
            threads in 1usize..5,
        ) {
            let config = small_chunks(threads);
            let groups = grouping_by(|n: &i32| n.rem_euclid(7)).sorted();
            let parts = partitioning_by(|n: &i32| *n >= 0);

            let parallel = Sequence::new(items.clone()).par_collect(&groups, &config).unwrap();
            let sequential = Sequence::new(items.clone()).collect(&groups).unwrap();
            prop_assert_eq!(parallel, sequential);

            let parallel = Sequence::new(items.clone()).par_collect(&parts, &config).unwrap();
            let sequential = Sequence::new(items).collect(&parts).unwrap();
            prop_assert_eq!(parallel, sequential);
        }
    }
}
