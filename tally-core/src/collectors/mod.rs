//! Library of composable aggregators
//!
//! Every aggregator here is a value: it can be stored, reused across
//! evaluations and nested as the downstream of another aggregator. Grouping
//! and partitioning delegate each bucket to a downstream aggregator, the
//! wrappers in [`compose`] adjust elements or results around one, and
//! [`teeing`] runs two over the same elements.

mod basic;
pub mod compose;
mod joining;
pub mod keyed;
pub mod stats;

pub use basic::{
    averaging, counting, first, folding, max_by, max_by_key, min_by, min_by_key, reducing,
    reducing_with, summing, to_collection, to_list, to_set, to_sorted_set, Averaging, Counting,
    Extreme, First, Folding, Mean, Reducing, ReducingWith, Summing, ToCollection,
};
pub use compose::{
    collecting_and_then, filtering, flat_mapping, mapping, teeing, CollectingAndThen, Filtering,
    FlatMapping, Mapping, Teeing,
};
pub use joining::{joining, joining_with, Joining};
pub use keyed::{
    grouping_by, grouping_by_with, partitioning_by, partitioning_by_with, to_map, to_map_merging,
    GroupingBy, Hashed, MapFamily, MergePolicy, MergeWith, Partitioned, PartitioningBy,
    RejectDuplicates, Sorted, ToMap,
};
pub use stats::{summarizing, Numeric, Statistics, Summarizing};
