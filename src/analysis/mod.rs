//! Analysis modules.
//!
//! Aggregate definitions, the key extractors they use, the registry that
//! names them, and the engine that runs them over record lists.

pub mod aggregator;
pub mod definition;
pub mod extractors;
pub mod registry;

pub use aggregator::{aggregate, aggregate_with_stats, Aggregation};
pub use definition::{define_aggregate, AggregateDefinition, KeyFn, Mode};
pub use registry::{AggregateCollection, AggregateInfo, Registry};
