//! mockd Query
//!
//! Read-side evaluation: transformation pipelines and system query options.
//!
//! Responsibilities:
//! - Run `$apply` steps in order (filter, ancestors, descendants, orderby,
//!   skip, top and the TopLevels hierarchy function)
//! - Resolve resource paths through a record source
//! - Apply `$filter`, `$orderby`, `$count`, `$skip`, `$top` and `$select`

mod error;
mod executor;
mod operators;
mod options;
mod plan;
mod source;

#[cfg(test)]
mod test_support;

pub use error::{QueryError, QueryResult};
pub use executor::PipelineEvaluator;
pub use operators::{filter_rows, order_rows, select_rows, skip_rows, top_rows};
pub use options::{QueryOptions, QueryPage};
pub use plan::{HierarchyFunction, TopLevelsCall};
pub use source::{entity_address, entity_key, target_entity_set, EntityAddress, RecordSource};
