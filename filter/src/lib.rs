//! mockd Filter
//!
//! Boolean filter expressions over records.
//!
//! Responsibilities:
//! - Filter expression AST shared by `$filter` and `filter(...)` steps
//! - Compile an expression against an entity set (property resolution,
//!   literal coercion, regex compilation)
//! - Evaluate compiled filters against records with OData null semantics

mod ast;
mod compile;
mod error;
mod eval;

pub use ast::{FilterExpr, FilterOp, Predicate};
pub use compile::CompiledFilter;
pub use error::{FilterError, FilterResult};
pub use eval::evaluate;
