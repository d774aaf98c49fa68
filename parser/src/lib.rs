//! mockd Parser
//!
//! This crate provides parsing for query option text:
//! - Transformation pipelines (`$apply`): filter, ancestors, descendants,
//!   orderby, skip, top and qualified function calls
//! - Filter expressions (`$filter` and embedded `filter(...)`)
//! - Resource paths with key predicates
//! - Error handling with location information

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::*;
pub use parser::{parse_apply, parse_filter, parse_orderby, parse_resource_path, Parser};
