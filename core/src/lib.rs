//! mockd Core Types
//!
//! This crate provides the foundational types used throughout mockd:
//! - Value types (the Value enum with scalar, date and structured values)
//! - Business keys (KeyValue, EntityKey)
//! - Records and draft administrative data
//! - Well-known property names shared by the store and the hierarchy engine

mod error;
mod key;
pub mod names;
mod record;
mod temporal;
mod value;

pub use error::*;
pub use key::*;
pub use record::*;
pub use temporal::{format_date, format_date_time, parse_date, parse_date_time};
pub use value::*;
