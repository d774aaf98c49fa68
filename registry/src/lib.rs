//! mockd Registry
//!
//! Runtime schema lookup. Single source of truth for entity sets, their
//! keys, typed properties, recursive hierarchies and navigation properties.
//! The registry is immutable after construction via RegistryBuilder.

mod builder;
mod registry;
mod types;

pub use builder::{EntitySetBuilder, RegistryBuilder, RegistryError};
pub use registry::{Registry, HIERARCHY_VOCABULARY};
pub use types::*;
