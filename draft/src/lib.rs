//! mockd Draft
//!
//! In-memory record store with a draft overlay.
//!
//! One logical entity (identified by its business key) may exist as an
//! active version, a draft version, or both. A draft supersedes the active
//! version for reads until it is discarded or merged back.
//!
//! # Module Structure
//!
//! - `store` - DraftStore: tables, visibility resolution, record stamping
//! - `table` - EntityTable holding the active and draft maps of one set
//! - `ops/` - Draft lifecycle operations (edit, create, update, discard, activate, delete)
//! - `containment` - Traversal of contained (composition) children
//! - `error` - Error types for store failures

mod containment;
mod error;
mod ops;
mod store;
mod table;

#[cfg(test)]
mod test_support;

pub use error::{DraftError, DraftResult};
pub use store::DraftStore;
pub use table::{prefer_visible, DraftRecord, EntityTable};
