//! Draft lifecycle operation implementations.
//!
//! Each operation validates against the current store state first and only
//! then applies its changes, so a failed operation leaves no trace.

mod activate;
mod create;
mod delete;
mod discard;
mod edit;
mod update;

pub use activate::merge_draft;
pub use create::{create_new_draft, insert_active};
pub use delete::delete_active;
pub use discard::delete_draft;
pub use edit::create_draft;
pub use update::{update_active, update_draft};
