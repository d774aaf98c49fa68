//! mockd Hierarchy
//!
//! Parent/child structure over a flat record set, and the traversals run on
//! it: ancestor and descendant closures, and the depth-limited TopLevels
//! expansion that annotates every visited node with `DistanceFromRoot`,
//! `DrillState` and `LimitedDescendantCount`.
//!
//! # Module Structure
//!
//! - `index` - HierarchyIndex: node ids, parent links, ordered children
//! - `traverse` - ancestors/descendants closures
//! - `top_levels` - Partial expansion with per-node overrides
//! - `error` - Error types for hierarchy failures

mod error;
mod index;
mod top_levels;
mod traverse;

pub use error::{HierarchyError, HierarchyResult};
pub use index::HierarchyIndex;
pub use top_levels::{top_levels, top_levels_within, DrillState, ExpandLevel, HierarchyRow, TopLevelsParams};
pub use traverse::{ancestors, descendants};
