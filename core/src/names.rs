//! Well-known property names.
//!
//! These names are part of the externally visible protocol contract and must
//! be reproduced exactly.

/// Flag distinguishing the active version (true) from the draft version (false).
pub const IS_ACTIVE_ENTITY: &str = "IsActiveEntity";

/// Set on a draft when an active counterpart exists.
pub const HAS_ACTIVE_ENTITY: &str = "HasActiveEntity";

/// Set on an active record while a draft of it exists.
pub const HAS_DRAFT_ENTITY: &str = "HasDraftEntity";

/// Nested administrative data carried by draft records.
pub const DRAFT_ADMINISTRATIVE_DATA: &str = "DraftAdministrativeData";

pub const DRAFT_UUID: &str = "DraftUUID";
pub const IN_PROCESS_BY_USER: &str = "InProcessByUser";
pub const CREATED_BY_USER: &str = "CreatedByUser";
pub const DRAFT_IS_CREATED_BY_ME: &str = "DraftIsCreatedByMe";

/// Distance of a hierarchy node from its traversal root.
pub const DISTANCE_FROM_ROOT: &str = "DistanceFromRoot";

/// Expansion state of a hierarchy node.
pub const DRILL_STATE: &str = "DrillState";

/// Number of descendants materialized in the current result.
pub const LIMITED_DESCENDANT_COUNT: &str = "LimitedDescendantCount";

/// Draft bookkeeping properties stamped on every record of a draft-enabled set.
pub const DRAFT_FLAGS: [&str; 3] = [IS_ACTIVE_ENTITY, HAS_ACTIVE_ENTITY, HAS_DRAFT_ENTITY];

/// Hierarchy annotations computed per traversal.
pub const HIERARCHY_ANNOTATIONS: [&str; 3] =
    [DISTANCE_FROM_ROOT, DRILL_STATE, LIMITED_DESCENDANT_COUNT];
