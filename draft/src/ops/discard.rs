//! Discarding drafts.

use mockd_core::{EntityKey, Record};

use crate::containment::{contained_descendants, Side};
use crate::error::{DraftError, DraftResult};
use crate::store::stamp_active;
use crate::DraftStore;

/// Remove the draft of `key` and the drafts of its contained children.
///
/// Returns the active record that remains visible, if the entity has one.
pub fn delete_draft(store: &mut DraftStore, set: &str, key: &EntityKey) -> DraftResult<Option<Record>> {
    let registry = store.registry.clone();
    let def = registry
        .entity_set(set)
        .ok_or_else(|| DraftError::unknown_entity_set(set))?;

    let table = store.table(set)?;
    let draft = table
        .draft(key)
        .ok_or_else(|| DraftError::not_found(set, key))?;
    let children = contained_descendants(store, def, &draft.record, Side::Draft);

    for (child_set, child_key) in &children {
        store.table_mut(child_set)?.take_draft(child_key);
    }
    store.table_mut(set)?.take_draft(key);
    tracing::info!(entity_set = set, key = %key, contained = children.len(), "discarded draft");

    let table = store.table(set)?;
    Ok(table.active(key).map(|active| stamp_active(def, table, key, active)))
}
