//! Activating drafts.

use mockd_core::{EntityKey, Record};

use crate::containment::{contained_descendants, Side};
use crate::error::{DraftError, DraftResult};
use crate::store::stamp_active;
use crate::DraftStore;

/// Replace the active versions of `key` and its contained children with
/// their drafts, then drop the drafts.
///
/// Active children without a draft are left alone.
pub fn merge_draft(store: &mut DraftStore, set: &str, key: &EntityKey) -> DraftResult<Record> {
    let registry = store.registry.clone();
    let def = registry
        .entity_set(set)
        .ok_or_else(|| DraftError::unknown_entity_set(set))?;

    let table = store.table(set)?;
    let draft = table
        .draft(key)
        .ok_or_else(|| DraftError::not_found(set, key))?;
    let mut merged = vec![(set.to_string(), key.clone())];
    merged.extend(contained_descendants(store, def, &draft.record, Side::Draft));

    for (merge_set, merge_key) in &merged {
        let table = store.table_mut(merge_set)?;
        if let Some(draft) = table.take_draft(merge_key) {
            table.put_active(merge_key.clone(), draft.record);
        }
    }
    tracing::info!(entity_set = set, key = %key, contained = merged.len() - 1, "activated draft");

    let table = store.table(set)?;
    let active = table.active(key).ok_or_else(|| DraftError::not_found(set, key))?;
    Ok(stamp_active(def, table, key, active))
}
