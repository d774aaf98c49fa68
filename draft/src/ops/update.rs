//! Patching draft and active versions.

use mockd_core::{EntityKey, Record};
use mockd_registry::EntitySetDef;

use crate::error::{DraftError, DraftResult};
use crate::store::{stamp_active, stamp_draft, strip_draft_properties};
use crate::DraftStore;

/// Merge `patch` into the draft version of `key`.
pub fn update_draft(
    store: &mut DraftStore,
    set: &str,
    key: &EntityKey,
    patch: &Record,
) -> DraftResult<Record> {
    let registry = store.registry.clone();
    let def = registry
        .entity_set(set)
        .ok_or_else(|| DraftError::unknown_entity_set(set))?;
    let patch = prepare_patch(def, key, patch)?;

    let table = store.table_mut(set)?;
    let draft = table
        .draft_mut(key)
        .ok_or_else(|| DraftError::not_found(set, key))?;
    draft.record.merge(&patch);
    tracing::debug!(entity_set = set, key = %key, properties = patch.len(), "updated draft");

    let draft = table.draft(key).ok_or_else(|| DraftError::not_found(set, key))?;
    Ok(stamp_draft(def, table, key, draft))
}

/// Merge `patch` into the active version of `key`.
pub fn update_active(
    store: &mut DraftStore,
    set: &str,
    key: &EntityKey,
    patch: &Record,
) -> DraftResult<Record> {
    let registry = store.registry.clone();
    let def = registry
        .entity_set(set)
        .ok_or_else(|| DraftError::unknown_entity_set(set))?;
    let patch = prepare_patch(def, key, patch)?;

    let table = store.table_mut(set)?;
    let active = table
        .active_mut(key)
        .ok_or_else(|| DraftError::not_found(set, key))?;
    active.merge(&patch);
    tracing::debug!(entity_set = set, key = %key, properties = patch.len(), "updated active entity");

    let active = table.active(key).ok_or_else(|| DraftError::not_found(set, key))?;
    Ok(stamp_active(def, table, key, active))
}

/// Drop computed draft properties and reject key changes.
fn prepare_patch(def: &EntitySetDef, key: &EntityKey, patch: &Record) -> DraftResult<Record> {
    for property in &def.key_properties {
        let Some(value) = patch.get(property) else {
            continue;
        };
        let unchanged = key
            .get(property)
            .is_some_and(|current| &current.to_value() == value);
        if !unchanged {
            return Err(DraftError::key_change(&def.name, property));
        }
    }
    Ok(strip_draft_properties(patch.clone()))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{key, test_store};
    use crate::DraftError;
    use mockd_core::{props, Value};

    #[test]
    fn test_update_draft_leaves_active_untouched() {
        // GIVEN
        let mut store = test_store();
        store.create_draft("SalesOrganizations", &key("US"), "alice").unwrap();

        // WHEN
        let draft = store
            .update_draft("SalesOrganizations", &key("US"), &props! { "Name" => "United States" })
            .unwrap();

        // THEN
        assert_eq!(draft.get("Name"), Some(&Value::from("United States")));
        let active = store.resolve_version("SalesOrganizations", &key("US"), true).unwrap();
        assert_eq!(active.get("Name"), Some(&Value::from("US")));
    }

    #[test]
    fn test_update_ignores_computed_flags() {
        let mut store = test_store();
        store.create_draft("SalesOrganizations", &key("US"), "alice").unwrap();
        let draft = store
            .update_draft("SalesOrganizations", &key("US"), &props! { "IsActiveEntity" => true, "ID" => "US" })
            .unwrap();
        assert_eq!(draft.is_active(), Some(false));
    }

    #[test]
    fn test_update_rejects_key_change() {
        let mut store = test_store();
        let result = store.update_active("SalesOrganizations", &key("US"), &props! { "ID" => "USA" });
        assert!(matches!(result, Err(DraftError::KeyChange { .. })));
    }

    #[test]
    fn test_update_draft_requires_draft() {
        let mut store = test_store();
        let result = store.update_draft("SalesOrganizations", &key("US"), &props! { "Name" => "x" });
        assert!(matches!(result, Err(DraftError::NotFound { .. })));
    }

    #[test]
    fn test_update_active() {
        let mut store = test_store();
        let record = store
            .update_active("SalesOrganizations", &key("US"), &props! { "Name" => "Renamed" })
            .unwrap();
        assert_eq!(record.get("Name"), Some(&Value::from("Renamed")));
        assert_eq!(record.is_active(), Some(true));
    }
}
