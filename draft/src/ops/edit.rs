//! Creating an edit draft of an active entity.

use mockd_core::{DraftAdministrativeData, EntityKey, Record};
use uuid::Uuid;

use crate::containment::{contained_descendants, Side};
use crate::error::{DraftError, DraftResult};
use crate::store::stamp_draft;
use crate::{DraftRecord, DraftStore};

/// Copy the active record (and, if enabled, its contained children) into
/// drafts owned by `principal`.
pub fn create_draft(
    store: &mut DraftStore,
    set: &str,
    key: &EntityKey,
    principal: &str,
) -> DraftResult<Record> {
    let registry = store.registry.clone();
    let def = registry
        .entity_set(set)
        .ok_or_else(|| DraftError::unknown_entity_set(set))?;
    if !def.draft_enabled {
        return Err(DraftError::not_draft_enabled(set));
    }

    let table = store.table(set)?;
    let active = table
        .active(key)
        .ok_or_else(|| DraftError::not_found(set, key))?;
    if table.has_draft(key) {
        return Err(DraftError::conflict(set, key, "a draft already exists"));
    }

    let mut copies = vec![(set.to_string(), key.clone(), active.clone())];
    if store.copy_contained {
        for (child_set, child_key) in contained_descendants(store, def, active, Side::Active) {
            let child_table = store.table(&child_set)?;
            if child_table.has_draft(&child_key) {
                tracing::debug!(entity_set = %child_set, key = %child_key, "contained draft already exists");
                continue;
            }
            if let Some(child) = child_table.active(&child_key) {
                copies.push((child_set, child_key, child.clone()));
            }
        }
    }

    let draft_uuid = Uuid::new_v4().to_string();
    let copied = copies.len() - 1;
    for (copy_set, copy_key, record) in copies {
        let admin = DraftAdministrativeData::new(draft_uuid.clone(), principal);
        store
            .table_mut(&copy_set)?
            .put_draft(copy_key, DraftRecord { record, admin });
    }
    tracing::info!(entity_set = set, key = %key, principal, contained = copied, "created edit draft");

    let table = store.table(set)?;
    let draft = table.draft(key).ok_or_else(|| DraftError::not_found(set, key))?;
    Ok(stamp_draft(def, table, key, draft))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{key, test_store};
    use crate::DraftError;
    use mockd_core::{names, props, Value};

    #[test]
    fn test_create_draft_then_resolve_returns_draft() {
        // GIVEN
        let mut store = test_store();

        // WHEN
        let draft = store.create_draft("SalesOrganizations", &key("US"), "alice").unwrap();

        // THEN
        assert_eq!(draft.is_active(), Some(false));
        assert_eq!(draft.get(names::HAS_ACTIVE_ENTITY), Some(&Value::Bool(true)));
        let visible = store.resolve("SalesOrganizations", &key("US")).unwrap();
        assert_eq!(visible, draft);
        let active = store.resolve_version("SalesOrganizations", &key("US"), true).unwrap();
        assert_eq!(active.get(names::HAS_DRAFT_ENTITY), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_create_draft_copies_contained_children() {
        // GIVEN
        let mut store = test_store();

        // WHEN
        store.create_draft("SalesOrganizations", &key("US"), "alice").unwrap();

        // THEN
        let products = store.table("Products").unwrap();
        assert!(products.has_draft(&key("9")));
        assert!(products.has_draft(&key("91")));
        assert!(!products.has_draft(&key("10")));
        let parent_uuid = &store.table("SalesOrganizations").unwrap().draft(&key("US")).unwrap().admin.draft_uuid;
        assert_eq!(&products.draft(&key("91")).unwrap().admin.draft_uuid, parent_uuid);
    }

    #[test]
    fn test_create_draft_without_contained_copy() {
        let mut store = test_store().with_contained_copy(false);
        store.create_draft("SalesOrganizations", &key("US"), "alice").unwrap();
        assert!(!store.table("Products").unwrap().has_draft(&key("9")));
    }

    #[test]
    fn test_create_draft_skips_children_with_drafts() {
        // GIVEN
        let mut store = test_store();
        store.create_draft("Products", &key("91"), "bob").unwrap();
        store
            .update_draft("Products", &key("91"), &props! { "Name" => "edited by bob" })
            .unwrap();

        // WHEN
        store.create_draft("SalesOrganizations", &key("US"), "alice").unwrap();

        // THEN
        let draft = store.resolve_version("Products", &key("91"), false).unwrap();
        assert_eq!(draft.get("Name"), Some(&Value::from("edited by bob")));
    }

    #[test]
    fn test_create_draft_conflict() {
        let mut store = test_store();
        store.create_draft("SalesOrganizations", &key("US"), "alice").unwrap();
        let result = store.create_draft("SalesOrganizations", &key("US"), "bob");
        assert!(matches!(result, Err(DraftError::Conflict { .. })));
    }

    #[test]
    fn test_create_draft_errors() {
        let mut store = test_store();
        assert!(matches!(
            store.create_draft("SalesOrganizations", &key("Nope"), "alice"),
            Err(DraftError::NotFound { .. })
        ));
        assert!(matches!(
            store.create_draft("Currencies", &mockd_core::EntityKey::single("Code", "EUR"), "alice"),
            Err(DraftError::NotDraftEnabled { .. })
        ));
    }
}
