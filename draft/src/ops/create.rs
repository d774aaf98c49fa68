//! Creation of new entities.

use mockd_core::{DraftAdministrativeData, Record};
use uuid::Uuid;

use crate::error::{DraftError, DraftResult};
use crate::store::{key_of, stamp_active, stamp_draft, strip_draft_properties};
use crate::{DraftRecord, DraftStore};

/// Insert a new active record.
pub fn insert_active(store: &mut DraftStore, set: &str, record: Record) -> DraftResult<Record> {
    let registry = store.registry.clone();
    let def = registry
        .entity_set(set)
        .ok_or_else(|| DraftError::unknown_entity_set(set))?;
    let key = key_of(def, &record)?;
    let table = store.table_mut(set)?;
    if table.contains(&key) {
        return Err(DraftError::conflict(set, &key, "entity already exists"));
    }

    table.put_active(key.clone(), strip_draft_properties(record));
    tracing::info!(entity_set = set, key = %key, "created active entity");
    let stored = table.active(&key).ok_or_else(|| DraftError::not_found(set, &key))?;
    Ok(stamp_active(def, table, &key, stored))
}

/// Create an entity that exists only as a draft.
pub fn create_new_draft(
    store: &mut DraftStore,
    set: &str,
    record: Record,
    principal: &str,
) -> DraftResult<Record> {
    let registry = store.registry.clone();
    let def = registry
        .entity_set(set)
        .ok_or_else(|| DraftError::unknown_entity_set(set))?;
    if !def.draft_enabled {
        return Err(DraftError::not_draft_enabled(set));
    }
    let key = key_of(def, &record)?;
    let table = store.table_mut(set)?;
    if table.contains(&key) {
        return Err(DraftError::conflict(set, &key, "entity already exists"));
    }

    let admin = DraftAdministrativeData::new(Uuid::new_v4().to_string(), principal);
    table.put_draft(
        key.clone(),
        DraftRecord {
            record: strip_draft_properties(record),
            admin,
        },
    );
    tracing::info!(entity_set = set, key = %key, principal, "created new draft");
    let draft = table.draft(&key).ok_or_else(|| DraftError::not_found(set, &key))?;
    Ok(stamp_draft(def, table, &key, draft))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{key, test_store};
    use crate::DraftError;
    use mockd_core::{names, props, Value};

    #[test]
    fn test_create_new_draft() {
        // GIVEN
        let mut store = test_store();

        // WHEN
        let record = store
            .create_new_draft("SalesOrganizations", props! { "ID" => "APJ", "Superordinate_ID" => "Sales" }, "bob")
            .unwrap();

        // THEN
        assert_eq!(record.is_active(), Some(false));
        assert_eq!(record.get(names::HAS_ACTIVE_ENTITY), Some(&Value::Bool(false)));
        let admin = record.get(names::DRAFT_ADMINISTRATIVE_DATA).and_then(Value::as_object).unwrap();
        assert_eq!(admin.get(names::CREATED_BY_USER), Some(&Value::from("bob")));
        assert!(store.resolve_version("SalesOrganizations", &key("APJ"), true).is_err());
    }

    #[test]
    fn test_create_new_draft_conflicts_with_existing_key() {
        let mut store = test_store();
        let result = store.create_new_draft("SalesOrganizations", props! { "ID" => "US" }, "bob");
        assert!(matches!(result, Err(DraftError::Conflict { .. })));
    }

    #[test]
    fn test_create_new_draft_requires_draft_enabled_set() {
        let mut store = test_store();
        let result = store.create_new_draft("Currencies", props! { "Code" => "USD" }, "bob");
        assert!(matches!(result, Err(DraftError::NotDraftEnabled { .. })));
    }

    #[test]
    fn test_insert_active_strips_client_flags() {
        let mut store = test_store();
        let record = store
            .insert_active("SalesOrganizations", props! { "ID" => "LATAM", "IsActiveEntity" => false })
            .unwrap();
        assert_eq!(record.is_active(), Some(true));
    }

    #[test]
    fn test_insert_active_missing_key() {
        let mut store = test_store();
        let result = store.insert_active("SalesOrganizations", props! { "Name" => "x" });
        assert!(matches!(result, Err(DraftError::MissingKey { ref property, .. }) if property == "ID"));
    }
}
