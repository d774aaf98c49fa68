//! Deleting active entities.

use mockd_core::EntityKey;

use crate::containment::{contained_descendants, Side};
use crate::error::{DraftError, DraftResult};
use crate::DraftStore;

/// Remove `key` in both versions, cascading through contained children.
pub fn delete_active(store: &mut DraftStore, set: &str, key: &EntityKey) -> DraftResult<()> {
    let registry = store.registry.clone();
    let def = registry
        .entity_set(set)
        .ok_or_else(|| DraftError::unknown_entity_set(set))?;

    let table = store.table(set)?;
    let active = table
        .active(key)
        .ok_or_else(|| DraftError::not_found(set, key))?;
    let mut removed = vec![(set.to_string(), key.clone())];
    removed.extend(contained_descendants(store, def, active, Side::Active));

    for (remove_set, remove_key) in &removed {
        let table = store.table_mut(remove_set)?;
        table.take_draft(remove_key);
        table.take_active(remove_key);
    }
    tracing::info!(entity_set = set, key = %key, contained = removed.len() - 1, "deleted entity");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::test_support::{key, test_store};
    use crate::DraftError;

    #[test]
    fn test_delete_active_cascades() {
        // GIVEN
        let mut store = test_store();
        store.create_draft("SalesOrganizations", &key("US"), "alice").unwrap();

        // WHEN
        store.delete_active("SalesOrganizations", &key("US")).unwrap();

        // THEN
        assert!(matches!(
            store.resolve("SalesOrganizations", &key("US")),
            Err(DraftError::NotFound { .. })
        ));
        let products = store.table("Products").unwrap();
        assert!(!products.contains(&key("9")));
        assert!(!products.contains(&key("91")));
        assert!(products.contains(&key("10")));
    }

    #[test]
    fn test_delete_missing() {
        let mut store = test_store();
        assert!(matches!(
            store.delete_active("SalesOrganizations", &key("Nope")),
            Err(DraftError::NotFound { .. })
        ));
    }
}
