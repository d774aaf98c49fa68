//! Shared fixtures for unit tests.

use mockd_core::{props, EntityKey, Value};
use mockd_registry::{NavigationDef, PropertyType, Registry, RegistryBuilder};
use std::sync::Arc;

use crate::DraftStore;

pub(crate) fn test_registry() -> Arc<Registry> {
    let mut builder = RegistryBuilder::new("v4treedraft");
    builder
        .add_entity_set("SalesOrganizations")
        .key("ID", PropertyType::String)
        .property("Name", PropertyType::String)
        .property("Superordinate_ID", PropertyType::String)
        .hierarchy("SalesOrgHierarchy", "ID", "Superordinate_ID")
        .navigation(
            NavigationDef::new("_Products", "Products")
                .on("ID", "SalesOrg_ID")
                .containment(),
        )
        .draft_enabled()
        .done()
        .unwrap();
    builder
        .add_entity_set("Products")
        .key("ID", PropertyType::String)
        .property("Name", PropertyType::String)
        .property("SalesOrg_ID", PropertyType::String)
        .property("Parent_ID", PropertyType::String)
        .hierarchy("ProductsHierarchy", "ID", "Parent_ID")
        .draft_enabled()
        .done()
        .unwrap();
    builder
        .add_entity_set("Currencies")
        .key("Code", PropertyType::String)
        .done()
        .unwrap();
    Arc::new(builder.build().unwrap())
}

/// Sales with child US; products 9 and 91 under US, 10 under EMEA.
pub(crate) fn test_store() -> DraftStore {
    let mut store = DraftStore::new(test_registry());
    store
        .load(
            "SalesOrganizations",
            vec![
                props! { "ID" => "Sales", "Name" => "Sales", "Superordinate_ID" => Value::Null },
                props! { "ID" => "US", "Name" => "US", "Superordinate_ID" => "Sales" },
            ],
        )
        .unwrap();
    store
        .load(
            "Products",
            vec![
                props! { "ID" => "9", "SalesOrg_ID" => "US", "Parent_ID" => Value::Null },
                props! { "ID" => "91", "SalesOrg_ID" => "US", "Parent_ID" => "9" },
                props! { "ID" => "10", "SalesOrg_ID" => "EMEA", "Parent_ID" => Value::Null },
            ],
        )
        .unwrap();
    store
}

pub(crate) fn key(id: &str) -> EntityKey {
    EntityKey::single("ID", id)
}
