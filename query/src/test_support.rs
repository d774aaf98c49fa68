//! Shared fixtures for unit tests.

use mockd_core::{props, Record, Value};
use mockd_draft::DraftStore;
use mockd_registry::{NavigationDef, PropertyType, Registry, RegistryBuilder, HIERARCHY_VOCABULARY};
use std::sync::Arc;

pub(crate) fn test_registry() -> Arc<Registry> {
    let mut builder = RegistryBuilder::new("v4treedraft");
    builder.vocabulary_alias("Hierarchy", HIERARCHY_VOCABULARY);
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
    Arc::new(builder.build().unwrap())
}

fn org(id: &str, parent: Option<&str>) -> Record {
    props! {
        "ID" => id,
        "Name" => id,
        "Superordinate_ID" => parent.map(Value::from).unwrap_or(Value::Null),
    }
}

fn product(id: &str, org: &str, parent: Option<&str>) -> Record {
    props! {
        "ID" => id,
        "SalesOrg_ID" => org,
        "Parent_ID" => parent.map(Value::from).unwrap_or(Value::Null),
    }
}

/// Sales -> {EMEA -> {EMEA Central}, US -> {US West}}; products 9 -> {91, 92} under US.
pub(crate) fn test_store() -> DraftStore {
    let mut store = DraftStore::new(test_registry());
    store
        .load(
            "SalesOrganizations",
            vec![
                org("Sales", None),
                org("EMEA", Some("Sales")),
                org("US", Some("Sales")),
                org("EMEA Central", Some("EMEA")),
                org("US West", Some("US")),
            ],
        )
        .unwrap();
    store
        .load(
            "Products",
            vec![
                product("9", "US", None),
                product("91", "US", Some("9")),
                product("92", "US", Some("9")),
                product("10", "EMEA", None),
            ],
        )
        .unwrap();
    store
}

pub(crate) fn ids(rows: &[Record]) -> Vec<&str> {
    rows.iter().filter_map(|r| r.get("ID").and_then(Value::as_str)).collect()
}
