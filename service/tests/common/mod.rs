//! Fixtures shared by the service integration tests.

#![allow(dead_code)]

use mockd_core::{props, Record, Value};
use mockd_draft::DraftStore;
use mockd_registry::{NavigationDef, PropertyType, Registry, RegistryBuilder, HIERARCHY_VOCABULARY};
use mockd_service::{Method, Request, Response, Service, ServiceConfig, ServiceError};
use std::sync::Arc;

pub const ACTIVE_HIERARCHY: &str = "/SalesOrganizations?$apply=ancestors($root/SalesOrganizations,SalesOrgHierarchy,ID,filter(IsActiveEntity eq true),keep start)/com.sap.vocabularies.Hierarchy.v1.TopLevels(HierarchyNodes=$root/SalesOrganizations,HierarchyQualifier='SalesOrgHierarchy',NodeProperty='ID',Levels=2)&$count=true&$select=LimitedDescendantCount,DistanceFromRoot,DrillState,ID,Name&$skip=0&$top=10";

pub fn registry() -> Arc<Registry> {
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
    builder
        .add_entity_set("Currencies")
        .key("Code", PropertyType::String)
        .property("Name", PropertyType::String)
        .done()
        .unwrap();
    Arc::new(builder.build().unwrap())
}

pub fn org(id: &str, name: &str, parent: Option<&str>) -> Record {
    props! {
        "ID" => id,
        "Name" => name,
        "Superordinate_ID" => parent.map(Value::from).unwrap_or(Value::Null),
    }
}

pub fn product(id: &str, name: &str, parent: Option<&str>) -> Record {
    props! {
        "ID" => id,
        "Name" => name,
        "SalesOrg_ID" => "US",
        "Parent_ID" => parent.map(Value::from).unwrap_or(Value::Null),
    }
}

pub fn service() -> Service {
    let mut store = DraftStore::new(registry());
    store
        .load(
            "SalesOrganizations",
            vec![
                org("Sales", "Corporate Sales", None),
                org("EMEA", "EMEA", Some("Sales")),
                org("US", "US", Some("Sales")),
                org("EMEA Central", "EMEA Central", Some("EMEA")),
                org("US West", "US West", Some("US")),
            ],
        )
        .unwrap();
    store
        .load(
            "Products",
            vec![
                product("9", "Beverages", None),
                product("91", "Sodas", Some("9")),
                product("92", "Juices", Some("9")),
            ],
        )
        .unwrap();
    Service::new(store, ServiceConfig::default())
}

pub fn execute(service: &Service, method: Method, url: &str) -> Result<Response, ServiceError> {
    service.execute(&Request::from_url(method, url)?)
}

/// (ID, DistanceFromRoot, DrillState, LimitedDescendantCount, IsActiveEntity)
pub fn summary(response: &Response) -> Vec<(String, i64, String, i64, bool)> {
    response
        .rows()
        .iter()
        .map(|row| {
            (
                row.get("ID").and_then(Value::as_str).unwrap().to_string(),
                row.get("DistanceFromRoot").and_then(Value::as_int).unwrap(),
                row.get("DrillState").and_then(Value::as_str).unwrap().to_string(),
                row.get("LimitedDescendantCount").and_then(Value::as_int).unwrap(),
                row.is_active().unwrap(),
            )
        })
        .collect()
}

pub fn row(id: &str, distance: i64, drill_state: &str, count: i64, active: bool) -> (String, i64, String, i64, bool) {
    (id.to_string(), distance, drill_state.to_string(), count, active)
}
