//! Hierarchy reads combined with draft editing.

mod common;

use common::{execute, registry, row, service, summary, ACTIVE_HIERARCHY};
use mockd_core::{props, Value};
use mockd_draft::DraftStore;
use mockd_service::{Method, Request, Response, Service, ServiceConfig};

const EXPANDED_HIERARCHY: &str = "/SalesOrganizations?$select=ID,DistanceFromRoot,DrillState,Name,IsActiveEntity,LimitedDescendantCount&$apply=ancestors($root/SalesOrganizations,SalesOrgHierarchy,ID,filter(IsActiveEntity eq true),keep start)/com.sap.vocabularies.Hierarchy.v1.TopLevels(HierarchyNodes=$root/SalesOrganizations,HierarchyQualifier='SalesOrgHierarchy',NodeProperty='ID',Levels=2,ExpandLevels=[{\"NodeID\":\"EMEA\",\"Levels\":1}])&$count=true&$select=LimitedDescendantCount,DistanceFromRoot,DrillState,ID,Name&$skip=0&$top=10";

const PRODUCTS_HIERARCHY: &str = "/SalesOrganizations(ID='US',IsActiveEntity=false)/_Products?$select=ID,DistanceFromRoot,DrillState,Name,IsActiveEntity,LimitedDescendantCount&$apply=com.sap.vocabularies.Hierarchy.v1.TopLevels(HierarchyNodes=$root/SalesOrganizations(ID='US',IsActiveEntity=false)/_Products,HierarchyQualifier='ProductsHierarchy',NodeProperty='ID',Levels=2)&$skip=0&$top=10";

fn draft_edit(service: &Service, id: &str) {
    let url = format!(
        "/SalesOrganizations(ID='{}',IsActiveEntity=true)/v4treedraft.draftEdit?$select=HasActiveEntity,HasDraftEntity,ID,IsActiveEntity&$expand=DraftAdministrativeData($select=DraftIsCreatedByMe,DraftUUID,InProcessByUser)'",
        id
    );
    let response = execute(service, Method::Post, &url).unwrap();
    let draft = response.entity().unwrap();
    assert_eq!(draft.is_active(), Some(false));
    assert_eq!(draft.get("HasActiveEntity"), Some(&Value::Bool(true)));
}

#[test]
fn test_request_active_instances_only() {
    // GIVEN
    let service = service();
    draft_edit(&service, "EMEA");

    // WHEN
    let response = execute(&service, Method::Get, ACTIVE_HIERARCHY).unwrap();

    // THEN
    let expected = vec![
        row("Sales", 0, "expanded", 2, true),
        row("EMEA", 1, "collapsed", 0, true),
        row("US", 1, "collapsed", 0, true),
    ];
    assert_eq!(summary(&response), expected);
    assert!(matches!(response, Response::Rows { count: Some(3), .. }));
    assert_eq!(
        response.rows()[0].get("Name"),
        Some(&Value::from("Corporate Sales"))
    );

    // GIVEN the draft is discarded
    let deleted = execute(&service, Method::Delete, "/SalesOrganizations(ID='EMEA',IsActiveEntity=false)").unwrap();
    assert!(matches!(deleted, Response::Deleted(_)));

    // WHEN the hierarchy is reloaded
    let reloaded = execute(&service, Method::Get, ACTIVE_HIERARCHY).unwrap();

    // THEN
    assert_eq!(summary(&reloaded), expected);
    assert_eq!(reloaded, response);
}

#[test]
fn test_expand_on_sub_nodes() {
    // GIVEN
    let service = service();
    draft_edit(&service, "Sales");

    // WHEN
    let response = execute(&service, Method::Get, EXPANDED_HIERARCHY).unwrap();

    // THEN
    assert_eq!(
        summary(&response),
        vec![
            row("Sales", 0, "expanded", 3, true),
            row("EMEA", 1, "expanded", 1, true),
            row("EMEA Central", 2, "leaf", 0, true),
            row("US", 1, "collapsed", 0, true),
        ]
    );
}

#[test]
fn test_hierarchy_of_sub_objects() {
    // GIVEN
    let service = service();
    draft_edit(&service, "US");

    // WHEN
    let response = execute(&service, Method::Get, PRODUCTS_HIERARCHY).unwrap();

    // THEN
    assert_eq!(
        summary(&response),
        vec![
            row("9", 0, "expanded", 2, false),
            row("91", 1, "leaf", 0, false),
            row("92", 1, "leaf", 0, false),
        ]
    );
    let names: Vec<_> = response
        .rows()
        .iter()
        .filter_map(|row| row.get("Name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["Beverages", "Sodas", "Juices"]);
}

#[test]
fn test_edit_twice_conflicts() {
    let service = service();
    draft_edit(&service, "EMEA");
    let err = execute(
        &service,
        Method::Post,
        "/SalesOrganizations(ID='EMEA',IsActiveEntity=true)/v4treedraft.draftEdit",
    )
    .unwrap_err();
    assert_eq!(err.status_code(), 409);
}

#[test]
fn test_patch_then_activate() {
    // GIVEN
    let service = service();
    draft_edit(&service, "US");
    let patch = Request::from_url(Method::Patch, "/SalesOrganizations(ID='US',IsActiveEntity=false)")
        .unwrap()
        .with_body(props! { "Name" => "United States" });
    service.execute(&patch).unwrap();

    // WHEN
    let activated = execute(
        &service,
        Method::Post,
        "/SalesOrganizations(ID='US',IsActiveEntity=false)/v4treedraft.draftActivate",
    )
    .unwrap();

    // THEN
    let active = activated.entity().unwrap();
    assert_eq!(active.is_active(), Some(true));
    assert_eq!(active.get("Name"), Some(&Value::from("United States")));
    let read = execute(&service, Method::Get, "/SalesOrganizations(ID='US',IsActiveEntity=true)").unwrap();
    assert_eq!(read.entity().unwrap().get("HasDraftEntity"), Some(&Value::Bool(false)));
}

#[test]
fn test_prepare_and_discard() {
    let service = service();
    draft_edit(&service, "EMEA");

    let prepared = execute(
        &service,
        Method::Post,
        "/SalesOrganizations(ID='EMEA',IsActiveEntity=false)/v4treedraft.draftPrepare",
    )
    .unwrap();
    assert_eq!(prepared.entity().unwrap().is_active(), Some(false));

    let discarded = execute(
        &service,
        Method::Post,
        "/SalesOrganizations(ID='EMEA',IsActiveEntity=false)/v4treedraft.draftDiscard",
    )
    .unwrap();
    assert_eq!(discarded.entity().unwrap().is_active(), Some(true));
}

#[test]
fn test_new_entity_through_navigation_is_a_draft() {
    // GIVEN
    let service = service();
    draft_edit(&service, "US");
    let request = Request::from_url(Method::Post, "/SalesOrganizations(ID='US',IsActiveEntity=false)/_Products")
        .unwrap()
        .with_body(props! { "ID" => "93", "Name" => "Water", "Parent_ID" => "9" })
        .with_principal("bob");

    // WHEN
    let created = service.execute(&request).unwrap();

    // THEN
    let record = created.entity().unwrap();
    assert_eq!(record.is_active(), Some(false));
    assert_eq!(record.get("SalesOrg_ID"), Some(&Value::from("US")));
    let products = execute(&service, Method::Get, PRODUCTS_HIERARCHY).unwrap();
    assert_eq!(products.rows()[0].get("LimitedDescendantCount"), Some(&Value::Int(3)));
}

#[test]
fn test_rejected_requests() {
    let service = service();

    let unknown_action = execute(
        &service,
        Method::Post,
        "/SalesOrganizations(ID='US',IsActiveEntity=true)/v4treedraft.draftShare",
    )
    .unwrap_err();
    assert_eq!(unknown_action.status_code(), 501);

    let syntax = execute(&service, Method::Get, "/SalesOrganizations?$apply=filter(ID eq 'US'").unwrap_err();
    assert_eq!(syntax.status_code(), 400);

    let unsupported = execute(&service, Method::Get, "/SalesOrganizations?$apply=Acme.Rollup(Depth=1)").unwrap_err();
    assert_eq!(unsupported.status_code(), 501);

    let missing = execute(&service, Method::Get, "/SalesOrganizations(ID='APJ',IsActiveEntity=true)").unwrap_err();
    assert_eq!(missing.status_code(), 404);

    let not_draft = execute(
        &service,
        Method::Post,
        "/Currencies('EUR')/v4treedraft.draftEdit",
    )
    .unwrap_err();
    assert_eq!(not_draft.status_code(), 400);
}

#[test]
fn test_page_size_limit() {
    let store = {
        let mut store = DraftStore::new(registry());
        store
            .load(
                "Currencies",
                vec![
                    props! { "Code" => "EUR", "Name" => "Euro" },
                    props! { "Code" => "USD", "Name" => "US Dollar" },
                    props! { "Code" => "JPY", "Name" => "Yen" },
                ],
            )
            .unwrap();
        store
    };
    let service = Service::new(store, ServiceConfig::default().with_max_page_size(2));
    let response = execute(&service, Method::Get, "/Currencies?$count=true&$orderby=Code desc").unwrap();
    assert!(matches!(response, Response::Rows { count: Some(3), .. }));
    let codes: Vec<_> = response
        .rows()
        .iter()
        .filter_map(|row| row.get("Code").and_then(Value::as_str))
        .collect();
    assert_eq!(codes, vec!["USD", "JPY"]);
}

#[test]
fn test_drill_state_of_truncated_ancestors() {
    // GIVEN only EMEA is selected, so EMEA Central is not part of the input
    let service = service();
    let url = "/SalesOrganizations?$apply=ancestors($root/SalesOrganizations,SalesOrgHierarchy,ID,filter(ID eq 'EMEA'),keep start)/com.sap.vocabularies.Hierarchy.v1.TopLevels(HierarchyNodes=$root/SalesOrganizations,HierarchyQualifier='SalesOrgHierarchy',NodeProperty='ID',Levels=3)";

    // WHEN
    let response = execute(&service, Method::Get, url).unwrap();

    // THEN
    assert_eq!(
        summary(&response),
        vec![
            row("Sales", 0, "expanded", 1, true),
            row("EMEA", 1, "collapsed", 0, true),
        ]
    );
}

#[test]
fn test_draft_ownership_per_principal() {
    // GIVEN
    let service = service();
    let edit = Request::from_url(Method::Post, "/SalesOrganizations(ID='EMEA',IsActiveEntity=true)/v4treedraft.draftEdit")
        .unwrap()
        .with_principal("alice");
    service.execute(&edit).unwrap();

    // WHEN
    let read_as = |principal: &str| {
        let request = Request::from_url(Method::Get, "/SalesOrganizations(ID='EMEA',IsActiveEntity=false)")
            .unwrap()
            .with_principal(principal);
        let response = service.execute(&request).unwrap();
        let admin = response.entity().unwrap().get("DraftAdministrativeData").cloned().unwrap();
        admin.as_object().unwrap().get("DraftIsCreatedByMe").cloned()
    };

    // THEN
    assert_eq!(read_as("alice"), Some(Value::Bool(true)));
    assert_eq!(read_as("bob"), Some(Value::Bool(false)));
}
