use seodeck_registry::{CatalogFile, CatalogRegistry, RegistryError};
use seodeck_types::{FieldKind, GroupShape, PanelId};

fn registry() -> CatalogRegistry {
    CatalogRegistry::from_embedded().expect("load embedded catalogs")
}

#[test]
fn ssl_check_posts_to_prefixed_endpoint() {
    let registry = registry();
    let operation = registry
        .find_operation(PanelId::Technical, "ssl_https_check")
        .expect("ssl_https_check present");
    assert_eq!(operation.endpoint, "/technical_seo/ssl_https_check");
    assert!(operation.manual_url);
    assert!(operation.send_body);
}

#[test]
fn local_catalog_declares_groups_and_defaults() {
    let registry = registry();

    let gmb = registry.find_operation(PanelId::Local, "gmb_manager").expect("gmb_manager");
    let group = gmb.groups.first().expect("business_data group");
    assert_eq!(group.key, "business_data");
    assert_eq!(group.shape, GroupShape::Object);
    assert_eq!(group.requires.as_deref(), Some("name"));
    assert!(group.only_without_url);

    let nap = registry.find_operation(PanelId::Local, "nap_consistency").expect("nap_consistency");
    assert_eq!(nap.groups[0].shape, GroupShape::List);

    let reviews = registry.find_operation(PanelId::Local, "review_management").expect("review_management");
    assert!(reviews.defaults.contains_key("response_templates"));
    assert_eq!(reviews.field("reviews").map(|field| field.kind), Some(FieldKind::Json));

    let benchmark = registry
        .find_operation(PanelId::Local, "competitor_benchmark")
        .expect("competitor_benchmark");
    let competitors = benchmark.field("benchmark_competitors").expect("competitors field");
    assert_eq!(competitors.body_key(), "competitor_urls");
}

#[test]
fn orchestration_controls_send_no_body() {
    let registry = registry();
    let trigger_all = registry
        .find_operation(PanelId::Orchestration, "trigger_all_agents")
        .expect("trigger_all_agents");
    assert!(!trigger_all.send_body);
    assert_eq!(trigger_all.endpoint, "/trigger_all_agents?retry_failed=true&max_retries=3");

    let run = registry
        .find_operation(PanelId::Orchestration, "run_orchestration")
        .expect("run_orchestration");
    assert!(run.send_body);
    assert!(!run.manual_url);
}

#[test]
fn phases_trigger_by_phase_id() {
    let registry = registry();
    let phases = registry.get(PanelId::Phases).expect("phases catalog");
    assert_eq!(phases.len(), 5);
    for phase in &phases.operations {
        assert_eq!(phase.endpoint, format!("/trigger_phase/{}", phase.id));
    }
}

#[test]
fn enum_fields_carry_options() {
    let registry = registry();
    for catalog in registry.catalogs() {
        for operation in &catalog.operations {
            for field in operation.input_fields.iter().filter(|field| field.kind == FieldKind::Enum) {
                assert!(!field.options.is_empty(), "{}/{}: {}", catalog.panel, operation.id, field.name);
            }
        }
    }
}

#[test]
fn search_spans_catalogs() {
    let registry = registry();
    let hits = registry.search("ssl https");
    assert!(!hits.is_empty());
    assert_eq!(hits[0].operation_id, "ssl_https_check");
    assert_eq!(hits[0].panel, PanelId::Technical);
    assert!(registry.search("zzzz-no-such-operation").is_empty());
}

#[test]
fn unknown_operation_is_reported() {
    let error = registry().find_operation(PanelId::Phases, "phase_9").unwrap_err();
    assert!(matches!(error, RegistryError::UnknownOperation { .. }));
    assert_eq!(error.to_string(), "panel 'phases' has no operation 'phase_9'");
}

#[test]
fn rejects_duplicate_operation_ids() {
    let raw = r#"{
        "panel": "phases",
        "title": "Phases",
        "categories": [{ "id": "a", "label": "A" }],
        "operations": [
            { "id": "same", "label": "One", "category": "a", "endpoint": "/one" },
            { "id": "same", "label": "Two", "category": "a", "endpoint": "/two" }
        ]
    }"#;
    let error = CatalogFile::parse("inline.json", raw).expect("parse").resolve().unwrap_err();
    assert!(matches!(error, RegistryError::DuplicateOperation { ref operation, .. } if operation == "same"));
}

#[test]
fn rejects_undeclared_fields_and_categories() {
    let undeclared_field = r#"{
        "panel": "local",
        "title": "Local",
        "categories": [{ "id": "a", "label": "A" }],
        "operations": [
            { "id": "op", "label": "Op", "category": "a", "endpoint": "/op", "inputs": ["ghost"] }
        ]
    }"#;
    let error = CatalogFile::parse("inline.json", undeclared_field).expect("parse").resolve().unwrap_err();
    assert!(matches!(error, RegistryError::UnknownField { ref field, .. } if field == "ghost"));

    let undeclared_category = r#"{
        "panel": "local",
        "title": "Local",
        "operations": [{ "id": "op", "label": "Op", "category": "nowhere", "endpoint": "/op" }]
    }"#;
    let error = CatalogFile::parse("inline.json", undeclared_category).expect("parse").resolve().unwrap_err();
    assert!(matches!(error, RegistryError::UnknownCategory { .. }));
}

#[test]
fn rejects_group_members_outside_inputs() {
    let raw = r#"{
        "panel": "local",
        "title": "Local",
        "categories": [{ "id": "a", "label": "A" }],
        "fields": {
            "name": { "label": "Name", "kind": "text" },
            "phone": { "label": "Phone", "kind": "text" }
        },
        "operations": [{
            "id": "op", "label": "Op", "category": "a", "endpoint": "/op",
            "inputs": ["name"],
            "groups": [{ "key": "business_data", "fields": ["name", "phone"], "requires": "name" }]
        }]
    }"#;
    let error = CatalogFile::parse("inline.json", raw).expect("parse").resolve().unwrap_err();
    assert!(matches!(error, RegistryError::GroupFieldNotInput { ref field, .. } if field == "phone"));
}

#[test]
fn malformed_catalog_is_a_parse_error() {
    let error = CatalogFile::parse("broken.json", "{ not json").unwrap_err();
    assert!(error.to_string().starts_with("failed to parse catalog broken.json"));
}
