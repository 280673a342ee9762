//! Linked Layout Tests
//!
//! One hyper-schema API description: `definitions` keyed by resource, each
//! with `links` carrying request and target schemas.

use std::path::{Path, PathBuf};

use schema_gate::{
    AddressingStrategy, Engine, EngineConfig, FormatChecker, LinkedResolver, LoadError,
    ReferenceValidator, ResolutionStrategy, ResponseCheck, SchemaDraft, SchemaPath, SchemaStore,
    SkipReason, ValidationError,
};
use serde_json::json;

fn api_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/linked/api.json")
}

fn path(s: &str) -> SchemaPath {
    SchemaPath::parse(s).unwrap()
}

fn resolver() -> LinkedResolver {
    LinkedResolver::new(SchemaStore::load_document(api_path()).unwrap())
}

fn engine() -> Engine {
    Engine::new(
        resolver(),
        ReferenceValidator::new(SchemaDraft::Draft4, FormatChecker::extended()),
    )
    .with_response_validation(true)
}

const USER_ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_store_keys_are_definitions() {
    let store = SchemaStore::load(api_path(), AddressingStrategy::Linked).unwrap();
    assert_eq!(store.resource_keys(), vec!["address", "user", "widget"]);
}

#[test]
fn test_link_metadata() {
    let resolver = resolver();
    let links = resolver.links("user").unwrap();
    assert_eq!(links.len(), 4);
    assert_eq!(links[0].rel, "create");
    assert_eq!(links[0].method, Some("POST"));
    assert_eq!(links[0].href, Some("/users"));
}

#[test]
fn test_read_without_schema_accepts_anything() {
    let engine = engine();
    assert!(engine.validate_request(&path("user/self"), &json!(null)).is_ok());
    assert!(engine
        .validate_request(&path("user/self"), &json!({"anything": [1, 2, 3]}))
        .is_ok());
}

#[test]
fn test_unmatched_rel_skips_validation() {
    let engine = engine();
    assert_eq!(engine.strategy().resolve_request(&path("user/destroy")).unwrap(), None);
    assert!(engine
        .validate_request(&path("user/destroy"), &json!("not even an object"))
        .is_ok());
    assert_eq!(
        engine.validate_response(&path("user/destroy"), 200, "application/json", "[]"),
        ResponseCheck::Skipped(SkipReason::NoSchema)
    );
}

#[test]
fn test_unknown_resource() {
    let engine = engine();
    let err = engine
        .validate_request(&path("users/create"), &json!({}))
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnknownResource {
            resource: "users".to_string(),
            suggestion: Some("user".to_string()),
        }
    );
}

#[test]
fn test_instances_without_target_schema_wraps_objects() {
    let resolver = resolver();
    let node = resolver.resolve_response(&path("user/instances")).unwrap().unwrap();
    let (_, user) = resolver.definition("user").unwrap();
    assert_eq!(node.schema["properties"]["objects"]["items"], *user);

    let engine = engine();
    let valid = json!({"objects": [{"id": USER_ID, "email": "a@example.com"}]}).to_string();
    assert_eq!(
        engine.validate_response(&path("user/instances"), 200, "application/json", &valid),
        ResponseCheck::Passed
    );

    let bare_list = json!([{"id": USER_ID, "email": "a@example.com"}]).to_string();
    assert!(engine
        .validate_response(&path("user/instances"), 200, "application/json", &bare_list)
        .is_failure());

    let bad_item = json!({"objects": [{"id": USER_ID}]}).to_string();
    match engine.validate_response(&path("user/instances"), 200, "application/json", &bad_item) {
        ResponseCheck::Failed(e) => assert_eq!(e.violation().unwrap().pointer, "/objects/0/email"),
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[test]
fn test_other_rel_without_target_schema_uses_resource() {
    let resolver = resolver();
    let node = resolver.resolve_response(&path("user/update")).unwrap().unwrap();
    let (_, user) = resolver.definition("user").unwrap();
    assert_eq!(node.schema.as_ref(), user);

    let engine = engine();
    let missing_email = json!({"id": USER_ID}).to_string();
    assert!(engine
        .validate_response(&path("user/update"), 200, "application/json", &missing_email)
        .is_failure());
}

#[test]
fn test_explicit_target_schema_wins() {
    let engine = engine();
    let list = json!([{"sku": "blue-bolt"}, {"sku": "red-nut"}]).to_string();
    assert_eq!(
        engine.validate_response(&path("widget/instances"), 200, "application/json", &list),
        ResponseCheck::Passed
    );

    let wrapped = json!({"objects": []}).to_string();
    assert!(engine
        .validate_response(&path("widget/instances"), 200, "application/json", &wrapped)
        .is_failure());
}

// =============================================================================
// $ref resolution against the root document
// =============================================================================

#[test]
fn test_deep_link_ref_uses_root_definitions() {
    let engine = engine();
    let ok = json!({"email": "a@example.com", "address": {"street": "1 Main St", "city": "Oslo"}});
    assert!(engine.validate_request(&path("user/create"), &ok).is_ok());

    let missing_city = json!({"email": "a@example.com", "address": {"street": "1 Main St"}});
    let err = engine
        .validate_request(&path("user/create"), &missing_city)
        .unwrap_err();
    assert_eq!(err.violation().unwrap().pointer, "/address/city");
}

#[test]
fn test_target_schema_ref_and_format() {
    let engine = engine();
    let ok = json!({"id": USER_ID, "email": "a@example.com"}).to_string();
    assert_eq!(
        engine.validate_response(&path("user/create"), 200, "application/json", &ok),
        ResponseCheck::Passed
    );

    let bad_id = json!({"id": "42", "email": "a@example.com"}).to_string();
    match engine.validate_response(&path("user/create"), 200, "application/json", &bad_id) {
        ResponseCheck::Failed(e) => assert_eq!(e.violation().unwrap().pointer, "/id"),
        other => panic!("Expected failure, got {:?}", other),
    }
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_initialize_linked() {
    let config = EngineConfig {
        schema_source_location: Some(api_path()),
        addressing_strategy: AddressingStrategy::Linked,
        ..Default::default()
    }
    .with_format_checker(FormatChecker::extended());

    let engine = schema_gate::initialize(&config).unwrap();
    assert_eq!(engine.strategy().name(), "linked");
    assert_eq!(engine.validator().formats().names().collect::<Vec<_>>(), vec!["slug", "uuid"]);
    assert_eq!(
        engine.validate_response(&path("user/create"), 200, "application/json", "{}"),
        ResponseCheck::Skipped(SkipReason::Disabled)
    );
}

#[test]
fn test_initialize_linked_missing_file() {
    let config = EngineConfig {
        schema_source_location: Some(api_path().with_file_name("absent.json")),
        addressing_strategy: AddressingStrategy::Linked,
        ..Default::default()
    };
    assert!(matches!(
        schema_gate::initialize(&config),
        Err(LoadError::Io { .. })
    ));

    let unconfigured = EngineConfig {
        addressing_strategy: AddressingStrategy::Linked,
        ..Default::default()
    };
    assert!(matches!(
        schema_gate::initialize(&unconfigured),
        Err(LoadError::MissingSource)
    ));
}
