#![allow(clippy::unwrap_used, clippy::expect_used)]

use routetree::notation::{extract_openapi_parameters, placeholder, translate, Dialect};
use serde_json::json;

#[test]
fn test_translate_breed_and_id() {
    let path = "/pets/{breed|string}/{id|number}";
    assert_eq!(translate(path, Dialect::Framework), "/pets/:breed/:id");
    assert_eq!(translate(path, Dialect::OpenApi), "/pets/{breed}/{id}");

    let params = extract_openapi_parameters(path);
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].schema.type_token, "string");
    assert_eq!(params[1].schema.type_token, "number");
    assert!(params.iter().all(|p| p.required && p.location == "path"));
}

#[test]
fn test_framework_dialect_paths_pass_through() {
    assert_eq!(translate("/pets/:id/dogs", Dialect::Framework), "/pets/:id/dogs");
    assert_eq!(translate("/pets/:id/dogs", Dialect::OpenApi), "/pets/:id/dogs");
    assert!(extract_openapi_parameters("/pets/:id").is_empty());
}

#[test]
fn test_placeholder_needs_bar_and_both_braces() {
    assert!(placeholder("{id|number}").is_some());
    assert!(placeholder("{id}").is_none());
    assert!(placeholder("x{id|number}").is_none());
    assert!(placeholder("{id|number}x").is_none());
}

#[test]
fn test_unusual_type_tokens_are_kept_verbatim() {
    let params = extract_openapi_parameters("/files/{path|}/{v|integer(int64)}");
    assert_eq!(
        serde_json::to_value(&params).unwrap(),
        json!([
            { "name": "path", "in": "path", "required": true, "schema": { "type": "" } },
            { "name": "v", "in": "path", "required": true, "schema": { "type": "integer(int64)" } }
        ])
    );
}

#[test]
fn test_dialect_display() {
    assert_eq!(Dialect::Framework.to_string(), "framework");
    assert_eq!(Dialect::OpenApi.to_string(), "openapi");
}
