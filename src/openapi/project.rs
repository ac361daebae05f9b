use serde_json::{Map, Value};
use tracing::debug;

use super::DocSkeleton;
use crate::notation::{extract_openapi_parameters, translate, Dialect};
use crate::tree::{MethodSpec, RouteNode, Scope};

/// Fill `doc.paths` from a route tree, returning the completed document.
///
/// Every node yields one path item keyed by its full path in the OpenAPI
/// dialect. Children are keyed by the full accumulated path, matching the
/// paths in the route registry. Generated items replace skeleton items with
/// the same key; among generated items the later node wins.
///
/// Each operation's `parameters` is the path-derived parameters, then the
/// node's parameters, then the method's, with no de-duplication.
pub fn project(doc: &DocSkeleton, nodes: &[RouteNode]) -> DocSkeleton {
    let mut generated = Map::new();
    build_path_docs(nodes, &Scope::root(), &mut generated);
    debug!(paths = generated.len(), "Projected route tree into OpenAPI paths");

    let mut out = doc.clone();
    for (path, item) in generated {
        out.paths.insert(path, item);
    }
    out
}

fn build_path_docs(nodes: &[RouteNode], parent: &Scope, out: &mut Map<String, Value>) {
    for node in nodes {
        let scope = parent.enter(node);
        let path_params: Vec<Value> = extract_openapi_parameters(&scope.declared)
            .iter()
            .map(Value::from)
            .collect();

        let mut item = Map::new();
        if let Some(summary) = &node.summary {
            item.insert("summary".into(), Value::String(summary.clone()));
        }
        if let Some(description) = &node.description {
            item.insert("description".into(), Value::String(description.clone()));
        }
        for (method, spec) in node.methods.iter() {
            let parameters = path_params
                .iter()
                .chain(&node.parameters)
                .chain(&spec.parameters)
                .cloned()
                .collect();
            item.insert(method.as_str().into(), operation(spec, parameters));
        }

        out.insert(translate(&scope.declared, Dialect::OpenApi), Value::Object(item));
        build_path_docs(&node.routes, &scope, out);
    }
}

fn operation(spec: &MethodSpec, parameters: Vec<Value>) -> Value {
    let mut op = Map::new();
    op.insert("parameters".into(), Value::Array(parameters));
    let mut put = |key: &str, value: Option<Value>| {
        if let Some(value) = value {
            op.insert(key.into(), value);
        }
    };
    put("description", spec.description.clone().map(Value::String));
    put("summary", spec.summary.clone().map(Value::String));
    put("responses", spec.responses.clone().map(Value::Object));
    put("operationId", spec.operation_id.clone().map(Value::String));
    put("requestBody", spec.request_body.clone());
    put(
        "tags",
        spec.tags
            .as_ref()
            .map(|tags| tags.iter().cloned().map(Value::String).collect()),
    );
    put("security", spec.security.clone().map(Value::Array));
    Value::Object(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skeleton() -> DocSkeleton {
        DocSkeleton::new("3.0.0", json!({"title": "Pets", "version": "1.0"}))
    }

    #[test]
    fn test_operation_field_order_and_omission() {
        let spec = MethodSpec::documented()
            .summary("List")
            .response("200", "ok")
            .tag("pets");
        let op = operation(&spec, vec![]);
        let keys: Vec<_> = op.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["parameters", "summary", "responses", "tags"]);
    }

    #[test]
    fn test_node_without_methods_yields_empty_item() {
        let doc = project(&skeleton(), &[RouteNode::new("/empty")]);
        assert_eq!(doc.paths["/empty"], json!({}));
    }

    #[test]
    fn test_skeleton_paths_are_kept() {
        let mut base = skeleton();
        base.paths.insert("/health".into(), json!({"get": {"responses": {}}}));
        let doc = project(&base, &[RouteNode::new("/pets").get(MethodSpec::documented())]);
        assert!(doc.paths.contains_key("/health"));
        assert!(doc.paths.contains_key("/pets"));
    }

    #[test]
    fn test_path_item_summary_and_description() {
        let node = RouteNode::new("/pets")
            .summary("Pets")
            .description("All the pets")
            .get(MethodSpec::documented());
        let doc = project(&skeleton(), &[node]);
        assert_eq!(doc.paths["/pets"]["summary"], "Pets");
        assert_eq!(doc.paths["/pets"]["description"], "All the pets");
    }
}
