use anyhow::{bail, Context};
use std::path::Path;

use super::RouteNode;

const MANIFEST_SHAPE: &str = "route manifest must be a list of nodes or an object with a `routes` list";

/// Parse a route manifest from text.
///
/// Accepts either a bare list of nodes or an object with a `routes` list.
/// `yaml` selects the YAML parser; otherwise the text is read as JSON. Errors
/// name the offending node, e.g. `routes[1]`.
pub fn parse_manifest(content: &str, yaml: bool) -> anyhow::Result<Vec<RouteNode>> {
    if yaml {
        let manifest: serde_yaml::Value = serde_yaml::from_str(content)?;
        let items = match manifest {
            serde_yaml::Value::Sequence(items) => items,
            serde_yaml::Value::Mapping(mut map) => match map.remove("routes") {
                Some(serde_yaml::Value::Sequence(items)) => items,
                _ => bail!(MANIFEST_SHAPE),
            },
            _ => bail!(MANIFEST_SHAPE),
        };
        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_yaml::from_value(item).with_context(|| format!("invalid node routes[{idx}]"))
            })
            .collect()
    } else {
        let manifest: serde_json::Value = serde_json::from_str(content)?;
        let items = match manifest {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => match map.remove("routes") {
                Some(serde_json::Value::Array(items)) => items,
                _ => bail!(MANIFEST_SHAPE),
            },
            _ => bail!(MANIFEST_SHAPE),
        };
        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_json::from_value(item).with_context(|| format!("invalid node routes[{idx}]"))
            })
            .collect()
    }
}

/// Load a documentation-only route tree from a `.yaml`/`.yml` or JSON file.
///
/// Handlers and middleware cannot be expressed in a manifest, so every method
/// of the returned tree is documentation-only.
pub fn load_manifest(file_path: impl AsRef<Path>) -> anyhow::Result<Vec<RouteNode>> {
    let file_path = file_path.as_ref();
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read route manifest {}", file_path.display()))?;
    parse_manifest(&content, is_yaml(file_path))
        .with_context(|| format!("invalid route manifest {}", file_path.display()))
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::RouteMethod;

    #[test]
    fn test_parse_bare_list() {
        let nodes = parse_manifest(
            r#"[{"name": "pets", "path": "/pets", "get": {"responses": {"200": {"description": "ok"}}}}]"#,
            false,
        )
        .unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].methods.contains(RouteMethod::Get));
    }

    #[test]
    fn test_parse_wrapped_yaml() {
        let yaml = "routes:\n  - name: a\n    path: /a\n    children:\n      - name: b\n        path: /b\n";
        let nodes = parse_manifest(yaml, true).unwrap();
        assert_eq!(nodes[0].routes[0].name.as_deref(), Some("b"));
    }

    #[test]
    fn test_parse_yaml_with_unquoted_status_codes() {
        let yaml = "- name: pets\n  path: /pets\n  get:\n    responses:\n      200: { description: ok }\n      404: { description: missing }\n      default: { description: error }\n";
        let nodes = parse_manifest(yaml, true).unwrap();
        let get = nodes[0].methods.get(RouteMethod::Get).unwrap();
        assert_eq!(get.response_codes(), vec!["200", "404", "default"]);
    }

    #[test]
    fn test_parse_error_names_the_node() {
        let yaml = "- path: /ok\n- path: /bad\n  get:\n    tags: not-a-list\n";
        let err = parse_manifest(yaml, true).unwrap_err();
        assert_eq!(err.to_string(), "invalid node routes[1]");

        let err = parse_manifest(r#"{"paths": []}"#, false).unwrap_err();
        assert_eq!(err.to_string(), MANIFEST_SHAPE);
    }

    #[test]
    fn test_is_yaml() {
        assert!(is_yaml(Path::new("routes.yml")));
        assert!(is_yaml(Path::new("dir/routes.yaml")));
        assert!(!is_yaml(Path::new("routes.json")));
    }
}
