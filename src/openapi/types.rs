use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An OpenAPI document the projector fills in
///
/// Only the fields the projector touches are typed; anything else in the
/// source document (`components`, `security`, `externalDocs`, `x-*`) is kept
/// verbatim in `extensions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSkeleton {
    pub openapi: String,
    pub info: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Value>,
    /// OpenAPI-dialect path -> path item
    #[serde(default)]
    pub paths: Map<String, Value>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl DocSkeleton {
    pub fn new(openapi: impl Into<String>, info: Value) -> Self {
        Self {
            openapi: openapi.into(),
            info,
            servers: Vec::new(),
            tags: Vec::new(),
            paths: Map::new(),
            extensions: Map::new(),
        }
    }

    #[must_use]
    pub fn server(mut self, server: Value) -> Self {
        self.servers.push(server);
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: Value) -> Self {
        self.tags.push(tag);
        self
    }

    /// Path item for an OpenAPI-dialect path, if present
    pub fn path_item(&self, path: &str) -> Option<&Value> {
        self.paths.get(path)
    }

    /// Operation object for `path` + lowercase `method`, if present
    pub fn operation(&self, path: &str, method: &str) -> Option<&Value> {
        self.path_item(path)?.get(method)
    }
}
