use serde::{Deserialize, Serialize};
use std::fmt;

/// Target notation for a translated path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Colon-prefixed parameters understood by the router host (`/pets/:id`)
    Framework,
    /// Brace-wrapped parameters used in OpenAPI path keys (`/pets/{id}`)
    OpenApi,
}

impl Dialect {
    fn render(self, identifier: &str) -> String {
        match self {
            Dialect::Framework => format!(":{identifier}"),
            Dialect::OpenApi => format!("{{{identifier}}}"),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Framework => write!(f, "framework"),
            Dialect::OpenApi => write!(f, "openapi"),
        }
    }
}

/// A recognised `{identifier|type}` segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub identifier: &'a str,
    pub type_token: &'a str,
}

/// Recognise a single path segment as a placeholder.
///
/// Returns `None` for literal segments and for malformed placeholders such as
/// `{id}` (no `|`) or `{id|string` (unterminated).
pub fn placeholder(segment: &str) -> Option<Placeholder<'_>> {
    let body = segment.strip_prefix('{')?.strip_suffix('}')?;
    let (identifier, type_token) = body.split_once('|')?;
    Some(Placeholder {
        identifier,
        type_token,
    })
}

/// Render a declared path in the requested dialect.
///
/// Literal segments, malformed placeholders and empty segments (leading,
/// trailing or doubled `/`) are preserved exactly.
pub fn translate(path: &str, dialect: Dialect) -> String {
    path.split('/')
        .map(|segment| match placeholder(segment) {
            Some(p) => dialect.render(p.identifier),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Schema stub attached to a path parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub type_token: String,
}

/// OpenAPI parameter object derived from a placeholder segment
///
/// Always `in: path` and `required: true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub schema: ParameterSchema,
}

impl PathParameter {
    fn from_placeholder(p: Placeholder<'_>) -> Self {
        Self {
            name: p.identifier.to_string(),
            location: "path".to_string(),
            required: true,
            schema: ParameterSchema {
                type_token: p.type_token.to_string(),
            },
        }
    }
}

impl From<&PathParameter> for serde_json::Value {
    fn from(p: &PathParameter) -> Self {
        serde_json::json!({
            "name": p.name,
            "in": p.location,
            "required": p.required,
            "schema": { "type": p.schema.type_token },
        })
    }
}

/// One [`PathParameter`] per placeholder segment, in path order.
pub fn extract_openapi_parameters(path: &str) -> Vec<PathParameter> {
    path.split('/')
        .filter_map(placeholder)
        .map(PathParameter::from_placeholder)
        .collect()
}
