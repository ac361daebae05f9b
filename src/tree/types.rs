use http::Method;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::RouteDefinition;
use crate::dispatcher::{HandlerRequest, HandlerResponse, Next};
use crate::middleware::Middleware;

/// The canonical HTTP methods a route tree may declare, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl RouteMethod {
    pub const ALL: [RouteMethod; 5] = [
        RouteMethod::Get,
        RouteMethod::Post,
        RouteMethod::Put,
        RouteMethod::Delete,
        RouteMethod::Options,
    ];

    /// Lowercase token used in declarations and OpenAPI path items
    pub fn as_str(self) -> &'static str {
        match self {
            RouteMethod::Get => "get",
            RouteMethod::Post => "post",
            RouteMethod::Put => "put",
            RouteMethod::Delete => "delete",
            RouteMethod::Options => "options",
        }
    }

    /// Case-insensitive parse; anything outside the canonical set is `None`
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(token))
    }

    pub fn from_http(method: &Method) -> Option<Self> {
        Self::from_token(method.as_str())
    }

    pub fn to_http(self) -> Method {
        match self {
            RouteMethod::Get => Method::GET,
            RouteMethod::Post => Method::POST,
            RouteMethod::Put => Method::PUT,
            RouteMethod::Delete => Method::DELETE,
            RouteMethod::Options => Method::OPTIONS,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| format!("unsupported method '{s}'"))
    }
}

/// Fixed-size per-method table
///
/// One slot per [`RouteMethod`]. Iteration always follows canonical order, and
/// serializes as an object keyed by the lowercase method token with empty slots
/// omitted (`{"get": ..., "post": ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodTable<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<T>,
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self {
            get: None,
            post: None,
            put: None,
            delete: None,
            options: None,
        }
    }
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, method: RouteMethod) -> Option<&T> {
        self.slot(method).as_ref()
    }

    pub fn get_mut(&mut self, method: RouteMethod) -> Option<&mut T> {
        self.slot_mut(method).as_mut()
    }

    /// Store `value` for `method`, returning the previous occupant
    pub fn set(&mut self, method: RouteMethod, value: T) -> Option<T> {
        self.slot_mut(method).replace(value)
    }

    pub fn contains(&self, method: RouteMethod) -> bool {
        self.slot(method).is_some()
    }

    pub fn is_empty(&self) -> bool {
        RouteMethod::ALL.iter().all(|m| !self.contains(*m))
    }

    /// Occupied slots in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (RouteMethod, &T)> + '_ {
        RouteMethod::ALL
            .into_iter()
            .filter_map(move |m| self.get(m).map(|v| (m, v)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(RouteMethod, &T) -> U) -> MethodTable<U> {
        let mut out = MethodTable::new();
        for (method, value) in self.iter() {
            out.set(method, f(method, value));
        }
        out
    }

    fn slot(&self, method: RouteMethod) -> &Option<T> {
        match method {
            RouteMethod::Get => &self.get,
            RouteMethod::Post => &self.post,
            RouteMethod::Put => &self.put,
            RouteMethod::Delete => &self.delete,
            RouteMethod::Options => &self.options,
        }
    }

    fn slot_mut(&mut self, method: RouteMethod) -> &mut Option<T> {
        match method {
            RouteMethod::Get => &mut self.get,
            RouteMethod::Post => &mut self.post,
            RouteMethod::Put => &mut self.put,
            RouteMethod::Delete => &mut self.delete,
            RouteMethod::Options => &mut self.options,
        }
    }
}

/// User handler bound to a method of a route node
///
/// Receives the request, a response to fill in, a [`Next`] continuation to
/// decline the request, and the [`RouteDefinition`] of the node it belongs to.
pub type RouteHandler = Arc<
    dyn Fn(&HandlerRequest, &mut HandlerResponse, &mut Next, &RouteDefinition) -> anyhow::Result<()>
        + Send
        + Sync,
>;

/// Handler plus OpenAPI operation metadata for one method of a node
///
/// The handler is optional: a documentation-only method is projected into
/// OpenAPI and the response registry but never mounted.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    #[serde(skip)]
    pub handler: Option<RouteHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Status code -> response object, in declaration order
    #[serde(
        default,
        deserialize_with = "deserialize_responses",
        skip_serializing_if = "Option::is_none"
    )]
    pub responses: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<Value>>,
}

impl MethodSpec {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HandlerRequest, &mut HandlerResponse, &mut Next, &RouteDefinition) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        Self {
            handler: Some(Arc::new(handler)),
            ..Self::default()
        }
    }

    /// A method with no handler, declared for documentation only
    pub fn documented() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    /// Declare a response for `code` with a plain description
    pub fn response(self, code: impl Into<String>, description: impl Into<String>) -> Self {
        let description: String = description.into();
        self.response_object(code, serde_json::json!({ "description": description }))
    }

    pub fn response_object(mut self, code: impl Into<String>, object: Value) -> Self {
        self.responses
            .get_or_insert_with(Map::new)
            .insert(code.into(), object);
        self
    }

    pub fn parameter(mut self, parameter: Value) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn request_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn security(mut self, requirement: Value) -> Self {
        self.security.get_or_insert_with(Vec::new).push(requirement);
        self
    }

    /// Declared status codes in declaration order
    pub fn response_codes(&self) -> Vec<String> {
        self.responses
            .as_ref()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Response map whose status codes may be written as YAML integers (`200:`)
struct Responses(Map<String, Value>);

/// A status code key, quoted or not
struct StatusCode(String);

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatusCodeVisitor;

        impl Visitor<'_> for StatusCodeVisitor {
            type Value = StatusCode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a status code such as 200 or \"default\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<StatusCode, E> {
                Ok(StatusCode(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<StatusCode, E> {
                Ok(StatusCode(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<StatusCode, E> {
                Ok(StatusCode(v.to_string()))
            }
        }

        deserializer.deserialize_any(StatusCodeVisitor)
    }
}

impl<'de> Deserialize<'de> for Responses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResponsesVisitor;

        impl<'de> Visitor<'de> for ResponsesVisitor {
            type Value = Responses;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of status codes to response objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Responses, A::Error> {
                let mut responses = Map::new();
                while let Some((code, response)) = access.next_entry::<StatusCode, serde_json::Value>()? {
                    responses.insert(code.0, response);
                }
                Ok(Responses(responses))
            }
        }

        deserializer.deserialize_map(ResponsesVisitor)
    }
}

fn deserialize_responses<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Map<String, Value>>, D::Error> {
    Ok(Option::<Responses>::deserialize(deserializer)?.map(|r| r.0))
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("handler", &self.handler.is_some())
            .field("summary", &self.summary)
            .field("operation_id", &self.operation_id)
            .field("responses", &self.response_codes())
            .finish_non_exhaustive()
    }
}

/// One element of the declarative route tree
///
/// `path` is declared in placeholder notation relative to the parent. Nodes
/// without a `name` are never registered for reverse routing but still mount
/// their handlers and pass their path on to their children.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RouteNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(skip)]
    pub middleware: Vec<Arc<dyn Middleware>>,
    #[serde(default, alias = "children", skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteNode>,
    #[serde(flatten)]
    pub methods: MethodTable<MethodSpec>,
    /// Node-level OpenAPI parameters, shared by every method of the node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RouteNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn route(mut self, child: RouteNode) -> Self {
        self.routes.push(child);
        self
    }

    pub fn routes(mut self, children: impl IntoIterator<Item = RouteNode>) -> Self {
        self.routes.extend(children);
        self
    }

    pub fn method(mut self, method: RouteMethod, spec: MethodSpec) -> Self {
        self.methods.set(method, spec);
        self
    }

    pub fn get(self, spec: MethodSpec) -> Self {
        self.method(RouteMethod::Get, spec)
    }

    pub fn post(self, spec: MethodSpec) -> Self {
        self.method(RouteMethod::Post, spec)
    }

    pub fn put(self, spec: MethodSpec) -> Self {
        self.method(RouteMethod::Put, spec)
    }

    pub fn delete(self, spec: MethodSpec) -> Self {
        self.method(RouteMethod::Delete, spec)
    }

    pub fn options(self, spec: MethodSpec) -> Self {
        self.method(RouteMethod::Options, spec)
    }

    pub fn parameter(mut self, parameter: Value) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("middleware", &self.middleware.len())
            .field("methods", &self.methods)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}
