//! Request pipeline of the bundled router host.
//!
//! Host middleware runs first, then each candidate route in precedence order:
//! its scoped middleware not yet run for the request, then its handler. A handler that calls
//! [`Next::pass`] declines the request and the next candidate is tried.

use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use crate::tree::{ResponseRegistry, RouteDefinition, RouteMethod, RouteRegistry};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage; names are shared `Arc<str>`
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Handler as registered on a host: the route's definition is already bound
pub type HostHandler = Arc<
    dyn Fn(&HandlerRequest, &mut HandlerResponse, &mut Next) -> anyhow::Result<()> + Send + Sync,
>;

/// Registries attached to every request by the compiled tree
///
/// Both are empty until the context middleware installed by
/// [`crate::compiler::compile`] has run.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub route_definitions: Option<Arc<RouteRegistry>>,
    pub allowed_response_codes: Option<Arc<ResponseRegistry>>,
}

impl RequestContext {
    pub fn route_definition(&self, name: &str) -> Option<&RouteDefinition> {
        self.route_definitions.as_deref()?.get(name)
    }

    /// Reverse-route `name` with the given values
    pub fn reverse<I, K, V>(&self, name: &str, values: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        self.route_definition(name).map(|def| def.reverse(values))
    }

    pub fn allowed_codes(&self, name: &str, method: RouteMethod) -> Option<&[String]> {
        self.allowed_response_codes.as_deref()?.codes(name, method)
    }
}

/// Request data handed to middleware and handlers
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Path parameters captured by the matched route
    pub path_params: ParamVec,
    /// Decoded query string parameters
    pub query_params: ParamVec,
    pub headers: HeaderVec,
    pub body: Option<Value>,
    pub context: RequestContext,
}

impl HandlerRequest {
    /// Build a request from a method and a `path?query` URI
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };
        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            path_params: ParamVec::new(),
            query_params: parse_query(query),
            headers: HeaderVec::new(),
            body: None,
            context: RequestContext::default(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a path parameter by name
    ///
    /// Last write wins when a name repeats at different depths.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Note: allocates; prefer [`get_path_param`](Self::get_path_param)
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

fn parse_query(query: &str) -> ParamVec {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (Arc::from(decode(key).as_str()), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Response filled in by handlers
///
/// Starts as `200` with a `null` body.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl Default for HandlerResponse {
    fn default() -> Self {
        Self::new(200, HeaderVec::new(), Value::Null)
    }
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a content-type header
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut response = Self::default();
        response.send_json(status, body);
        response
    }

    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Replace status and body in place, marking the body as JSON
    pub fn send_json(&mut self, status: u16, body: Value) {
        self.status = status;
        self.body = body;
        self.set_header("content-type", "application/json".to_string());
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// `302 Found` pointing at `location`
    pub fn redirect(&mut self, location: impl Into<String>) {
        self.status = 302;
        self.set_header("location", location.into());
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header (case-insensitive)
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Continuation handed to handlers
///
/// Calling [`pass`](Self::pass) declines the request: whatever the handler
/// wrote to the response is discarded and the next matching route runs.
#[derive(Debug, Default)]
pub struct Next {
    passed: bool,
}

impl Next {
    pub fn pass(&mut self) {
        self.passed = true;
    }

    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.passed
    }
}

/// Run one request through host middleware and the candidate routes.
pub(crate) fn dispatch(
    middlewares: &[Arc<dyn Middleware>],
    candidates: Vec<RouteMatch>,
    mut request: HandlerRequest,
) -> HandlerResponse {
    let start = Instant::now();
    let (ran, early) = run_before(middlewares, &mut request);
    let mut response = match early {
        Some(response) => response,
        None => run_candidates(candidates, &mut request),
    };
    let latency = start.elapsed();
    for mw in &middlewares[..ran] {
        mw.after(&request, &mut response, latency);
    }
    info!(
        request_id = %request.request_id,
        method = %request.method,
        path = %request.path,
        status = response.status,
        latency_us = latency.as_micros() as u64,
        "Request completed"
    );
    response
}

/// Run `before` hooks until one answers; returns how many ran
fn run_before(
    middlewares: &[Arc<dyn Middleware>],
    request: &mut HandlerRequest,
) -> (usize, Option<HandlerResponse>) {
    for (idx, mw) in middlewares.iter().enumerate() {
        if let Some(response) = mw.before(request) {
            debug!(
                request_id = %request.request_id,
                middleware_idx = idx,
                middleware_name = std::any::type_name_of_val(mw.as_ref()),
                "Middleware returned early response"
            );
            return (idx + 1, Some(response));
        }
    }
    (middlewares.len(), None)
}

/// Try each candidate in turn. Scoped middleware shared between candidates
/// runs once; `after` hooks run once on the final response.
fn run_candidates(candidates: Vec<RouteMatch>, request: &mut HandlerRequest) -> HandlerResponse {
    let start = Instant::now();
    let total = candidates.len();
    let mut entered: Vec<Arc<dyn Middleware>> = Vec::new();
    let mut answered = None;
    for (idx, candidate) in candidates.into_iter().enumerate() {
        request.path_params = candidate.path_params.clone();
        let fresh: Vec<Arc<dyn Middleware>> = candidate
            .middleware
            .iter()
            .filter(|mw| !entered.iter().any(|seen| same_middleware(seen, mw)))
            .map(Arc::clone)
            .collect();
        let (ran, early) = run_before(&fresh, request);
        entered.extend(fresh.into_iter().take(ran));
        answered = early.or_else(|| invoke(&candidate, request));
        if answered.is_some() {
            break;
        }
        debug!(
            request_id = %request.request_id,
            pattern = %candidate.pattern,
            candidate = idx + 1,
            candidates = total,
            "Handler passed, trying next route"
        );
    }
    let mut response = answered.unwrap_or_else(|| {
        request.path_params.clear();
        HandlerResponse::error(404, "Not Found")
    });
    let latency = start.elapsed();
    for mw in &entered {
        mw.after(request, &mut response, latency);
    }
    response
}

fn same_middleware(a: &Arc<dyn Middleware>, b: &Arc<dyn Middleware>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// `None` when the handler passed
fn invoke(candidate: &RouteMatch, request: &HandlerRequest) -> Option<HandlerResponse> {
    let mut response = HandlerResponse::default();
    let mut next = Next::default();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        (candidate.handler)(request, &mut response, &mut next)
    }));
    match result {
        Ok(Ok(())) if next.is_passed() => None,
        Ok(Ok(())) => Some(response),
        Ok(Err(err)) => {
            error!(
                request_id = %request.request_id,
                pattern = %candidate.pattern,
                error = %err,
                "Handler returned error"
            );
            Some(HandlerResponse::error(500, &err.to_string()))
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(
                request_id = %request.request_id,
                pattern = %candidate.pattern,
                panic = %message,
                "Handler panicked"
            );
            Some(HandlerResponse::error(500, "Internal Server Error"))
        }
    }
}
