use http::Method;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::radix::{split_segments, RadixNode};
use super::RouterHost;
use crate::dispatcher::{self, HandlerRequest, HandlerResponse, HostHandler};
use crate::middleware::Middleware;
use crate::tree::RouteMethod;

/// Maximum number of path/query parameters before heap allocation
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage; names are shared `Arc<str>`
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A registered route with the middleware chain it inherited from the
/// sub-routers it was mounted through
pub(crate) struct RouteEntry {
    pub pattern: Arc<str>,
    pub middleware: Arc<[Arc<dyn Middleware>]>,
    pub handler: HostHandler,
}

/// A route matching a request, with the parameters it captured
#[derive(Clone)]
pub struct RouteMatch {
    pub method: RouteMethod,
    /// Registered pattern, e.g. `/pets/:id/dogs`
    pub pattern: Arc<str>,
    pub path_params: ParamVec,
    /// Scoped middleware, outermost first
    pub middleware: Arc<[Arc<dyn Middleware>]>,
    pub handler: HostHandler,
}

impl RouteMatch {
    /// Last write wins when a name repeats at different depths
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("path_params", &self.path_params)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// Bundled [`RouterHost`]: a radix-tree router with Express-style `:param`
/// patterns, scoped middleware and handler fall-through.
///
/// A `Router` is `Send + Sync`; share it behind an `Arc` across workers.
#[derive(Default)]
pub struct Router {
    middlewares: Vec<Arc<dyn Middleware>>,
    entries: Vec<(RouteMethod, Arc<RouteEntry>)>,
    root: RadixNode,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered `(method, pattern)` pairs in registration order
    pub fn routes(&self) -> Vec<(RouteMethod, &str)> {
        self.entries
            .iter()
            .map(|(method, entry)| (*method, entry.pattern.as_ref()))
            .collect()
    }

    /// Number of host-level middleware
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Every route matching `method` + `path`, most specific first
    pub fn candidates(&self, method: &Method, path: &str) -> Vec<RouteMatch> {
        let Some(route_method) = RouteMethod::from_http(method) else {
            return Vec::new();
        };
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let mut found = Vec::new();
        self.root.collect(
            &split_segments(path),
            route_method,
            &mut ParamVec::new(),
            &mut found,
        );
        found
            .into_iter()
            .map(|(entry, path_params)| RouteMatch {
                method: route_method,
                pattern: Arc::clone(&entry.pattern),
                path_params,
                middleware: Arc::clone(&entry.middleware),
                handler: Arc::clone(&entry.handler),
            })
            .collect()
    }

    /// The most specific route matching `method` + `path`
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let match_start = Instant::now();
        let result = self.candidates(method, path).into_iter().next();
        let match_duration = match_start.elapsed();

        match &result {
            Some(m) if match_duration > Duration::from_millis(1) => warn!(
                method = %method,
                path = %path,
                route_pattern = %m.pattern,
                duration_us = match_duration.as_micros() as u64,
                "Slow route matching detected"
            ),
            Some(m) => debug!(
                method = %method,
                path = %path,
                route_pattern = %m.pattern,
                path_params = ?m.path_params,
                duration_us = match_duration.as_micros() as u64,
                "Route matched"
            ),
            None => debug!(method = %method, path = %path, "No route matched"),
        }
        result
    }

    /// Run a request through host middleware and the matching routes.
    ///
    /// Unmatched requests get `404`, handler errors and panics `500`.
    pub fn handle(&self, request: HandlerRequest) -> HandlerResponse {
        let candidates = self.candidates(&request.method, &request.path);
        dispatcher::dispatch(&self.middlewares, candidates, request)
    }

    /// Log the routing table at `info`
    pub fn dump_routes(&self) {
        if self.entries.is_empty() {
            info!(routes_count = 0, "Routing table loaded with no routes");
            return;
        }
        info!(
            routes_count = self.entries.len(),
            middleware_count = self.middlewares.len(),
            "Routing table loaded"
        );
        for (method, entry) in &self.entries {
            info!(
                method = %method,
                pattern = %entry.pattern,
                scoped_middleware = entry.middleware.len(),
                "Route"
            );
        }
    }

    fn insert(&mut self, method: RouteMethod, entry: RouteEntry) {
        let entry = Arc::new(entry);
        debug!(
            method = %method,
            pattern = %entry.pattern,
            scoped_middleware = entry.middleware.len(),
            "Route registered"
        );
        self.root
            .insert(&split_segments(&entry.pattern), method, Arc::clone(&entry));
        self.entries.push((method, entry));
    }
}

impl RouterHost for Router {
    fn sub_router(&self) -> Self {
        Router::new()
    }

    fn register_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    fn register_route(&mut self, method: RouteMethod, path: &str, handler: HostHandler) {
        self.insert(
            method,
            RouteEntry {
                pattern: Arc::from(normalize(path)),
                middleware: Arc::from(Vec::new()),
                handler,
            },
        );
    }

    fn mount_sub_router(&mut self, path: &str, sub: Self) {
        debug!(
            prefix = %path,
            routes = sub.entries.len(),
            middleware = sub.middlewares.len(),
            "Mounting sub-router"
        );
        for (method, entry) in sub.entries {
            let middleware: Vec<Arc<dyn Middleware>> = sub
                .middlewares
                .iter()
                .chain(entry.middleware.iter())
                .map(Arc::clone)
                .collect();
            self.insert(
                method,
                RouteEntry {
                    pattern: Arc::from(join(path, &entry.pattern)),
                    middleware: Arc::from(middleware),
                    handler: Arc::clone(&entry.handler),
                },
            );
        }
    }
}

fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Mount `path` (relative to a sub-router) under `prefix`
fn join(prefix: &str, path: &str) -> String {
    let prefix = normalize(prefix);
    if path.is_empty() || path == "/" {
        return prefix;
    }
    format!("{}{}", prefix.trim_end_matches('/'), normalize(path))
}
