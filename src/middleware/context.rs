use std::sync::Arc;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::tree::{ResponseRegistry, RouteRegistry};

/// Attaches the compiled registries to every request's context
///
/// Installed once, first, on the outermost host by
/// [`crate::compiler::compile`]; handlers see the registries of the whole tree
/// regardless of where they are mounted.
pub struct RouteContextMiddleware {
    route_definitions: Arc<RouteRegistry>,
    allowed_response_codes: Arc<ResponseRegistry>,
}

impl RouteContextMiddleware {
    pub fn new(
        route_definitions: Arc<RouteRegistry>,
        allowed_response_codes: Arc<ResponseRegistry>,
    ) -> Self {
        Self {
            route_definitions,
            allowed_response_codes,
        }
    }
}

impl Middleware for RouteContextMiddleware {
    fn before(&self, req: &mut HandlerRequest) -> Option<HandlerResponse> {
        req.context.route_definitions = Some(Arc::clone(&self.route_definitions));
        req.context.allowed_response_codes = Some(Arc::clone(&self.allowed_response_codes));
        None
    }
}
