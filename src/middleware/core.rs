use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Request interceptor
///
/// `before` may annotate the request or answer it outright by returning a
/// response, which skips every later middleware and handler. `after` runs once
/// for each middleware whose `before` ran, in registration order. Scoped
/// middleware shared by several matching routes runs once per request even
/// when the first route passes.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &mut HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}

/// Middleware backed by a closure over `before`
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut HandlerRequest) -> Option<HandlerResponse> + Send + Sync,
{
    fn before(&self, req: &mut HandlerRequest) -> Option<HandlerResponse> {
        (self.f)(req)
    }
}

/// Wrap a closure as middleware
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&mut HandlerRequest) -> Option<HandlerResponse> + Send + Sync,
{
    FnMiddleware { f }
}
