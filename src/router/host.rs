use std::sync::Arc;

use crate::dispatcher::HostHandler;
use crate::middleware::Middleware;
use crate::tree::RouteMethod;

/// What the dispatch compiler needs from a router
///
/// Paths handed to a host are in the framework dialect (`/pets/:id`) and are
/// relative to wherever the host is eventually mounted.
pub trait RouterHost: Sized {
    /// A fresh, empty host of the same kind, to be mounted later
    fn sub_router(&self) -> Self;

    /// Run `middleware` for every request reaching this host, in registration order
    fn register_middleware(&mut self, middleware: Arc<dyn Middleware>);

    fn register_route(&mut self, method: RouteMethod, path: &str, handler: HostHandler);

    /// Serve everything registered on `sub` beneath `path`
    fn mount_sub_router(&mut self, path: &str, sub: Self);
}
