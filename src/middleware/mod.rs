//! # Middleware
//!
//! Request interceptors run by the router host around handlers. Middleware
//! registered on the outermost router sees every request; middleware declared
//! on a route node is scoped to that node and its descendants.
//!
//! - [`RouteContextMiddleware`] attaches the compiled registries to requests
//! - [`TracingMiddleware`] logs requests and outcomes
//! - [`MetricsMiddleware`] counts requests, latency and error classes
//! - [`RequestIdMiddleware`] propagates `x-request-id`
//!
//! Ad-hoc middleware can be written as a closure with [`from_fn`]:
//!
//! ```rust
//! use routetree::dispatcher::HandlerResponse;
//! use routetree::middleware::from_fn;
//!
//! let deny = from_fn(|req| {
//!     req.get_header("authorization")
//!         .is_none()
//!         .then(|| HandlerResponse::error(401, "Unauthorized"))
//! });
//! # let _ = deny;
//! ```

mod context;
mod core;
mod metrics;
mod request_id;
mod tracing;

pub use context::RouteContextMiddleware;
pub use core::{from_fn, FnMiddleware, Middleware};
pub use metrics::MetricsMiddleware;
pub use request_id::{RequestIdMiddleware, REQUEST_ID_HEADER};
pub use tracing::TracingMiddleware;
