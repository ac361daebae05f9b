//! # Router Module
//!
//! The router module is the host side of a compiled route tree: the
//! [`RouterHost`] capability the dispatch compiler targets, and [`Router`], the
//! bundled implementation.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Accepting middleware, per-method routes and mounted sub-routers
//! - Matching incoming requests against registered `:param` patterns
//! - Extracting path parameters from matched routes
//! - Running the request pipeline (see [`crate::dispatcher`])
//!
//! ## Architecture
//!
//! Sub-routers are flattened when mounted: each of their routes is re-inserted
//! into the parent with the mount prefix prepended and the sub-router's
//! middleware prepended to the route's own chain. Middleware registered on a
//! sub-router is therefore scoped to the routes beneath its mount point, while
//! middleware on the outermost router runs for every request, matched or not.
//!
//! Matching uses a radix tree keyed by path segment. Static segments are tried
//! before parameter segments at every depth, so `/pets/mine` wins over
//! `/pets/:id` for the request `/pets/mine`, and the parameter route remains
//! available as a fall-through candidate.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routetree::dispatcher::{HandlerRequest, HandlerResponse, HostHandler, Next};
//! use routetree::router::{Router, RouterHost};
//! use routetree::tree::RouteMethod;
//! use std::sync::Arc;
//!
//! fn show(req: &HandlerRequest, res: &mut HandlerResponse, _: &mut Next) -> anyhow::Result<()> {
//!     res.send_json(200, serde_json::json!({ "id": req.get_path_param("id") }));
//!     Ok(())
//! }
//!
//! let mut pets = Router::new();
//! let handler: HostHandler = Arc::new(show);
//! pets.register_route(RouteMethod::Get, "/:id", handler);
//!
//! let mut app = Router::new();
//! app.mount_sub_router("/pets", pets);
//!
//! let res = app.handle(HandlerRequest::new(Method::GET, "/pets/7"));
//! assert_eq!(res.body["id"], "7");
//! ```

mod core;
mod host;
mod radix;

pub use core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use host::RouterHost;
