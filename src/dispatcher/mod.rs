//! # Dispatcher Module
//!
//! Request and response types shared by middleware and handlers, and the
//! pipeline [`crate::router::Router::handle`] runs for each request.
//!
//! ## Pipeline
//!
//! 1. Host-level middleware `before` hooks, in registration order. A hook that
//!    returns a response ends the request there.
//! 2. Each matching route, most specific first: the scoped middleware that has
//!    not yet run for this request, then the handler with a fresh
//!    [`HandlerResponse`] and [`Next`].
//! 3. A handler that calls [`Next::pass`] declines; the next route is tried.
//!    When no route is left the response is `404`.
//! 4. `after` hooks of every middleware whose `before` ran, once each, with the
//!    latency.
//!
//! Handler errors become `500` responses carrying the error message. Panics
//! are caught and become a bare `500`; the host keeps serving.
//!
//! ## Handler Context
//!
//! Once a compiled tree's context middleware has run, every request carries
//! the tree's registries in [`HandlerRequest::context`]:
//!
//! ```rust
//! use http::Method;
//! use routetree::{compile_router, HandlerRequest, MethodSpec, RouteMethod, RouteNode};
//! use serde_json::json;
//!
//! let tree = vec![RouteNode::new("/pets/{id|number}")
//!     .named("pets")
//!     .get(MethodSpec::new(|req, res, _next, _def| {
//!         let url = req.context.reverse("pets-dogs", [("id", 7)]);
//!         let codes = req.context.allowed_codes("pets", RouteMethod::Get);
//!         res.send_json(200, json!({ "dogs": url, "codes": codes }));
//!         Ok(())
//!     }).response("200", "ok"))
//!     .route(RouteNode::new("/dogs").named("dogs"))];
//!
//! let router = compile_router(&tree).unwrap();
//! let res = router.handle(HandlerRequest::new(Method::GET, "/pets/1"));
//! assert_eq!(res.body["dogs"], "/pets/7/dogs");
//! assert_eq!(res.body["codes"], json!(["200"]));
//! ```

mod core;

pub use core::{
    HandlerRequest, HandlerResponse, HeaderVec, HostHandler, Next, RequestContext,
    MAX_INLINE_HEADERS,
};
pub(crate) use core::dispatch;
