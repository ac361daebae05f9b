//! # routetree
//!
//! **routetree** compiles one declarative route tree into everything an HTTP
//! service needs to know about its routes.
//!
//! ## Overview
//!
//! A tree is a list of [`RouteNode`]s. Each node declares a path in
//! placeholder notation (`/pets/{id|number}`), an optional name, optional
//! middleware, per-method [`MethodSpec`]s (a handler plus OpenAPI operation
//! fields) and child nodes. From that single declaration the crate derives:
//!
//! - a mounted router: every handler registered on a [`RouterHost`], with the
//!   node's middleware scoped to the node's subtree
//! - a flat name → [`RouteDefinition`] registry for reverse routing
//!   (`pets-dogs` → `/pets/:id/dogs` → `/pets/42/dogs`)
//! - a name → method → declared status codes registry
//! - an OpenAPI document built on a caller-supplied skeleton
//!
//! ## Architecture
//!
//! - **[`notation`]** - placeholder recognition and dialect translation
//! - **[`tree`]** - the route model, registries, reverse routing, manifests
//! - **[`compiler`]** - walks a tree and mounts it onto a host
//! - **[`router`]** - the bundled radix-tree [`Router`] and the [`RouterHost`] seam
//! - **[`dispatcher`]** - request/response types and the handler pipeline
//! - **[`middleware`]** - the middleware trait plus context, request-id,
//!   tracing and metrics middleware
//! - **[`openapi`]** - projection onto a document skeleton and output sinks
//! - **[`lint`]** - declaration checks
//! - **[`config`]** / **[`telemetry`]** - environment configuration and logging
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use routetree::{compile_router, HandlerRequest, MethodSpec, RouteNode};
//! use serde_json::json;
//!
//! let tree = vec![RouteNode::new("/pets/{id|number}")
//!     .named("pets")
//!     .get(MethodSpec::new(|req, res, _next, def| {
//!         res.send_json(200, json!({ "id": req.get_path_param("id"), "route": def.name() }));
//!         Ok(())
//!     }))
//!     .route(RouteNode::new("/dogs").named("dogs"))];
//!
//! let router = compile_router(&tree).unwrap();
//! let res = router.handle(HandlerRequest::new(Method::GET, "/pets/7"));
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body["id"], "7");
//! assert_eq!(res.body["route"], "pets");
//! ```
//!
//! ## Runtime Considerations
//!
//! Compilation is single-threaded and happens once. The compiled [`Router`]
//! and both registries are immutable and `Send + Sync`; share them behind
//! `Arc` across worker threads.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod lint;
pub mod middleware;
pub mod notation;
pub mod openapi;
pub mod router;
pub mod telemetry;
pub mod tree;

pub use compiler::{compile, compile_router, compile_with, CompileOptions, CompiledRoutes};
pub use dispatcher::{HandlerRequest, HandlerResponse, Next, RequestContext};
pub use error::CompileError;
pub use middleware::Middleware;
pub use notation::{extract_openapi_parameters, translate, Dialect};
pub use openapi::{generate, project, DocSkeleton};
pub use router::{Router, RouterHost};
pub use tree::{
    build_registry, build_response_registry, MethodSpec, ResponseRegistry, RouteDefinition,
    RouteMethod, RouteNode, RouteRegistry,
};
