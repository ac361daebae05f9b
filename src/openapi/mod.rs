//! # OpenAPI Projection
//!
//! Projects a route tree onto an OpenAPI document skeleton. Paths are keyed in
//! the OpenAPI dialect (`/pets/{id}`), and every `{identifier|type}`
//! placeholder becomes a required `in: path` parameter with a `type` schema.
//!
//! [`project`] is pure; [`generate`] projects and then publishes through a
//! [`DocumentationSink`], whose failures are logged and never returned.
//!
//! ```rust
//! use routetree::openapi::{project, DocSkeleton};
//! use routetree::tree::{MethodSpec, RouteNode};
//! use serde_json::json;
//!
//! let tree = vec![RouteNode::new("/pets/{id|number}")
//!     .get(MethodSpec::documented().summary("Fetch a pet").response("200", "ok"))];
//!
//! let doc = project(&DocSkeleton::new("3.0.0", json!({"title": "Pets", "version": "1"})), &tree);
//! let op = doc.operation("/pets/{id}", "get").unwrap();
//! assert_eq!(op["parameters"][0]["name"], "id");
//! assert_eq!(op["parameters"][0]["schema"]["type"], "number");
//! ```

mod load;
mod project;
mod sink;
mod types;

pub use load::load_skeleton;
pub use project::project;
pub use sink::{generate, generate_to_default, DocumentationSink, FileSink, LogSink};
pub use types::DocSkeleton;
