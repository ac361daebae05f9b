//! # Route Tree
//!
//! The declarative model every other module consumes. A tree is a list of
//! [`RouteNode`]s; each node declares a path segment in placeholder notation,
//! an optional name, optional middleware, per-method [`MethodSpec`]s and child
//! nodes.
//!
//! Two registries are derived from a tree:
//!
//! - [`build_registry`] flattens every named node into a [`RouteRegistry`] of
//!   [`RouteDefinition`]s keyed by the dash-joined chain of ancestor names
//!   (`pets` → `pets-dogs`), supporting reverse routing.
//! - [`build_response_registry`] records the status codes each named node
//!   declares per method in a [`ResponseRegistry`].
//!
//! ```rust
//! use routetree::tree::{build_registry, RouteNode};
//!
//! let tree = vec![RouteNode::new("/pets/{id|number}")
//!     .named("pets")
//!     .route(RouteNode::new("/dogs").named("dogs"))];
//!
//! let registry = build_registry(&tree);
//! let dogs = registry.get("pets-dogs").unwrap();
//! assert_eq!(dogs.path(), "/pets/:id/dogs");
//! assert_eq!(dogs.reverse([("id", 9)]), "/pets/9/dogs");
//! ```

mod build;
mod definition;
mod load;
mod types;

pub use build::{
    build_registry, build_response_registry, name_collisions, MethodCodes, ResponseRegistry,
    RouteRegistry,
};
pub(crate) use build::{named_routes, Scope};
pub use definition::{ReverseError, RouteDefinition};
pub use load::{load_manifest, parse_manifest};
pub(crate) use load::is_yaml;
pub use types::{MethodSpec, MethodTable, RouteHandler, RouteMethod, RouteNode};
