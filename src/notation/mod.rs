//! # Path Notation
//!
//! Route paths are declared once, in a dialect-neutral notation, and rendered
//! into whichever dialect a consumer needs:
//!
//! | Declared                         | [`Dialect::Framework`]       | [`Dialect::OpenApi`]           |
//! |----------------------------------|------------------------------|--------------------------------|
//! | `/pets/{breed\|string}/details`  | `/pets/:breed/details`       | `/pets/{breed}/details`        |
//! | `/pets/{id}` (no `\|`)           | `/pets/{id}`                 | `/pets/{id}`                   |
//!
//! A placeholder segment is a whole `/`-separated segment wrapped in braces
//! whose body contains a `|`. The identifier is everything before the first
//! `|`, the type token everything after it. Segments that merely look like
//! placeholders are passed through verbatim; [`crate::lint`] reports them.
//!
//! ## Example
//!
//! ```rust
//! use routetree::notation::{translate, Dialect};
//!
//! let declared = "/pets/{breed|string}/{id|number}/details";
//! assert_eq!(translate(declared, Dialect::Framework), "/pets/:breed/:id/details");
//! assert_eq!(translate(declared, Dialect::OpenApi), "/pets/{breed}/{id}/details");
//! ```

mod core;

pub use core::{
    extract_openapi_parameters, placeholder, translate, Dialect, ParameterSchema, PathParameter,
    Placeholder,
};
