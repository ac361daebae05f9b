//! # CLI Module
//!
//! Command-line access to a route manifest (a JSON or YAML file holding a
//! route tree without handlers).
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List every named route with its framework path and parameters:
//!
//! ```bash
//! routetree routes --manifest routes.yaml
//! routetree routes --manifest routes.yaml --json
//! ```
//!
//! ### `reverse`
//!
//! Build a concrete URL for a named route:
//!
//! ```bash
//! routetree reverse --manifest routes.yaml pets-dogs --param id=42
//! ```
//!
//! ### `responses`
//!
//! Print the declared status codes per route and method as JSON.
//!
//! ### `openapi`
//!
//! Project the manifest into an OpenAPI document:
//!
//! ```bash
//! routetree openapi --manifest routes.yaml --doc skeleton.yaml --output openapi.yaml
//! ```
//!
//! Without `--output` the document goes to `ROUTETREE_OPENAPI_PATH`
//! (default `openapi.json`); `--stdout` prints it instead.
//!
//! ### `lint`
//!
//! Check the manifest for declarations that probably do not do what was meant:
//!
//! ```bash
//! routetree lint --manifest routes.yaml --fail-on-error
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
