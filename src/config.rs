//! Configuration loaded from the environment
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `ROUTETREE_OPENAPI_PATH` | `openapi.json` | where generated OpenAPI documents are written |
//! | `ROUTETREE_STRICT_NAMES` | `false` | reject trees with colliding route names |
//!
//! CLI flags take precedence over these values.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_OPENAPI_OUTPUT: &str = "openapi.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTreeConfig {
    /// Target for [`crate::openapi::generate`] when none is given
    pub openapi_output: PathBuf,
    /// Fail compilation on fully-qualified name collisions instead of warning
    pub strict_names: bool,
}

impl Default for RouteTreeConfig {
    fn default() -> Self {
        Self {
            openapi_output: PathBuf::from(DEFAULT_OPENAPI_OUTPUT),
            strict_names: false,
        }
    }
}

impl RouteTreeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            openapi_output: lookup("ROUTETREE_OPENAPI_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.openapi_output),
            strict_names: lookup("ROUTETREE_STRICT_NAMES")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.strict_names),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
