use thiserror::Error;

/// Faults that stop a route tree from compiling
///
/// Detected before the host is touched; a failed compile registers nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A node declares no path (or an empty one)
    #[error("route node at {location} has no path")]
    MissingPath { location: String },
    /// Two named nodes qualify to the same name (strict mode only)
    #[error("route name '{name}' is declared more than once: {}", paths.join(", "))]
    NameCollision { name: String, paths: Vec<String> },
}
