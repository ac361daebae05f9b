//! # Route Tree Linter
//!
//! Checks a route tree for declarations that compile but probably do not do
//! what their author meant.
//!
//! ## Checks Performed
//!
//! 1. **missing_path** (Error) - node with an empty path; compilation rejects it
//! 2. **name_collision** (Warning) - two named nodes qualify to the same name
//! 3. **malformed_placeholder** (Warning) - a `{...}` segment the translator
//!    will pass through verbatim
//! 4. **invalid_identifier** (Warning) - placeholder identifier that is not a bare word
//! 5. **duplicate_parameter** (Warning) - the same identifier twice in one full path
//! 6. **unanchored_path** (Warning) - nested path without a leading `/`; the
//!    registry concatenates it as written while the router mounts it as a
//!    separate segment
//! 7. **documentation_only** (Info) - method declared without a handler
//!
//! ## Usage
//!
//! ```rust
//! use routetree::lint::{has_errors, lint_routes, render_lint_issues};
//! use routetree::RouteNode;
//!
//! let tree = vec![RouteNode::new("/pets").named("pets")];
//! let issues = lint_routes(&tree);
//! assert!(!has_errors(&issues));
//! eprintln!("{}", render_lint_issues(&issues));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::notation::placeholder;
use crate::tree::{name_collisions, RouteNode, Scope};


#[allow(clippy::expect_used)]
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex should be valid"));

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Compilation will fail
    Error,
    /// Compiles, but likely not as intended
    Warning,
    /// Worth knowing
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

/// A lint issue found in a route tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., `route:/pets/{id|number}`, `route:/pets/get`)
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., `name_collision`)
    pub kind: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Lint a route tree. Issues are reported in tree order, collisions last.
pub fn lint_routes(nodes: &[RouteNode]) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    lint_level(nodes, &Scope::root(), &mut issues);

    for (name, paths) in name_collisions(nodes) {
        issues.push(
            LintIssue::new(
                format!("name:{name}"),
                LintSeverity::Warning,
                "name_collision",
                format!(
                    "Route name '{name}' is declared {} times ({}); only the last one is reachable by name",
                    paths.len(),
                    paths.join(", ")
                ),
            )
            .with_suggestion("Rename one of the nodes or nest it under a different named parent"),
        );
    }
    issues
}

fn lint_level(nodes: &[RouteNode], parent: &Scope, issues: &mut Vec<LintIssue>) {
    for node in nodes {
        let scope = parent.enter(node);
        let location = format!("route:{}", scope.declared);

        if node.path.is_empty() {
            let what = node
                .name
                .as_deref()
                .map(|n| format!("Node '{n}'"))
                .unwrap_or_else(|| "Unnamed node".to_string());
            issues.push(
                LintIssue::new(
                    location.clone(),
                    LintSeverity::Error,
                    "missing_path",
                    format!("{what} has no path"),
                )
                .with_suggestion("Give every node a path; use \"/\" to mount at the parent's path"),
            );
        }

        if !node.path.is_empty() && !node.path.starts_with('/') && !parent.declared.is_empty() {
            issues.push(
                LintIssue::new(
                    location.clone(),
                    LintSeverity::Warning,
                    "unanchored_path",
                    format!(
                        "Path '{}' is joined to '{}' without a '/'; the registry path and the mounted path differ",
                        node.path, parent.declared
                    ),
                )
                .with_suggestion(format!("Start the path with '/': /{}", node.path)),
            );
        }

        lint_segments(&node.path, &location, issues);
        lint_duplicate_parameters(&parent.declared, &scope.declared, &location, issues);

        for (method, spec) in node.methods.iter() {
            if spec.handler.is_none() {
                issues.push(LintIssue::new(
                    format!("{location}/{method}"),
                    LintSeverity::Info,
                    "documentation_only",
                    format!("{} has no handler; it is documented but not mounted", method.as_str().to_uppercase()),
                ));
            }
        }

        lint_level(&node.routes, &scope, issues);
    }
}

fn lint_segments(path: &str, location: &str, issues: &mut Vec<LintIssue>) {
    for segment in path.split('/') {
        match placeholder(segment) {
            Some(p) if !IDENTIFIER.is_match(p.identifier) => issues.push(LintIssue::new(
                location,
                LintSeverity::Warning,
                "invalid_identifier",
                format!("Placeholder identifier '{}' is not a bare word", p.identifier),
            )),
            Some(_) => {}
            None if segment.starts_with('{') || segment.ends_with('}') => issues.push(
                LintIssue::new(
                    location,
                    LintSeverity::Warning,
                    "malformed_placeholder",
                    format!("Segment '{segment}' is not a placeholder and will be matched literally"),
                )
                .with_suggestion("Write placeholders as {identifier|type}, e.g. {id|number}"),
            ),
            None => {}
        }
    }
}

/// Reported at the node whose own path repeats an inherited identifier
fn lint_duplicate_parameters(
    parent_path: &str,
    full_path: &str,
    location: &str,
    issues: &mut Vec<LintIssue>,
) {
    let identifiers: Vec<&str> = full_path
        .split('/')
        .filter_map(placeholder)
        .map(|p| p.identifier)
        .collect();
    // gluing a path without a leading '/' can swallow the parent's last placeholder
    let inherited = parent_path
        .split('/')
        .filter_map(placeholder)
        .count()
        .min(identifiers.len());
    for (i, identifier) in identifiers.iter().enumerate().skip(inherited) {
        if identifiers[..i].contains(identifier) {
            issues.push(LintIssue::new(
                location,
                LintSeverity::Warning,
                "duplicate_parameter",
                format!("Parameter '{identifier}' appears more than once in {full_path}"),
            ));
        }
    }
}

pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Human-readable report grouped by severity
pub fn render_lint_issues(issues: &[LintIssue]) -> String {
    if issues.is_empty() {
        return "No lint issues found\n".to_string();
    }
    let count = |severity| issues.iter().filter(|i| i.severity == severity).count();
    let mut out = format!(
        "{} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );
    for severity in [LintSeverity::Error, LintSeverity::Warning, LintSeverity::Info] {
        for issue in issues.iter().filter(|i| i.severity == severity) {
            out.push_str(&format!("{severity} [{}] {}\n", issue.kind, issue.location));
            out.push_str(&format!("    {}\n", issue.message));
            if let Some(suggestion) = &issue.suggestion {
                out.push_str(&format!("    suggestion: {suggestion}\n"));
            }
        }
    }
    out
}
