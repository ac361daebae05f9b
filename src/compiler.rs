//! # Dispatch Compiler
//!
//! Turns a route tree into registrations on a [`RouterHost`].
//!
//! Both registries are built once from the whole tree and attached to every
//! request by a host-level [`RouteContextMiddleware`]. Each node then becomes
//! its own sub-router, mounted on its parent at the node's framework-dialect
//! path:
//!
//! 1. node middleware is registered on the sub-router, so it only runs for the
//!    node and its descendants
//! 2. each method with a handler is registered at the sub-router root, bound
//!    to the node's [`RouteDefinition`]
//! 3. children are compiled into the sub-router
//!
//! Methods without a handler are documentation-only and are skipped.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::RouteTreeConfig;
use crate::dispatcher::{HandlerRequest, HandlerResponse, HostHandler, Next};
use crate::error::CompileError;
use crate::middleware::RouteContextMiddleware;
use crate::notation::{translate, Dialect};
use crate::router::{Router, RouterHost};
use crate::tree::{
    build_registry, build_response_registry, name_collisions, ResponseRegistry, RouteDefinition,
    RouteHandler, RouteNode, RouteRegistry, Scope,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject trees where two named nodes qualify to the same name
    pub strict_names: bool,
}

impl From<&RouteTreeConfig> for CompileOptions {
    fn from(config: &RouteTreeConfig) -> Self {
        Self {
            strict_names: config.strict_names,
        }
    }
}

/// Outcome of a successful compile
#[derive(Debug, Clone)]
pub struct CompiledRoutes {
    pub route_definitions: Arc<RouteRegistry>,
    pub allowed_response_codes: Arc<ResponseRegistry>,
    /// Number of (node, method) handlers registered
    pub handlers_registered: usize,
}

/// Compile `nodes` onto `host` with default options.
pub fn compile<H: RouterHost>(
    nodes: &[RouteNode],
    host: &mut H,
) -> Result<CompiledRoutes, CompileError> {
    compile_with(nodes, host, CompileOptions::default())
}

pub fn compile_with<H: RouterHost>(
    nodes: &[RouteNode],
    host: &mut H,
    options: CompileOptions,
) -> Result<CompiledRoutes, CompileError> {
    validate(nodes, "routes")?;

    let route_definitions = Arc::new(build_registry(nodes));

    for (name, paths) in name_collisions(nodes) {
        if options.strict_names {
            return Err(CompileError::NameCollision { name, paths });
        }
        warn!(
            name = %name,
            registered = route_definitions.get(&name).map(|d| d.path()).unwrap_or_default(),
            shadowed = ?shadowed_paths(&route_definitions, &name, &paths),
            "Route name declared more than once; handlers at the shadowed paths get an unregistered definition"
        );
    }
    let allowed_response_codes = Arc::new(build_response_registry(nodes));

    host.register_middleware(Arc::new(RouteContextMiddleware::new(
        Arc::clone(&route_definitions),
        Arc::clone(&allowed_response_codes),
    )));

    let mut handlers_registered = 0;
    compile_level(
        nodes,
        host,
        &Scope::root(),
        &route_definitions,
        &mut handlers_registered,
    );

    info!(
        named_routes = route_definitions.len(),
        handlers = handlers_registered,
        "Route tree compiled"
    );

    Ok(CompiledRoutes {
        route_definitions,
        allowed_response_codes,
        handlers_registered,
    })
}

/// Compile `nodes` into a fresh bundled [`Router`].
pub fn compile_router(nodes: &[RouteNode]) -> Result<Router, CompileError> {
    let mut router = Router::new();
    compile(nodes, &mut router)?;
    Ok(router)
}

fn validate(nodes: &[RouteNode], location: &str) -> Result<(), CompileError> {
    for (idx, node) in nodes.iter().enumerate() {
        let here = format!("{location}[{idx}]");
        if node.path.is_empty() {
            return Err(CompileError::MissingPath { location: here });
        }
        validate(&node.routes, &format!("{here}.routes"))?;
    }
    Ok(())
}

fn compile_level<H: RouterHost>(
    nodes: &[RouteNode],
    host: &mut H,
    parent: &Scope,
    registry: &RouteRegistry,
    handlers_registered: &mut usize,
) {
    for node in nodes {
        let scope = parent.enter(node);
        let mut sub = host.sub_router();

        for middleware in &node.middleware {
            sub.register_middleware(Arc::clone(middleware));
        }

        let definition = own_definition(&scope, registry);
        for (method, spec) in node.methods.iter() {
            let Some(handler) = &spec.handler else {
                debug!(method = %method, path = %scope.path, "Documentation-only method, not mounted");
                continue;
            };
            sub.register_route(method, "/", bind(handler, &definition));
            *handlers_registered += 1;
        }

        compile_level(&node.routes, &mut sub, &scope, registry, handlers_registered);

        host.mount_sub_router(&translate(&node.path, Dialect::Framework), sub);
    }
}

/// The registry entry for this node, or an anonymous definition when the node
/// is unnamed or its name was claimed by another node
fn own_definition(scope: &Scope, registry: &RouteRegistry) -> Arc<RouteDefinition> {
    scope
        .name
        .as_deref()
        .and_then(|name| registry.get_shared(name))
        .filter(|def| def.path() == scope.path)
        .unwrap_or_else(|| {
            Arc::new(RouteDefinition::build(
                scope.name.clone().unwrap_or_default(),
                scope.path.as_str(),
            ))
        })
}

/// Paths declared under `name` that lost the registry entry to another node
fn shadowed_paths<'a>(registry: &RouteRegistry, name: &str, paths: &'a [String]) -> Vec<&'a str> {
    let registered = registry.get(name).map(|d| d.path());
    paths
        .iter()
        .map(String::as_str)
        .filter(|path| Some(*path) != registered)
        .collect()
}

fn bind(handler: &RouteHandler, definition: &Arc<RouteDefinition>) -> HostHandler {
    let handler = Arc::clone(handler);
    let definition = Arc::clone(definition);
    Arc::new(
        move |req: &HandlerRequest, res: &mut HandlerResponse, next: &mut Next| {
            handler(req, res, next, &definition)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MethodSpec;

    #[test]
    fn test_validate_reports_location() {
        let tree = vec![
            RouteNode::new("/ok"),
            RouteNode::new("/parent").route(RouteNode::new("/a")).route(RouteNode::default()),
        ];
        let err = validate(&tree, "routes").unwrap_err();
        assert_eq!(
            err,
            CompileError::MissingPath {
                location: "routes[1].routes[1]".into()
            }
        );
    }

    #[test]
    fn test_own_definition_for_unnamed_node_is_anonymous() {
        let scope = Scope::root().enter(&RouteNode::new("/pets/{id|number}"));
        let def = own_definition(&scope, &RouteRegistry::default());
        assert!(def.is_anonymous());
        assert_eq!(def.path(), "/pets/:id");
    }

    #[test]
    fn test_shadowed_declaration_gets_unregistered_definition() {
        let tree = vec![
            RouteNode::new("/first").named("dup"),
            RouteNode::new("/second").named("dup"),
        ];
        let registry = build_registry(&tree);
        let paths = vec!["/first".to_string(), "/second".to_string()];
        assert_eq!(shadowed_paths(&registry, "dup", &paths), vec!["/first"]);

        let loser = own_definition(&Scope::root().enter(&tree[0]), &registry);
        assert_eq!(loser.name(), "dup");
        assert_eq!(loser.path(), "/first");
        assert_ne!(registry.get("dup").unwrap(), loser.as_ref());
    }

    #[test]
    fn test_strict_names_rejects_collision() {
        let tree = vec![
            RouteNode::new("/a").named("dup").get(MethodSpec::new(|_, _, _, _| Ok(()))),
            RouteNode::new("/b").named("dup"),
        ];
        let mut router = Router::new();
        let err = compile_with(&tree, &mut router, CompileOptions { strict_names: true })
            .unwrap_err();
        assert!(matches!(err, CompileError::NameCollision { ref name, .. } if name == "dup"));
        assert!(router.routes().is_empty());
        assert_eq!(router.middleware_count(), 0);
    }
}
