use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use super::{MethodTable, RouteDefinition, RouteMethod, RouteNode};
use crate::notation::{translate, Dialect};

/// Accumulated position of a node within the tree
///
/// `name` is the dash-joined name chain (absent below an unnamed node),
/// `declared` the raw concatenation of ancestor paths in placeholder notation
/// and `path` that concatenation translated to the framework dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Scope {
    pub name: Option<String>,
    pub path: String,
    pub declared: String,
}

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    /// Scope of `node` when declared beneath `self`
    pub fn enter(&self, node: &RouteNode) -> Self {
        let name = node.name.as_deref().map(|own| match &self.name {
            Some(prefix) => format!("{prefix}-{own}"),
            None => own.to_string(),
        });
        let declared = format!("{}{}", self.declared, node.path);
        Self {
            name,
            path: translate(&declared, Dialect::Framework),
            declared,
        }
    }
}

/// Flat name -> [`RouteDefinition`] map for a whole tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRegistry {
    entries: HashMap<String, Arc<RouteDefinition>>,
}

impl RouteRegistry {
    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.entries.get(name).map(|d| d.as_ref())
    }

    /// Shared handle to a definition, as handed to handlers
    pub fn get_shared(&self, name: &str) -> Option<Arc<RouteDefinition>> {
        self.entries.get(name).map(Arc::clone)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definitions sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &RouteDefinition> + '_ {
        self.names()
            .into_iter()
            .filter_map(move |name| self.get(name))
    }

    /// Reverse-route by name; `None` when the name is unknown
    pub fn reverse<I, K, V>(&self, name: &str, values: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        self.get(name).map(|def| def.reverse(values))
    }
}

impl Serialize for RouteRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted: BTreeMap<&str, &RouteDefinition> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_ref()))
            .collect();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (name, def) in sorted {
            map.serialize_entry(name, def)?;
        }
        map.end()
    }
}

/// Response codes each named route declares, per method
pub type MethodCodes = MethodTable<Vec<String>>;

/// Flat name -> method -> declared status codes map for a whole tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseRegistry {
    entries: HashMap<String, MethodCodes>,
}

impl ResponseRegistry {
    pub fn get(&self, name: &str) -> Option<&MethodCodes> {
        self.entries.get(name)
    }

    /// Declared codes for `name` + `method`, in declaration order
    pub fn codes(&self, name: &str, method: RouteMethod) -> Option<&[String]> {
        self.get(name)
            .and_then(|table| table.get(method))
            .map(Vec::as_slice)
    }

    pub fn is_allowed(&self, name: &str, method: RouteMethod, code: &str) -> bool {
        self.codes(name, method)
            .is_some_and(|codes| codes.iter().any(|c| c == code))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResponseRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted: BTreeMap<&String, &MethodCodes> = self.entries.iter().collect();
        sorted.serialize(serializer)
    }
}

/// Walk the tree and register every named node under its fully-qualified name.
///
/// A node's own entry replaces any same-named entry contributed by its
/// descendants; between siblings the later one wins. Unnamed nodes are not
/// registered but their children still inherit their path.
pub fn build_registry(nodes: &[RouteNode]) -> RouteRegistry {
    let mut entries = HashMap::new();
    collect_definitions(nodes, &Scope::root(), &mut entries);
    debug!(routes_count = entries.len(), "Built route registry");
    RouteRegistry { entries }
}

fn collect_definitions(
    nodes: &[RouteNode],
    parent: &Scope,
    out: &mut HashMap<String, Arc<RouteDefinition>>,
) {
    for node in nodes {
        let scope = parent.enter(node);
        let mut level = HashMap::new();
        collect_definitions(&node.routes, &scope, &mut level);
        if let Some(name) = &scope.name {
            let def = RouteDefinition::build(name.as_str(), scope.path.as_str());
            level.insert(name.clone(), Arc::new(def));
        }
        merge_level(out, level);
    }
}

/// Walk the tree and record, for every named node, the status codes each of
/// its methods declares.
///
/// Named nodes always get an entry, possibly with no methods. A method is
/// listed only when it declares a `responses` map.
pub fn build_response_registry(nodes: &[RouteNode]) -> ResponseRegistry {
    let mut entries = HashMap::new();
    collect_responses(nodes, &Scope::root(), &mut entries);
    debug!(routes_count = entries.len(), "Built response registry");
    ResponseRegistry { entries }
}

fn collect_responses(nodes: &[RouteNode], parent: &Scope, out: &mut HashMap<String, MethodCodes>) {
    for node in nodes {
        let scope = parent.enter(node);
        let mut level = HashMap::new();
        collect_responses(&node.routes, &scope, &mut level);
        if let Some(name) = &scope.name {
            let mut codes = MethodTable::new();
            for (method, spec) in node.methods.iter() {
                if spec.responses.is_some() {
                    codes.set(method, spec.response_codes());
                }
            }
            level.insert(name.clone(), codes);
        }
        merge_level(out, level);
    }
}

fn merge_level<V>(out: &mut HashMap<String, V>, level: HashMap<String, V>) {
    out.extend(level);
}

/// Every named node as `(qualified name, framework path)`, in declaration order
pub(crate) fn named_routes(nodes: &[RouteNode]) -> Vec<(String, String)> {
    fn walk(nodes: &[RouteNode], parent: &Scope, out: &mut Vec<(String, String)>) {
        for node in nodes {
            let scope = parent.enter(node);
            if let Some(name) = &scope.name {
                out.push((name.clone(), scope.path.clone()));
            }
            walk(&node.routes, &scope, out);
        }
    }
    let mut out = Vec::new();
    walk(nodes, &Scope::root(), &mut out);
    out
}

/// Qualified names declared by more than one node, with every path they were
/// declared at
pub fn name_collisions(nodes: &[RouteNode]) -> Vec<(String, Vec<String>)> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, path) in named_routes(nodes) {
        grouped.entry(name).or_default().push(path);
    }
    grouped
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MethodSpec;

    #[test]
    fn test_scope_concatenates_and_translates() {
        let node = RouteNode::new("/pets/{id|number}").named("pets");
        let scope = Scope::root().enter(&node);
        assert_eq!(scope.name.as_deref(), Some("pets"));
        assert_eq!(scope.path, "/pets/:id");
        assert_eq!(scope.declared, "/pets/{id|number}");

        let child = scope.enter(&RouteNode::new("/dogs").named("dogs"));
        assert_eq!(child.name.as_deref(), Some("pets-dogs"));
        assert_eq!(child.path, "/pets/:id/dogs");
    }

    #[test]
    fn test_scope_translates_after_concatenating() {
        let parent = Scope::root().enter(&RouteNode::new("/pets"));
        let glued = parent.enter(&RouteNode::new("{id|number}"));
        assert_eq!(glued.declared, "/pets{id|number}");
        assert_eq!(glued.path, "/pets{id|number}");

        let separated = parent.enter(&RouteNode::new("/{id|number}"));
        assert_eq!(separated.path, "/pets/:id");
    }

    #[test]
    fn test_unnamed_scope_drops_name() {
        let parent = Scope::root().enter(&RouteNode::new("/a").named("a"));
        let unnamed = parent.enter(&RouteNode::new("/b"));
        assert_eq!(unnamed.name, None);
        let child = unnamed.enter(&RouteNode::new("/c").named("c"));
        assert_eq!(child.name.as_deref(), Some("c"));
        assert_eq!(child.path, "/a/b/c");
    }

    #[test]
    fn test_own_entry_beats_descendant() {
        // child "x" beneath unnamed "/inner" qualifies to "x", same as the outer node
        let tree = vec![RouteNode::new("/outer")
            .named("x")
            .route(RouteNode::new("/inner").route(RouteNode::new("/deep").named("x")))];
        let registry = build_registry(&tree);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").unwrap().path(), "/outer");
    }

    #[test]
    fn test_later_sibling_wins() {
        let tree = vec![
            RouteNode::new("/first").named("dup"),
            RouteNode::new("/second").named("dup"),
        ];
        let registry = build_registry(&tree);
        assert_eq!(registry.get("dup").unwrap().path(), "/second");
        assert_eq!(
            name_collisions(&tree),
            vec![(
                "dup".to_string(),
                vec!["/first".to_string(), "/second".to_string()]
            )]
        );
    }

    #[test]
    fn test_responses_only_for_methods_declaring_them() {
        let tree = vec![RouteNode::new("/items")
            .named("items")
            .get(MethodSpec::documented().response("200", "ok"))
            .post(MethodSpec::documented())
            .delete(empty_responses())];
        let registry = build_response_registry(&tree);
        let items = registry.get("items").unwrap();
        assert_eq!(items.get(RouteMethod::Get).unwrap(), &vec!["200".to_string()]);
        assert!(items.get(RouteMethod::Post).is_none());
        assert_eq!(registry.codes("items", RouteMethod::Delete), Some(&[][..]));
        assert!(registry.is_allowed("items", RouteMethod::Get, "200"));
        assert!(!registry.is_allowed("items", RouteMethod::Get, "404"));
    }

    #[test]
    fn test_named_node_without_responses_has_empty_entry() {
        let tree = vec![RouteNode::new("/quiet").named("quiet")];
        let registry = build_response_registry(&tree);
        assert!(registry.get("quiet").unwrap().is_empty());
    }

    fn empty_responses() -> MethodSpec {
        let mut spec = MethodSpec::documented();
        spec.responses = Some(serde_json::Map::new());
        spec
    }
}
