//! Radix tree for route matching
//!
//! Paths are split into `/`-separated segments; empty segments are ignored, so
//! `/pets//dogs/` and `/pets/dogs` address the same node.
//!
//! - Static segments (e.g., `users`) match exactly
//! - Parameter segments (e.g., `:id`) match any single segment
//! - Routes are stored at terminal nodes, per method, in registration order
//!
//! Unlike a first-match router, [`RadixNode::collect`] returns every route that
//! matches, ordered so that static branches come before parameter branches at
//! each depth. The dispatcher walks that list when a handler passes.

use std::borrow::Cow;
use std::sync::Arc;

use super::core::{ParamVec, RouteEntry};
use crate::tree::{MethodTable, RouteMethod};

/// Node in the radix tree
#[derive(Clone, Default)]
pub(crate) struct RadixNode {
    /// The path segment this node represents (without leading /)
    segment: Cow<'static, str>,
    /// Parameter name if this segment is a path parameter (`:id` -> `id`)
    param_name: Option<Arc<str>>,
    /// Routes terminating here, per method
    routes: MethodTable<Vec<Arc<RouteEntry>>>,
    children: Vec<RadixNode>,
    /// Parameter children; several names may share a position
    /// (`/users/:id/posts` vs `/users/:user_id/comments`)
    param_children: Vec<RadixNode>,
}

pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// `:name` -> `name`; everything else is static
fn param_marker(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

impl RadixNode {
    fn new(segment: &str) -> Self {
        Self {
            segment: Cow::Owned(segment.to_string()),
            ..Self::default()
        }
    }

    fn new_param(param_name: &str) -> Self {
        Self {
            param_name: Some(Arc::from(param_name)),
            ..Self::default()
        }
    }

    /// Insert a route under the remaining segments
    pub fn insert(&mut self, segments: &[&str], method: RouteMethod, route: Arc<RouteEntry>) {
        let Some((segment, remaining)) = segments.split_first() else {
            match self.routes.get_mut(method) {
                Some(existing) => existing.push(route),
                None => {
                    self.routes.set(method, vec![route]);
                }
            }
            return;
        };

        if let Some(param_name) = param_marker(segment) {
            if let Some(child) = self
                .param_children
                .iter_mut()
                .find(|c| c.param_name.as_deref() == Some(param_name))
            {
                child.insert(remaining, method, route);
                return;
            }
            let mut child = RadixNode::new_param(param_name);
            child.insert(remaining, method, route);
            self.param_children.push(child);
            return;
        }

        if let Some(child) = self.children.iter_mut().find(|c| c.segment == *segment) {
            child.insert(remaining, method, route);
            return;
        }
        let mut child = RadixNode::new(segment);
        child.insert(remaining, method, route);
        self.children.push(child);
    }

    /// Collect every route matching the remaining segments, most specific first
    pub fn collect(
        &self,
        segments: &[&str],
        method: RouteMethod,
        params: &mut ParamVec,
        out: &mut Vec<(Arc<RouteEntry>, ParamVec)>,
    ) {
        let Some((segment, remaining)) = segments.split_first() else {
            if let Some(routes) = self.routes.get(method) {
                out.extend(routes.iter().map(|r| (Arc::clone(r), params.clone())));
            }
            return;
        };

        for child in self.children.iter().filter(|c| c.segment == *segment) {
            child.collect(remaining, method, params, out);
        }

        for child in &self.param_children {
            if let Some(name) = &child.param_name {
                params.push((Arc::clone(name), (*segment).to_string()));
                child.collect(remaining, method, params, out);
                params.pop();
            }
        }
    }
}
