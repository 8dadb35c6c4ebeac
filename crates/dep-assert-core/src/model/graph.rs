//! Scope-specific dependency graphs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::LocationMatcher;

/// The granularity a graph is built at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One node per package.
    #[default]
    Packages,
    /// One node per class.
    Classes,
}

impl Scope {
    /// Plural noun used in reports ("packages" / "classes").
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Packages => "packages",
            Self::Classes => "classes",
        }
    }

    /// Returns whether `matcher` selects the element called `name`.
    #[must_use]
    pub fn matches(self, matcher: &LocationMatcher, name: &str) -> bool {
        match self {
            Self::Packages => matcher.matches_package(name),
            Self::Classes => matcher.matches_class(name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// A graph element: a package or a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    package: String,
    uses: BTreeMap<String, BTreeSet<String>>,
}

impl Node {
    pub(crate) fn new(name: &str, package: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            uses: BTreeMap::new(),
        }
    }

    /// Qualified name of the element.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning package. For package nodes this is the node's own name.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Returns whether this element uses `target`.
    #[must_use]
    pub fn uses(&self, target: &str) -> bool {
        self.uses.contains_key(target)
    }

    /// Names of all elements this element uses, in name order.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.uses.keys().map(String::as_str)
    }

    /// Members responsible for the usage of `target`.
    #[must_use]
    pub fn provenance(&self, target: &str) -> Option<&BTreeSet<String>> {
        self.uses.get(target)
    }

    pub(crate) fn record(&mut self, target: &str, via: impl IntoIterator<Item = String>) {
        self.uses.entry(target.to_string()).or_default().extend(via);
    }
}

/// An immutable dependency graph of one [`Scope`].
///
/// Nodes are kept in name order so every traversal is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    scope: Scope,
    nodes: BTreeMap<String, Node>,
}

impl Graph {
    pub(crate) fn new(scope: Scope) -> Self {
        Self {
            scope,
            nodes: BTreeMap::new(),
        }
    }

    pub(crate) fn node_mut(&mut self, name: &str, package: &str) -> &mut Node {
        self.nodes
            .entry(name.to_string())
            .or_insert_with(|| Node::new(name, package))
    }

    /// The scope this graph was built for.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// All nodes in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Looks up a node by name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of usage edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.uses.len()).sum()
    }

    /// Returns whether `from` uses `to`.
    #[must_use]
    pub fn uses(&self, from: &str, to: &str) -> bool {
        self.nodes.get(from).is_some_and(|n| n.uses(to))
    }

    /// Returns whether `matcher` selects `node` in this graph's scope.
    #[must_use]
    pub fn is_matched(&self, node: &Node, matcher: &LocationMatcher) -> bool {
        self.scope.matches(matcher, &node.name)
    }

    /// Nodes selected by `matcher`, in name order.
    pub fn matching<'a>(
        &'a self,
        matcher: &'a LocationMatcher,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes().filter(move |n| self.is_matched(n, matcher))
    }
}

/// Returns whether one class is lexically nested in the other
/// (`a.B` and `a.B$C`, at any depth, either direction).
#[must_use]
pub fn is_nested(a: &str, b: &str) -> bool {
    fn inside(inner: &str, outer: &str) -> bool {
        inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.starts_with('$'))
    }
    inside(a, b) || inside(b, a)
}
