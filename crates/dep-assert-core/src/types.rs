//! Result types: dependency maps, per-rule results and findings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::model::Scope;

/// Kind of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A `must use` relation without a matching edge.
    Missing,
    /// An edge the rules forbid.
    Denied,
    /// A non-optional rule matching no element.
    NotExisting,
    /// An element no rule matches.
    Undefined,
    /// A dependency cycle.
    Cycle,
}

impl FindingKind {
    /// All kinds in report order.
    pub const ALL: [Self; 5] = [
        Self::Missing,
        Self::Denied,
        Self::NotExisting,
        Self::Undefined,
        Self::Cycle,
    ];
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Denied => write!(f, "denied"),
            Self::NotExisting => write!(f, "not-existing"),
            Self::Undefined => write!(f, "undefined"),
            Self::Cycle => write!(f, "cycle"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────
// DependencyMap
// ────────────────────────────────────────────────────────────────────

/// What is known about one edge of a [`DependencyMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeInfo {
    /// Concrete members responsible for the edge.
    pub vias: BTreeSet<String>,
    /// Specificity of the rule that recorded the edge.
    pub specificity: u32,
}

/// A set of edges `from → to`, each with provenance and specificity.
///
/// Inserting an edge twice unions the provenance and keeps the higher
/// specificity, so merging maps is order-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyMap {
    map: BTreeMap<String, BTreeMap<String, EdgeInfo>>,
}

impl DependencyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<I, S>(mut self, specificity: u32, from: &str, vias: I, to: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(specificity, from, vias, to);
        self
    }

    /// Records the edge `from → to`.
    pub fn insert<I, S>(&mut self, specificity: u32, from: &str, vias: I, to: &str)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let info = self
            .map
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_default();
        info.vias.extend(vias.into_iter().map(Into::into));
        info.specificity = info.specificity.max(specificity);
    }

    /// Removes `from → to` if it was recorded with at most `specificity`.
    pub fn without(&mut self, specificity: u32, from: &str, to: &str) {
        let Some(targets) = self.map.get_mut(from) else {
            return;
        };
        if targets.get(to).is_some_and(|info| info.specificity <= specificity) {
            targets.remove(to);
            if targets.is_empty() {
                self.map.remove(from);
            }
        }
    }

    /// Applies [`without`](Self::without) for every edge of `other`.
    pub fn without_all(&mut self, other: &Self) {
        for (from, to, info) in other.edges() {
            self.without(info.specificity, from, to);
        }
    }

    /// Adds all edges of `other`.
    pub fn merge(&mut self, other: Self) {
        for (from, targets) in other.map {
            for (to, info) in targets {
                self.insert(info.specificity, &from, info.vias, &to);
            }
        }
    }

    /// Looks up one edge.
    #[must_use]
    pub fn get(&self, from: &str, to: &str) -> Option<&EdgeInfo> {
        self.map.get(from).and_then(|targets| targets.get(to))
    }

    /// Returns whether the edge `from → to` is present.
    #[must_use]
    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.get(from, to).is_some()
    }

    /// Targets of `from`.
    #[must_use]
    pub fn dependencies(&self, from: &str) -> Option<&BTreeMap<String, EdgeInfo>> {
        self.map.get(from)
    }

    /// All edges in `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeInfo)> {
        self.map.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(to, info)| (from.as_str(), to.as_str(), info))
        })
    }

    /// Every element appearing on either end of an edge.
    #[must_use]
    pub fn elements(&self) -> BTreeSet<&str> {
        self.edges().flat_map(|(from, to, _)| [from, to]).collect()
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if there are no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn write_to(&self, out: &mut String, indent: &str) {
        for (from, targets) in &self.map {
            let _ = writeln!(out, "{indent}{from} ->");
            for (to, info) in targets {
                let _ = write!(out, "{indent}  {to}");
                if !info.vias.is_empty() {
                    let vias: Vec<&str> = info.vias.iter().map(String::as_str).collect();
                    let _ = write!(out, " (by {})", vias.join(", "));
                }
                let _ = writeln!(out);
            }
        }
    }
}

impl fmt::Display for DependencyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out, "");
        f.write_str(&out)
    }
}

// ────────────────────────────────────────────────────────────────────
// RuleResult
// ────────────────────────────────────────────────────────────────────

/// Accumulated classification of one or more rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleResult {
    /// Edges some rule explicitly allows. Cleared by [`normalize`](Self::normalize).
    pub allowed: DependencyMap,
    /// Required edges that do not exist.
    pub missing: DependencyMap,
    /// Existing edges the rules forbid.
    pub denied: DependencyMap,
    /// Patterns of non-optional rules without any matching element.
    pub not_existing: BTreeSet<Location>,
    /// Elements matched by no rule.
    pub undefined: BTreeSet<String>,
}

impl RuleResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `other` into this result.
    pub fn merge(&mut self, other: Self) {
        self.allowed.merge(other.allowed);
        self.missing.merge(other.missing);
        self.denied.merge(other.denied);
        self.not_existing.extend(other.not_existing);
        self.undefined.extend(other.undefined);
    }

    /// Drops denied edges that some rule allows at least as specifically,
    /// then forgets the allowed edges. Idempotent.
    pub fn normalize(&mut self) {
        self.denied.without_all(&self.allowed);
        self.allowed = DependencyMap::new();
    }
}

// ────────────────────────────────────────────────────────────────────
// Findings
// ────────────────────────────────────────────────────────────────────

/// Everything an analysis run found for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    /// Scope the findings refer to.
    pub scope: Scope,
    /// Required edges that do not exist.
    pub missing: DependencyMap,
    /// Existing edges the rules forbid.
    pub denied: DependencyMap,
    /// Patterns of non-optional rules without any matching element.
    pub not_existing: BTreeSet<Location>,
    /// Elements matched by no rule.
    pub undefined: BTreeSet<String>,
    /// Dependency cycles, one sub-graph per strongly connected component.
    pub cycles: Vec<DependencyMap>,
}

impl Findings {
    /// Creates findings from a normalized rule result.
    #[must_use]
    pub fn from_rule_result(scope: Scope, result: RuleResult) -> Self {
        Self {
            scope,
            missing: result.missing,
            denied: result.denied,
            not_existing: result.not_existing,
            undefined: result.undefined,
            cycles: Vec::new(),
        }
    }

    /// Number of findings of `kind`.
    #[must_use]
    pub fn count(&self, kind: FindingKind) -> usize {
        match kind {
            FindingKind::Missing => self.missing.len(),
            FindingKind::Denied => self.denied.len(),
            FindingKind::NotExisting => self.not_existing.len(),
            FindingKind::Undefined => self.undefined.len(),
            FindingKind::Cycle => self.cycles.len(),
        }
    }

    /// Returns `true` if any finding of the given kinds exists.
    #[must_use]
    pub fn has_any(&self, kinds: &[FindingKind]) -> bool {
        kinds.iter().any(|&kind| self.count(kind) > 0)
    }

    /// Returns `true` if nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_any(&FindingKind::ALL)
    }

    /// Formats all findings as a human-readable report.
    ///
    /// Returns an empty string if there is nothing to report.
    #[must_use]
    pub fn format_report(&self) -> String {
        let noun = self.scope.noun();
        let mut sections = Vec::new();

        if !self.missing.is_empty() {
            let mut s = String::from("Found missing dependencies:\n");
            self.missing.write_to(&mut s, "");
            sections.push(s);
        }
        if !self.denied.is_empty() {
            let mut s = String::from("Found forbidden dependencies:\n");
            self.denied.write_to(&mut s, "");
            sections.push(s);
        }
        if !self.not_existing.is_empty() {
            let patterns: Vec<String> = self.not_existing.iter().map(Location::pattern).collect();
            sections.push(format!(
                "Defined, but not existing {noun}:\n{}\n",
                patterns.join(", ")
            ));
        }
        if !self.undefined.is_empty() {
            let names: Vec<&str> = self.undefined.iter().map(String::as_str).collect();
            sections.push(format!(
                "Found {noun} which are not defined:\n{}\n",
                names.join(", ")
            ));
        }
        if !self.cycles.is_empty() {
            let mut s = String::from("Found cyclic groups:\n");
            for cycle in &self.cycles {
                let members: Vec<&str> = cycle.elements().into_iter().collect();
                let _ = writeln!(
                    s,
                    "- Group of {}: {}",
                    members.len(),
                    members.join(", ")
                );
                cycle.write_to(&mut s, "  ");
            }
            sections.push(s);
        }

        sections.join("\n")
    }
}
