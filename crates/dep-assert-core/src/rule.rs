//! Dependency rules: a pattern plus what its elements may, must and must
//! not use, and be used by.

use std::collections::BTreeSet;
use std::fmt;

use crate::location::LocationMatcher;
use crate::model::{Graph, Scope};
use crate::rules::DependencyRules;
use crate::types::RuleResult;

/// Handle to a rule owned by a [`DependencyRules`] set.
///
/// Handles are tagged with their set; a handle from another set never
/// resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId {
    pub(crate) set: u64,
    pub(crate) index: usize,
}

/// One of the six relations a rule can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Every matching element must use every target element.
    MustUse,
    /// Matching elements may use target elements.
    MayUse,
    /// Matching elements must not use target elements.
    MustNotUse,
    /// Target elements are expected to use matching elements.
    MustBeUsedBy,
    /// Target elements may use matching elements.
    MayBeUsedBy,
    /// Target elements must not use matching elements.
    MustNotBeUsedBy,
}

impl Relation {
    /// All relations in declaration order.
    pub const ALL: [Self; 6] = [
        Self::MustUse,
        Self::MayUse,
        Self::MustNotUse,
        Self::MustBeUsedBy,
        Self::MayBeUsedBy,
        Self::MustNotBeUsedBy,
    ];
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MustUse => write!(f, "must-use"),
            Self::MayUse => write!(f, "may-use"),
            Self::MustNotUse => write!(f, "must-not-use"),
            Self::MustBeUsedBy => write!(f, "must-be-used-by"),
            Self::MayBeUsedBy => write!(f, "may-be-used-by"),
            Self::MustNotBeUsedBy => write!(f, "must-not-be-used-by"),
        }
    }
}

/// Whether a set of patterns grants or revokes a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Polarity {
    Allow,
    Deny,
}

/// The `must` / `may` / `must not` pattern sets of one direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    must: BTreeSet<LocationMatcher>,
    may: BTreeSet<LocationMatcher>,
    must_not: BTreeSet<LocationMatcher>,
}

impl Usage {
    /// Patterns that must be related.
    #[must_use]
    pub fn must(&self) -> &BTreeSet<LocationMatcher> {
        &self.must
    }

    /// Patterns that may be related.
    #[must_use]
    pub fn may(&self) -> &BTreeSet<LocationMatcher> {
        &self.may
    }

    /// Patterns that must not be related.
    #[must_use]
    pub fn must_not(&self) -> &BTreeSet<LocationMatcher> {
        &self.must_not
    }

    /// Returns `true` if no pattern is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.may.is_empty() && self.must_not.is_empty()
    }

    pub(crate) fn patterns(&self, polarity: Polarity) -> impl Iterator<Item = &LocationMatcher> {
        let (first, second) = match polarity {
            Polarity::Allow => (&self.must, Some(&self.may)),
            Polarity::Deny => (&self.must_not, None),
        };
        first.iter().chain(second.into_iter().flatten())
    }

    /// Specificity of the most specific pattern matching `name`, or 0.
    pub(crate) fn most_specific_match(&self, scope: Scope, name: &str, polarity: Polarity) -> u32 {
        self.patterns(polarity)
            .filter(|p| scope.matches(p, name))
            .map(LocationMatcher::specificity)
            .max()
            .unwrap_or(0)
    }
}

/// A rule over all elements matching a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRule {
    pattern: LocationMatcher,
    optional: bool,
    uses: Usage,
    used_by: Usage,
}

impl DependencyRule {
    pub(crate) fn new(pattern: LocationMatcher) -> Self {
        Self {
            pattern,
            optional: false,
            uses: Usage::default(),
            used_by: Usage::default(),
        }
    }

    /// The pattern selecting the rule's elements.
    #[must_use]
    pub fn pattern(&self) -> &LocationMatcher {
        &self.pattern
    }

    /// Optional rules are not reported when they match nothing.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// What matching elements use.
    #[must_use]
    pub fn uses(&self) -> &Usage {
        &self.uses
    }

    /// What matching elements are used by.
    #[must_use]
    pub fn used_by(&self) -> &Usage {
        &self.used_by
    }

    /// Returns `true` if the rule declares no relation at all.
    #[must_use]
    pub fn has_relations(&self) -> bool {
        !self.uses.is_empty() || !self.used_by.is_empty()
    }

    pub(crate) fn set_optional(&mut self) {
        self.optional = true;
    }

    pub(crate) fn relate(&mut self, relation: Relation, target: LocationMatcher) {
        let set = match relation {
            Relation::MustUse => &mut self.uses.must,
            Relation::MayUse => &mut self.uses.may,
            Relation::MustNotUse => &mut self.uses.must_not,
            Relation::MustBeUsedBy => &mut self.used_by.must,
            Relation::MayBeUsedBy => &mut self.used_by.may,
            Relation::MustNotBeUsedBy => &mut self.used_by.must_not,
        };
        set.insert(target);
    }

    /// Classifies every element matching this rule and its dependencies.
    ///
    /// `rules` supplies the `used_by` declarations of the rules matching
    /// each dependency target.
    ///
    /// # Errors
    ///
    /// Returns [`AmbiguousRuleError`] if an edge is allowed and denied with
    /// the same specificity.
    pub fn analyze(
        &self,
        graph: &Graph,
        rules: &DependencyRules,
    ) -> Result<RuleResult, AmbiguousRuleError> {
        crate::engine::analyze_rule(self, graph, rules)
    }
}

/// An edge is allowed and denied by equally specific patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("ambiguous rule `{rule}` for dependency {from} -> {to}")]
#[diagnostic(
    code(dep_assert::ambiguous_rule),
    help("make the allowing or the denying pattern more specific")
)]
pub struct AmbiguousRuleError {
    /// Pattern of the rule being evaluated.
    pub rule: String,
    /// Using element.
    pub from: String,
    /// Used element.
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(pattern: &str) -> LocationMatcher {
        LocationMatcher::parse(pattern).unwrap()
    }

    #[test]
    fn relations_land_in_their_sets() {
        let mut rule = DependencyRule::new(m("a"));
        assert!(!rule.has_relations());
        rule.relate(Relation::MustUse, m("b"));
        rule.relate(Relation::MayBeUsedBy, m("*"));
        rule.relate(Relation::MustNotBeUsedBy, m("c"));

        assert!(rule.uses().must().contains(&m("b")));
        assert!(rule.used_by().may().contains(&m("*")));
        assert!(rule.used_by().must_not().contains(&m("c")));
        assert!(rule.has_relations());
    }

    #[test]
    fn most_specific_match_by_polarity() {
        let mut rule = DependencyRule::new(m("a"));
        rule.relate(Relation::MayUse, m("b.*"));
        rule.relate(Relation::MustUse, m("b.c"));
        rule.relate(Relation::MustNotUse, m("b*"));

        let uses = rule.uses();
        assert_eq!(uses.most_specific_match(Scope::Packages, "b.c", Polarity::Allow), 6);
        assert_eq!(uses.most_specific_match(Scope::Packages, "b.d", Polarity::Allow), 5);
        assert_eq!(uses.most_specific_match(Scope::Packages, "b.d", Polarity::Deny), 5);
        assert_eq!(uses.most_specific_match(Scope::Packages, "x", Polarity::Deny), 0);
    }

    #[test]
    fn relation_names() {
        let names: Vec<String> = Relation::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names[0], "must-use");
        assert_eq!(names[5], "must-not-be-used-by");
    }
}
