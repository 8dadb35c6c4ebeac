//! The rule set: ownership of rules, relation wiring and evaluation.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::location::{Location, LocationMatcher, PatternError};
use crate::model::{Graph, Scope, UNNAMED_PACKAGE};
use crate::rule::{AmbiguousRuleError, DependencyRule, Polarity, Relation, RuleId};
use crate::types::RuleResult;

/// How edges no rule talks about are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleMode {
    /// Everything not explicitly denied is allowed.
    #[default]
    AllowAll,
    /// Everything not explicitly allowed is denied.
    DenyAll,
}

static NEXT_SET: AtomicU64 = AtomicU64::new(0);

/// A set of dependency rules evaluated together.
///
/// ```
/// use dep_assert_core::DependencyRules;
///
/// let mut rules = DependencyRules::deny_all();
/// let api = rules.add_rule("com.acme.api")?;
/// let model = rules.add_rule("com.acme.model")?;
/// rules.edit(api).must_use(&[model]);
/// rules.add_external("java.*")?;
/// # Ok::<(), dep_assert_core::PatternError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DependencyRules {
    set: u64,
    mode: RuleMode,
    allow_intra_package_cycles: bool,
    allow_intra_package_deps: bool,
    rules: Vec<DependencyRule>,
}

// The set tag only scopes handles; it is not part of the rules' meaning.
impl PartialEq for DependencyRules {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.allow_intra_package_cycles == other.allow_intra_package_cycles
            && self.allow_intra_package_deps == other.allow_intra_package_deps
            && self.rules == other.rules
    }
}

impl Eq for DependencyRules {}

impl Default for DependencyRules {
    fn default() -> Self {
        Self::new(RuleMode::default())
    }
}

impl DependencyRules {
    /// Creates an empty rule set.
    ///
    /// Intra-package cycles and dependencies are tolerated in allow-all mode
    /// and reported in deny-all mode unless overridden.
    #[must_use]
    pub fn new(mode: RuleMode) -> Self {
        let lenient = mode == RuleMode::AllowAll;
        Self {
            set: NEXT_SET.fetch_add(1, Ordering::Relaxed),
            mode,
            allow_intra_package_cycles: lenient,
            allow_intra_package_deps: lenient,
            rules: Vec::new(),
        }
    }

    /// An empty allow-all rule set.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::new(RuleMode::AllowAll)
    }

    /// An empty deny-all rule set.
    #[must_use]
    pub fn deny_all() -> Self {
        Self::new(RuleMode::DenyAll)
    }

    /// Sets whether cycles within one package are ignored.
    #[must_use]
    pub fn with_intra_package_cycles(mut self, allow: bool) -> Self {
        self.allow_intra_package_cycles = allow;
        self
    }

    /// Sets whether dependencies within one package are never denied.
    #[must_use]
    pub fn with_intra_package_deps(mut self, allow: bool) -> Self {
        self.allow_intra_package_deps = allow;
        self
    }

    /// The classification mode.
    #[must_use]
    pub const fn mode(&self) -> RuleMode {
        self.mode
    }

    /// Whether cycles within one package are ignored.
    #[must_use]
    pub const fn allow_intra_package_cycles(&self) -> bool {
        self.allow_intra_package_cycles
    }

    /// Whether dependencies within one package are never denied.
    #[must_use]
    pub const fn allow_intra_package_deps(&self) -> bool {
        self.allow_intra_package_deps
    }

    /// A pattern usable as relation target without registering a rule.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn rule(pattern: &str) -> Result<LocationMatcher, PatternError> {
        LocationMatcher::parse(pattern)
    }

    /// Registers a rule for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn add_rule(&mut self, pattern: &str) -> Result<RuleId, PatternError> {
        Ok(self.add_matcher(LocationMatcher::parse(pattern)?))
    }

    /// Registers a rule for an already parsed pattern.
    pub fn add_matcher(&mut self, pattern: LocationMatcher) -> RuleId {
        self.rules.push(DependencyRule::new(pattern));
        RuleId {
            set: self.set,
            index: self.rules.len() - 1,
        }
    }

    /// Registers a rule and wires its relations in one step.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn define<F>(&mut self, pattern: &str, f: F) -> Result<RuleId, PatternError>
    where
        F: FnOnce(&mut RuleEditor<'_>),
    {
        let id = self.add_rule(pattern)?;
        f(&mut self.edit(id));
        Ok(id)
    }

    /// Registers an optional rule every element may use.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn add_external(&mut self, pattern: &str) -> Result<RuleId, PatternError> {
        let id = self.add_rule(pattern)?;
        self.mark_external(id);
        Ok(id)
    }

    /// Registers several external rules.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for the first invalid pattern.
    pub fn add_externals(&mut self, patterns: &[&str]) -> Result<Vec<RuleId>, PatternError> {
        patterns.iter().map(|p| self.add_external(p)).collect()
    }

    fn mark_external(&mut self, id: RuleId) {
        self.edit(id)
            .optional()
            .relate_pattern(Relation::MayBeUsedBy, LocationMatcher::new(Location::all()));
    }

    /// Registers rules relative to a base package.
    ///
    /// ```
    /// use dep_assert_core::DependencyRules;
    ///
    /// let mut rules = DependencyRules::allow_all();
    /// rules.with_rules("com.acme", |r| {
    ///     let api = r.named("api")?;
    ///     let internal = r.named("internal_")?;
    ///     r.edit(api).must_not_use(&[internal]);
    ///     Ok::<_, dep_assert_core::PatternError>(())
    /// })?;
    /// assert_eq!(rules.rules()[1].pattern().to_string(), "com.acme.internal.*");
    /// # Ok::<(), dep_assert_core::PatternError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn with_rules<F, T, E>(&mut self, base: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Ruler<'_>) -> Result<T, E>,
    {
        let mut ruler = Ruler {
            rules: self,
            base: base.to_string(),
            registered: Vec::new(),
        };
        f(&mut ruler)
    }

    /// Like [`with_rules`](Self::with_rules), but every rule registered
    /// without relations becomes an external rule.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn with_external_rules<F, T, E>(&mut self, base: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Ruler<'_>) -> Result<T, E>,
    {
        let mut ruler = Ruler {
            rules: self,
            base: base.to_string(),
            registered: Vec::new(),
        };
        let value = f(&mut ruler)?;
        for id in ruler.registered {
            if self.get(id).is_some_and(|r| !r.has_relations()) {
                self.mark_external(id);
            }
        }
        Ok(value)
    }

    /// Starts editing the relations of a registered rule.
    ///
    /// Edits through a handle of another set are ignored with a warning.
    pub fn edit(&mut self, id: RuleId) -> RuleEditor<'_> {
        if self.index_of(id).is_none() {
            warn!("Ignoring edits of rule #{}: not registered in this set", id.index);
        }
        RuleEditor { rules: self, id }
    }

    /// Looks up a registered rule. Handles of other sets resolve to `None`.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&DependencyRule> {
        self.rules.get(self.index_of(id)?)
    }

    fn get_mut(&mut self, id: RuleId) -> Option<&mut DependencyRule> {
        let index = self.index_of(id)?;
        self.rules.get_mut(index)
    }

    fn index_of(&self, id: RuleId) -> Option<usize> {
        (id.set == self.set && id.index < self.rules.len()).then_some(id.index)
    }

    /// All rules in registration order.
    #[must_use]
    pub fn rules(&self) -> &[DependencyRule] {
        &self.rules
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Highest specificity with which any rule matching `to` lists `from`
    /// in its `used_by` patterns of the given polarity.
    pub(crate) fn most_specific_used_by(
        &self,
        scope: Scope,
        from: &str,
        to: &str,
        polarity: Polarity,
    ) -> u32 {
        self.rules
            .iter()
            .filter(|r| scope.matches(r.pattern(), to))
            .map(|r| r.used_by().most_specific_match(scope, from, polarity))
            .max()
            .unwrap_or(0)
    }

    /// Evaluates all rules against `graph` and returns the normalized result.
    ///
    /// # Errors
    ///
    /// Returns [`AmbiguousRuleError`] of the first rule (in registration
    /// order) that meets an ambiguous edge.
    pub fn analyze(&self, graph: &Graph) -> Result<RuleResult, AmbiguousRuleError> {
        crate::engine::analyze_rules(self, graph)
    }
}

/// Mutable access to the relations of one rule.
///
/// Relation targets are given as handles of other rules in the same set.
#[derive(Debug)]
pub struct RuleEditor<'a> {
    rules: &'a mut DependencyRules,
    id: RuleId,
}

impl RuleEditor<'_> {
    /// The rule being edited.
    #[must_use]
    pub const fn id(&self) -> RuleId {
        self.id
    }

    /// Elements of this rule must use the targets' elements.
    pub fn must_use(&mut self, targets: &[RuleId]) -> &mut Self {
        self.relate(Relation::MustUse, targets)
    }

    /// Elements of this rule may use the targets' elements.
    pub fn may_use(&mut self, targets: &[RuleId]) -> &mut Self {
        self.relate(Relation::MayUse, targets)
    }

    /// Elements of this rule must not use the targets' elements.
    pub fn must_not_use(&mut self, targets: &[RuleId]) -> &mut Self {
        self.relate(Relation::MustNotUse, targets)
    }

    /// The targets' elements are expected to use this rule's elements.
    pub fn must_be_used_by(&mut self, targets: &[RuleId]) -> &mut Self {
        self.relate(Relation::MustBeUsedBy, targets)
    }

    /// The targets' elements may use this rule's elements.
    pub fn may_be_used_by(&mut self, targets: &[RuleId]) -> &mut Self {
        self.relate(Relation::MayBeUsedBy, targets)
    }

    /// The targets' elements must not use this rule's elements.
    pub fn must_not_be_used_by(&mut self, targets: &[RuleId]) -> &mut Self {
        self.relate(Relation::MustNotBeUsedBy, targets)
    }

    /// Any element may use this rule's elements.
    pub fn may_be_used_by_all(&mut self) -> &mut Self {
        self.relate_pattern(Relation::MayBeUsedBy, LocationMatcher::new(Location::all()))
    }

    /// Do not report this rule when it matches nothing.
    pub fn optional(&mut self) -> &mut Self {
        if let Some(rule) = self.rules.get_mut(self.id) {
            rule.set_optional();
        }
        self
    }

    /// Adds `relation` towards the patterns of the given rules.
    pub fn relate(&mut self, relation: Relation, targets: &[RuleId]) -> &mut Self {
        for &target in targets {
            match self.rules.get(target) {
                Some(rule) => {
                    let pattern = rule.pattern().clone();
                    self.relate_pattern(relation, pattern);
                }
                None => warn!(
                    "Ignoring {relation} target: rule #{} is not registered in this set",
                    target.index
                ),
            }
        }
        self
    }

    /// Adds `relation` towards a detached pattern.
    pub fn relate_pattern(&mut self, relation: Relation, pattern: LocationMatcher) -> &mut Self {
        if let Some(rule) = self.rules.get_mut(self.id) {
            rule.relate(relation, pattern);
        }
        self
    }
}

/// Registers rules relative to a base package.
///
/// Obtained from [`DependencyRules::with_rules`].
#[derive(Debug)]
pub struct Ruler<'a> {
    rules: &'a mut DependencyRules,
    base: String,
    registered: Vec<RuleId>,
}

impl Ruler<'_> {
    /// The base package all relative patterns are appended to.
    #[must_use]
    pub fn base_package(&self) -> &str {
        &self.base
    }

    /// Registers `base.relative`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the resulting pattern is invalid.
    pub fn rule(&mut self, relative: &str) -> Result<RuleId, PatternError> {
        let pattern = join_packages(&self.base, relative);
        self.register(&pattern)
    }

    /// Registers a rule for a camelCase identifier: `subPack` becomes
    /// `base.sub.pack`, a trailing `_` appends `.*`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the resulting pattern is invalid.
    pub fn named(&mut self, identifier: &str) -> Result<RuleId, PatternError> {
        self.rule(&camel_case_to_dot_case(identifier))
    }

    /// Registers the base package itself.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the base is not a valid pattern.
    pub fn base(&mut self) -> Result<RuleId, PatternError> {
        self.rule("")
    }

    /// Registers `base.*`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the base is not a valid pattern.
    pub fn all(&mut self) -> Result<RuleId, PatternError> {
        self.rule("*")
    }

    /// Registers the package of classes without a package.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other registrations.
    pub fn unnamed(&mut self) -> Result<RuleId, PatternError> {
        self.register(UNNAMED_PACKAGE)
    }

    /// Starts editing a rule of the underlying set.
    pub fn edit(&mut self, id: RuleId) -> RuleEditor<'_> {
        self.rules.edit(id)
    }

    fn register(&mut self, pattern: &str) -> Result<RuleId, PatternError> {
        let id = self.rules.add_rule(pattern)?;
        self.registered.push(id);
        Ok(id)
    }
}

fn join_packages(base: &str, relative: &str) -> String {
    if base.is_empty() || relative.is_empty() || base.ends_with('.') {
        format!("{base}{relative}")
    } else {
        format!("{base}.{relative}")
    }
}

/// Derives a package pattern from an identifier.
///
/// Uppercase letters start a new dotted component. Identifiers containing
/// `$` use it as the separator instead. A trailing `_` becomes `.*`.
#[must_use]
pub fn camel_case_to_dot_case(identifier: &str) -> String {
    let dollar_mode = identifier.contains('$');
    let last = identifier.chars().count().saturating_sub(1);
    let mut out = String::new();
    for (i, c) in identifier.chars().enumerate() {
        if c == '_' && i == last {
            out.push_str(if out.is_empty() || out.ends_with('.') { "*" } else { ".*" });
        } else if dollar_mode {
            out.push(if c == '$' && i != 0 { '.' } else { c });
        } else if c.is_uppercase() {
            if i != 0 {
                out.push('.');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
