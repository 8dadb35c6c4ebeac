//! Rule evaluation: classifies edges into allowed, missing and denied.

use rayon::prelude::*;
use tracing::debug;

use crate::model::{Graph, Node};
use crate::rule::{AmbiguousRuleError, DependencyRule, Polarity};
use crate::rules::{DependencyRules, RuleMode};
use crate::types::RuleResult;

/// Evaluates a single rule.
pub(crate) fn analyze_rule(
    rule: &DependencyRule,
    graph: &Graph,
    rules: &DependencyRules,
) -> Result<RuleResult, AmbiguousRuleError> {
    let pattern = rule.pattern();
    let specificity = pattern.specificity();
    let elements: Vec<&Node> = graph.matching(pattern).collect();
    debug!("Rule {} matches {} element(s)", pattern, elements.len());

    let mut result = RuleResult::new();
    if elements.is_empty() && !rule.is_optional() {
        result.not_existing.insert(pattern.location().clone());
    }

    for element in &elements {
        record_missing(rule, graph, element, specificity, &mut result);
        classify_edges(rule, graph, rules, element, specificity, &mut result)?;
    }
    Ok(result)
}

fn record_missing(
    rule: &DependencyRule,
    graph: &Graph,
    element: &Node,
    specificity: u32,
    result: &mut RuleResult,
) {
    for required in rule.uses().must() {
        for target in graph.matching(required) {
            if target.name() != element.name() && !element.uses(target.name()) {
                result.missing.insert(
                    specificity,
                    element.name(),
                    Vec::<String>::new(),
                    target.name(),
                );
            }
        }
    }
}

fn classify_edges(
    rule: &DependencyRule,
    graph: &Graph,
    rules: &DependencyRules,
    element: &Node,
    specificity: u32,
    result: &mut RuleResult,
) -> Result<(), AmbiguousRuleError> {
    let scope = graph.scope();
    let from = element.name();

    for to in element.dependencies() {
        let allowed = rule
            .uses()
            .most_specific_match(scope, to, Polarity::Allow)
            .max(rules.most_specific_used_by(scope, from, to, Polarity::Allow));
        let denied = rule
            .uses()
            .most_specific_match(scope, to, Polarity::Deny)
            .max(rules.most_specific_used_by(scope, from, to, Polarity::Deny));

        if allowed != 0 && allowed == denied {
            return Err(AmbiguousRuleError {
                rule: rule.pattern().to_string(),
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let vias = element.provenance(to).into_iter().flatten().cloned();
        let mode = rules.mode();
        if allowed > denied || (mode == RuleMode::AllowAll && denied == 0) {
            result.allowed.insert(specificity, from, vias, to);
        } else if denied > allowed || (mode == RuleMode::DenyAll && allowed == 0) {
            let same_package = graph
                .node(to)
                .is_some_and(|target| target.package() == element.package());
            if rules.allow_intra_package_deps() && same_package {
                continue;
            }
            let recorded = if denied == 0 { 0 } else { specificity };
            result.denied.insert(recorded, from, vias, to);
        }
    }
    Ok(())
}

/// Evaluates every rule of `rules`, merges and normalizes the results.
///
/// Rules are evaluated in parallel; the merge is order-independent, so the
/// outcome does not depend on scheduling.
pub(crate) fn analyze_rules(
    rules: &DependencyRules,
    graph: &Graph,
) -> Result<RuleResult, AmbiguousRuleError> {
    debug!(
        "Evaluating {} rule(s) over {} {}",
        rules.len(),
        graph.len(),
        graph.scope()
    );

    let per_rule: Vec<Result<RuleResult, AmbiguousRuleError>> = rules
        .rules()
        .par_iter()
        .map(|rule| rule.analyze(graph, rules))
        .collect();

    let mut result = RuleResult::new();
    for rule_result in per_rule {
        result.merge(rule_result?);
    }

    result.undefined = graph
        .nodes()
        .filter(|node| {
            !rules
                .rules()
                .iter()
                .any(|rule| graph.is_matched(node, rule.pattern()))
        })
        .map(|node| node.name().to_string())
        .collect();

    result.normalize();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, Scope};
    use crate::rule::Relation;

    /// a → b (A1), b → c (B1), c → a (C1)
    fn ring() -> Graph {
        let mut model = Model::new();
        model
            .add_usage("a.A1", "b.B1")
            .add_usage("b.B1", "c.C1")
            .add_usage("c.C1", "a.A1");
        model.graph(Scope::Packages)
    }

    #[test]
    fn not_existing_unless_optional() {
        let mut rules = DependencyRules::allow_all();
        rules.add_rule("x").unwrap();
        let optional = rules.add_rule("y").unwrap();
        rules.edit(optional).optional();

        let result = rules.analyze(&ring()).unwrap();
        let patterns: Vec<String> = result.not_existing.iter().map(ToString::to_string).collect();
        assert_eq!(patterns, vec!["x"]);
    }

    #[test]
    fn missing_must_use_target() {
        let mut rules = DependencyRules::allow_all();
        let c = rules.add_rule("c").unwrap();
        rules.define("a", |r| {
            r.must_use(&[c]);
        })
        .unwrap();

        let result = rules.analyze(&ring()).unwrap();
        let info = result.missing.get("a", "c").unwrap();
        assert!(info.vias.is_empty());
        assert_eq!(info.specificity, 6);
    }

    #[test]
    fn deny_all_denies_unmentioned_edges_with_zero_specificity() {
        let mut rules = DependencyRules::deny_all();
        let b = rules.add_rule("b").unwrap();
        rules.define("a", |r| {
            r.may_use(&[b]);
        })
        .unwrap();

        let result = rules.analyze(&ring()).unwrap();
        assert!(!result.denied.contains("a", "b"));
        assert_eq!(result.denied.get("b", "c").unwrap().specificity, 0);
        assert_eq!(result.undefined.iter().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn used_by_relation_allows_edge() {
        let mut rules = DependencyRules::deny_all();
        let a = rules.add_rule("a").unwrap();
        rules.define("b", |r| {
            r.may_be_used_by(&[a]);
        })
        .unwrap();

        let result = rules.analyze(&ring()).unwrap();
        assert!(!result.denied.contains("a", "b"));
    }

    #[test]
    fn must_not_be_used_by_denies_edge() {
        let mut rules = DependencyRules::allow_all();
        let a = rules.add_rule("a").unwrap();
        rules.define("b", |r| {
            r.must_not_be_used_by(&[a]);
        })
        .unwrap();

        let result = rules.analyze(&ring()).unwrap();
        let info = result.denied.get("a", "b").unwrap();
        assert_eq!(info.specificity, 6);
        assert_eq!(info.vias.iter().collect::<Vec<_>>(), vec!["a.A1"]);
        assert_eq!(result.denied.len(), 1);
    }

    #[test]
    fn must_be_used_by_allows_edge_in_deny_all() {
        let mut rules = DependencyRules::deny_all();
        let b = rules.add_rule("b").unwrap();
        rules.add_rule("a").unwrap();
        rules.define("c", |r| {
            r.must_be_used_by(&[b]);
        })
        .unwrap();

        let result = rules.analyze(&ring()).unwrap();
        assert!(!result.denied.contains("b", "c"));
        assert!(result.denied.contains("a", "b"));
        assert!(result.denied.contains("c", "a"));
        assert!(result.missing.is_empty());
    }

    #[test]
    fn specific_used_by_allow_beats_broad_use_deny() {
        let mut rules = DependencyRules::allow_all();
        let a = rules.add_rule("a").unwrap();
        rules
            .edit(a)
            .relate_pattern(Relation::MustNotUse, DependencyRules::rule("*").unwrap());
        rules.define("b", |r| {
            r.may_be_used_by(&[a]);
        })
        .unwrap();

        let result = rules.analyze(&ring()).unwrap();
        assert!(result.denied.is_empty());
    }

    #[test]
    fn specific_use_deny_beats_broad_used_by_allow() {
        let mut rules = DependencyRules::allow_all();
        let b = rules.add_rule("b").unwrap();
        rules.edit(b).may_be_used_by_all();
        rules.define("a", |r| {
            r.must_not_use(&[b]);
        })
        .unwrap();

        let result = rules.analyze(&ring()).unwrap();
        assert_eq!(result.denied.get("a", "b").unwrap().specificity, 6);
    }

    #[test]
    fn missing_never_targets_the_element_itself() {
        let mut rules = DependencyRules::allow_all();
        let any = rules.add_rule("*").unwrap();
        rules.edit(any).must_use(&[any]);

        let result = rules.analyze(&ring()).unwrap();
        for name in ["a", "b", "c"] {
            assert!(!result.missing.contains(name, name), "{name} -> {name}");
        }
        assert!(result.missing.contains("a", "c"));
        assert!(!result.missing.contains("a", "b"));
        assert_eq!(result.missing.len(), 3);
    }

    #[test]
    fn more_specific_allow_beats_deny() {
        let mut rules = DependencyRules::allow_all();
        let any = rules.add_rule("*").unwrap();
        let c = rules.add_rule("c").unwrap();
        rules.define("b", |r| {
            r.must_not_use(&[any]).may_use(&[c]);
        })
        .unwrap();

        let result = rules.analyze(&ring()).unwrap();
        assert!(result.denied.is_empty());
    }

    #[test]
    fn equal_specificity_is_ambiguous() {
        let mut rules = DependencyRules::allow_all();
        let c = rules.add_rule("c").unwrap();
        rules.define("b", |r| {
            r.must_not_use(&[c]).may_use(&[c]);
        })
        .unwrap();

        let err = rules.analyze(&ring()).unwrap_err();
        assert_eq!(
            err,
            AmbiguousRuleError {
                rule: "b".to_string(),
                from: "b".to_string(),
                to: "c".to_string(),
            }
        );
    }

    #[test]
    fn intra_package_deps_can_be_tolerated() {
        let mut model = Model::new();
        model.add_usage("a.A1", "a.A2");
        let graph = model.graph(Scope::Classes);

        let mut strict = DependencyRules::deny_all();
        strict.add_rule("a.*").unwrap();
        let result = strict.analyze(&graph).unwrap();
        assert!(result.denied.contains("a.A1", "a.A2"));

        let mut lenient = DependencyRules::deny_all().with_intra_package_deps(true);
        lenient.add_rule("a.*").unwrap();
        let result = lenient.analyze(&graph).unwrap();
        assert!(result.denied.is_empty());
    }
}
