//! DTO → rule set conversion with validation.

use std::collections::HashMap;

use crate::location::{Location, LocationMatcher, PatternError};
use crate::rule::{Relation, RuleId};
use crate::rules::{DependencyRules, RuleMode};

use super::config_dto::{DependenciesDto, RuleDto};

/// Errors during DTO → rule set conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A pattern failed to parse.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "rule[0].pattern").
        context: String,
        /// The underlying pattern error.
        source: PatternError,
    },

    /// Unknown mode string.
    #[error("dependencies.mode: unknown mode `{value}`, expected: allow-all, deny-all")]
    UnknownMode {
        /// The invalid value.
        value: String,
    },

    /// Two rules share a name.
    #[error("rule[{index}]: duplicate rule name `{name}`")]
    DuplicateRule {
        /// Position of the second declaration.
        index: usize,
        /// The duplicated name.
        name: String,
    },

    /// Relations naming rules that do not exist.
    #[error("unknown rule references:\n{}", format_refs(.0))]
    UnknownRefs(Vec<UnknownRef>),
}

/// A relation target that names no declared rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRef {
    /// Where the reference occurred (e.g., "rule[1].must-use").
    pub context: String,
    /// The unresolved name.
    pub name: String,
}

fn format_refs(refs: &[UnknownRef]) -> String {
    refs.iter()
        .map(|r| format!("  - {}: `{}`", r.context, r.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_mode(value: &str) -> Result<RuleMode, LoadError> {
    match value {
        "allow-all" => Ok(RuleMode::AllowAll),
        "deny-all" => Ok(RuleMode::DenyAll),
        _ => Err(LoadError::UnknownMode {
            value: value.to_string(),
        }),
    }
}

fn relations(dto: &RuleDto) -> [(Relation, &[String]); 6] {
    [
        (Relation::MustUse, dto.must_use.as_slice()),
        (Relation::MayUse, dto.may_use.as_slice()),
        (Relation::MustNotUse, dto.must_not_use.as_slice()),
        (Relation::MustBeUsedBy, dto.must_be_used_by.as_slice()),
        (Relation::MayBeUsedBy, dto.may_be_used_by.as_slice()),
        (Relation::MustNotBeUsedBy, dto.must_not_be_used_by.as_slice()),
    ]
}

/// Converts a `DependenciesDto` to a validated [`DependencyRules`] set.
///
/// # Errors
///
/// Returns the first pattern or naming error, or all unknown references.
pub fn load(dto: DependenciesDto) -> Result<DependencyRules, LoadError> {
    let mode = parse_mode(&dto.mode)?;
    let mut rules = DependencyRules::new(mode);
    if let Some(allow) = dto.allow_intra_package_cycles {
        rules = rules.with_intra_package_cycles(allow);
    }
    if let Some(allow) = dto.allow_intra_package_deps {
        rules = rules.with_intra_package_deps(allow);
    }

    for (i, pattern) in dto.externals.iter().enumerate() {
        rules
            .add_external(pattern)
            .map_err(|e| LoadError::Validation {
                context: format!("externals[{i}]"),
                source: e,
            })?;
    }

    let ids = register_rules(&mut rules, &dto.base, &dto.rules)?;

    let mut unknown = Vec::new();
    for (i, rule) in dto.rules.iter().enumerate() {
        let Some(&id) = ids.get(&rule.name) else {
            continue;
        };
        for (relation, targets) in relations(rule) {
            for target in targets {
                if target == "*" {
                    rules
                        .edit(id)
                        .relate_pattern(relation, LocationMatcher::new(Location::all()));
                } else if let Some(&target_id) = ids.get(target) {
                    rules.edit(id).relate(relation, &[target_id]);
                } else {
                    unknown.push(UnknownRef {
                        context: format!("rule[{i}].{relation}"),
                        name: target.clone(),
                    });
                }
            }
        }
        if rule.optional {
            rules.edit(id).optional();
        }
    }

    if unknown.is_empty() {
        Ok(rules)
    } else {
        Err(LoadError::UnknownRefs(unknown))
    }
}

fn register_rules(
    rules: &mut DependencyRules,
    base: &str,
    dtos: &[RuleDto],
) -> Result<HashMap<String, RuleId>, LoadError> {
    rules.with_rules(base, |ruler| {
        let mut ids = HashMap::new();
        for (i, dto) in dtos.iter().enumerate() {
            if ids.contains_key(&dto.name) {
                return Err(LoadError::DuplicateRule {
                    index: i,
                    name: dto.name.clone(),
                });
            }
            let registered = match &dto.pattern {
                Some(pattern) => ruler.rule(pattern).map_err(|e| LoadError::Validation {
                    context: format!("rule[{i}].pattern"),
                    source: e,
                }),
                None => ruler.named(&dto.name).map_err(|e| LoadError::Validation {
                    context: format!("rule[{i}].name"),
                    source: e,
                }),
            }?;
            ids.insert(dto.name.clone(), registered);
        }
        Ok(ids)
    })
}
