//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to a [`DependencyRules`](crate::DependencyRules) set
//! via the loader.

use serde::Deserialize;

/// Raw TOML representation of declarative rules.
///
/// Extends the base `Config` with a `[dependencies]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarativeConfigDto {
    /// Dependency rule declarations.
    #[serde(default)]
    pub dependencies: Option<DependenciesDto>,
}

/// TOML representation of a rule set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependenciesDto {
    /// Rule mode: "allow-all" (default) or "deny-all".
    #[serde(default = "default_mode_str")]
    pub mode: String,

    /// Base package prepended to every rule pattern.
    #[serde(default)]
    pub base: String,

    /// Ignore cycles within one package (default depends on the mode).
    #[serde(rename = "allow-intra-package-cycles", default)]
    pub allow_intra_package_cycles: Option<bool>,

    /// Never deny dependencies within one package (default depends on the mode).
    #[serde(rename = "allow-intra-package-deps", default)]
    pub allow_intra_package_deps: Option<bool>,

    /// Patterns of external code every element may use. Not prefixed with `base`.
    #[serde(default)]
    pub externals: Vec<String>,

    /// Rule declarations.
    #[serde(rename = "rule", default)]
    pub rules: Vec<RuleDto>,
}

fn default_mode_str() -> String {
    "allow-all".to_string()
}

/// TOML representation of one rule.
///
/// Relation lists reference other rules by `name`; `"*"` stands for every
/// element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleDto {
    /// Rule name, unique within the file (e.g., "api" or "subPack").
    pub name: String,

    /// Pattern relative to `base`. Defaults to the dot-cased name.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Do not report the rule when it matches nothing.
    #[serde(default)]
    pub optional: bool,

    /// Rules whose elements must be used.
    #[serde(rename = "must-use", default)]
    pub must_use: Vec<String>,

    /// Rules whose elements may be used.
    #[serde(rename = "may-use", default)]
    pub may_use: Vec<String>,

    /// Rules whose elements must not be used.
    #[serde(rename = "must-not-use", default)]
    pub must_not_use: Vec<String>,

    /// Rules whose elements are expected to use this rule's elements.
    #[serde(rename = "must-be-used-by", default)]
    pub must_be_used_by: Vec<String>,

    /// Rules whose elements may use this rule's elements.
    #[serde(rename = "may-be-used-by", default)]
    pub may_be_used_by: Vec<String>,

    /// Rules whose elements must not use this rule's elements.
    #[serde(rename = "must-not-be-used-by", default)]
    pub must_not_be_used_by: Vec<String>,
}
