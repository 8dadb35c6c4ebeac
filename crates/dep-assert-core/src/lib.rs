//! # dep-assert-core
//!
//! Dependency rules and cycle detection for package and class graphs.
//!
//! This crate checks a graph of compiled code against declared architecture
//! rules. It includes:
//!
//! - [`Location`] / [`LocationMatcher`] for wildcard patterns over
//!   package, class and method names
//! - [`Model`] and [`Graph`] for the package and class dependency graphs
//! - [`DependencyRules`] for declaring what may, must and must not be used
//! - [`find_cycles`] for dependency cycles
//! - [`Analyzer`] for running everything and collecting [`Findings`]
//!
//! ## Example
//!
//! ```
//! use dep_assert_core::{Analyzer, DependencyRules, Model};
//!
//! let mut model = Model::new();
//! model.add_usage("app.web.Controller", "app.core.Service");
//! model.add_usage("app.core.Service", "app.web.Controller");
//!
//! let mut rules = DependencyRules::allow_all();
//! let web = rules.add_rule("app.web")?;
//! rules.define("app.core", |r| {
//!     r.must_not_use(&[web]);
//! })?;
//!
//! let findings = Analyzer::builder()
//!     .model(model)
//!     .rules(rules)
//!     .build()?
//!     .analyze()?;
//!
//! assert!(findings.denied.contains("app.core", "app.web"));
//! assert_eq!(findings.cycles.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod cycles;
mod engine;
mod location;
mod rule;
mod rules;
mod types;

pub mod model;

pub mod declarative;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError};
pub use cycles::find_cycles;
pub use location::{matches_all, matches_component, Language, Location, LocationMatcher, PatternError};
pub use model::{Graph, Model, ModelError, Node, Scope};
pub use rule::{AmbiguousRuleError, DependencyRule, Relation, RuleId, Usage};
pub use rules::{camel_case_to_dot_case, DependencyRules, RuleEditor, RuleMode, Ruler};
pub use types::{DependencyMap, EdgeInfo, FindingKind, Findings, RuleResult};
