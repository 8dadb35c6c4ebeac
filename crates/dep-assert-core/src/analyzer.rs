//! Orchestrates rule evaluation and cycle detection for one scope.

use crate::config::Config;
use crate::cycles::find_cycles;
use crate::model::{Model, ModelError, Scope};
use crate::rule::AmbiguousRuleError;
use crate::rules::DependencyRules;
use crate::types::{FindingKind, Findings};

use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during analysis.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum AnalyzerError {
    /// The model could not be loaded.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Neither a model nor a model file was given.
    #[error("No model to analyze: set a model or `analyzer.graph`")]
    MissingModel,

    /// Two rules contradict each other with equal specificity.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ambiguous(#[from] AmbiguousRuleError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Debug, Default)]
pub struct AnalyzerBuilder {
    model: Option<Model>,
    rules: Option<DependencyRules>,
    scope: Option<Scope>,
    detect_cycles: Option<bool>,
    allow_intra_package_cycles: Option<bool>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model to analyze.
    #[must_use]
    pub fn model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the dependency rules. Without rules only cycles are detected.
    #[must_use]
    pub fn rules(mut self, rules: DependencyRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Sets the scope (default: from config, else packages).
    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Sets whether cycles are detected (default: from config, else true).
    #[must_use]
    pub fn detect_cycles(mut self, detect: bool) -> Self {
        self.detect_cycles = Some(detect);
        self
    }

    /// Overrides whether intra-package cycles are ignored
    /// (default: from the rules, else false).
    #[must_use]
    pub fn allow_intra_package_cycles(mut self, allow: bool) -> Self {
        self.allow_intra_package_cycles = Some(allow);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer, loading the model file named in the
    /// configuration if no model was set.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no model or the model file is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let model = match (self.model, &config.analyzer.graph) {
            (Some(model), _) => model,
            (None, Some(path)) => {
                debug!("Loading model from {}", path.display());
                Model::from_json_file(path)?
            }
            (None, None) => return Err(AnalyzerError::MissingModel),
        };

        let allow_intra_package_cycles = self.allow_intra_package_cycles.unwrap_or_else(|| {
            self.rules
                .as_ref()
                .is_some_and(DependencyRules::allow_intra_package_cycles)
        });

        Ok(Analyzer {
            model,
            rules: self.rules,
            scope: self.scope.unwrap_or(config.analyzer.scope),
            detect_cycles: self.detect_cycles.unwrap_or(config.analyzer.detect_cycles),
            allow_intra_package_cycles,
        })
    }
}

/// Runs dependency rules and cycle detection over a model.
///
/// Use [`Analyzer::builder()`] to construct an instance.
#[derive(Debug)]
pub struct Analyzer {
    model: Model,
    rules: Option<DependencyRules>,
    scope: Scope,
    detect_cycles: bool,
    allow_intra_package_cycles: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The scope being analyzed.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.as_ref().map_or(0, DependencyRules::len)
    }

    /// Evaluates the rules and looks for cycles.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules are ambiguous for some edge.
    pub fn analyze(&self) -> Result<Findings, AnalyzerError> {
        let graph = self.model.graph(self.scope);
        info!(
            "Analyzing {} {} with {} rule(s)",
            graph.len(),
            self.scope,
            self.rule_count()
        );

        let mut findings = match &self.rules {
            Some(rules) => Findings::from_rule_result(self.scope, rules.analyze(&graph)?),
            None => Findings {
                scope: self.scope,
                ..Findings::default()
            },
        };

        if self.detect_cycles {
            findings.cycles = find_cycles(&graph, self.allow_intra_package_cycles);
        }

        info!(
            "Analysis complete: {} missing, {} denied, {} not existing, {} undefined, {} cycle(s)",
            findings.count(FindingKind::Missing),
            findings.count(FindingKind::Denied),
            findings.count(FindingKind::NotExisting),
            findings.count(FindingKind::Undefined),
            findings.count(FindingKind::Cycle),
        );
        Ok(findings)
    }
}
