//! Check command implementation.

use anyhow::{bail, Context, Result};
use dep_assert_core::declarative::load_rules_from_toml;
use dep_assert_core::{Analyzer, Config, DependencyRules, Scope};
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line overrides for the check command.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Graph file, overriding `analyzer.graph`.
    pub graph: Option<PathBuf>,
    /// Scope, overriding `analyzer.scope`.
    pub scope: Option<Scope>,
    /// Output format.
    pub format: OutputFormat,
    /// Skip cycle detection.
    pub no_cycles: bool,
}

/// Runs the check command.
pub fn run(source: &ConfigSource, options: &CheckOptions) -> Result<()> {
    let (mut config, rules) = load(source)?;

    if let Some(graph) = &options.graph {
        config.analyzer.graph = Some(graph.clone());
    }
    if config.analyzer.graph.is_none() {
        bail!("No graph to analyze. Pass --graph or set `analyzer.graph` in the configuration.");
    }
    let fail_on = config.analyzer.fail_on.clone();

    let mut builder = Analyzer::builder().config(config);
    if let Some(rules) = rules {
        builder = builder.rules(rules);
    } else {
        tracing::info!("No [dependencies] table found, checking cycles only");
    }
    if let Some(scope) = options.scope {
        builder = builder.scope(scope);
    }
    if options.no_cycles {
        builder = builder.detect_cycles(false);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    let findings = match analyzer.analyze() {
        Ok(findings) => findings,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            bail!("Analysis failed");
        }
    };

    super::output::print(&findings, options.format)?;

    if findings.has_any(&fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Loads the analyzer configuration and the rule set from one file.
fn load(source: &ConfigSource) -> Result<(Config, Option<DependencyRules>)> {
    let Some(path) = source.path() else {
        return Ok((Config::default(), None));
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let mut config = Config::parse(&content)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    let rules = load_rules_from_toml(&content)
        .with_context(|| format!("Invalid dependency rules in {}", path.display()))?;

    if let Some(graph) = config.analyzer.graph.take() {
        config.analyzer.graph = Some(relative_to(path, graph));
    }
    Ok((config, rules))
}

/// Resolves a path from the configuration against the file's directory.
fn relative_to(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path,
    }
}
