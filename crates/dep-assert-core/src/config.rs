//! Configuration types for dep-assert.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::Scope;
use crate::types::FindingKind;

/// Top-level configuration for dep-assert.
///
/// Rule declarations live in the `[dependencies]` table of the same file
/// and are read by [`crate::declarative::load_rules_from_toml`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Returns whether findings of `kind` fail a check.
    #[must_use]
    pub fn fails_on(&self, kind: FindingKind) -> bool {
        self.analyzer.fail_on.contains(&kind)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnalyzerConfig {
    /// JSON model file to analyze.
    #[serde(default)]
    pub graph: Option<PathBuf>,

    /// Whether packages or classes are analyzed (default: packages).
    #[serde(default)]
    pub scope: Scope,

    /// Whether to look for dependency cycles.
    #[serde(default = "default_true")]
    pub detect_cycles: bool,

    /// Finding kinds that make a check fail.
    #[serde(default = "default_fail_on")]
    pub fail_on: Vec<FindingKind>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            graph: None,
            scope: Scope::default(),
            detect_cycles: true,
            fail_on: default_fail_on(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fail_on() -> Vec<FindingKind> {
    vec![FindingKind::Missing, FindingKind::Denied, FindingKind::Cycle]
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_section_missing() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.analyzer.scope, Scope::Packages);
        assert!(config.analyzer.detect_cycles);
        assert!(config.fails_on(FindingKind::Denied));
        assert!(!config.fails_on(FindingKind::Undefined));
    }

    #[test]
    fn parses_analyzer_section() {
        let config = Config::parse(
            r#"
[analyzer]
graph = "target/graph.json"
scope = "classes"
detect-cycles = false
fail-on = ["undefined", "not-existing"]

[dependencies]
mode = "deny-all"
"#,
        )
        .unwrap();

        assert_eq!(config.analyzer.graph, Some(PathBuf::from("target/graph.json")));
        assert_eq!(config.analyzer.scope, Scope::Classes);
        assert!(!config.analyzer.detect_cycles);
        assert!(config.fails_on(FindingKind::NotExisting));
        assert!(!config.fails_on(FindingKind::Missing));
    }

    #[test]
    fn rejects_unknown_scope() {
        let result = Config::parse("[analyzer]\nscope = \"modules\"\n");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
