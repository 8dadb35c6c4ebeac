//! Declarative dependency rules driven by TOML configuration.
//!
//! This module turns a `[dependencies]` table into a [`DependencyRules`]
//! set without writing Rust code.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert (loader)
//! DependencyRules
//! ```
//!
//! # Example
//!
//! ```toml
//! [dependencies]
//! mode = "deny-all"
//! base = "com.acme"
//! externals = ["java.*"]
//!
//! [[dependencies.rule]]
//! name = "api"
//! must-use = ["model"]
//!
//! [[dependencies.rule]]
//! name = "model"
//! may-be-used-by = ["*"]
//! ```

use crate::rules::DependencyRules;

pub mod config_dto;
pub mod loader;

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Rule validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content and builds the declared rule set.
///
/// Returns `Ok(None)` if no `[dependencies]` table is present.
///
/// # Errors
///
/// Returns an error if TOML parsing or rule validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Option<DependencyRules>, LoadRulesError> {
    let dto: config_dto::DeclarativeConfigDto = toml::from_str(content)?;
    match dto.dependencies {
        Some(dependencies) => Ok(Some(loader::load(dependencies)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleMode;

    #[test]
    fn no_section_yields_none() {
        let rules = load_rules_from_toml("[analyzer]\nscope = \"classes\"\n").unwrap();
        assert!(rules.is_none());
    }

    #[test]
    fn loads_rule_table() {
        let rules = load_rules_from_toml(
            r#"
[dependencies]
mode = "deny-all"
base = "com.acme"
externals = ["java.*"]

[[dependencies.rule]]
name = "api"
must-use = ["model"]

[[dependencies.rule]]
name = "model"
may-be-used-by = ["*"]
"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(rules.mode(), RuleMode::DenyAll);
        assert_eq!(rules.len(), 3);
        assert_eq!(rules.rules()[1].pattern().to_string(), "com.acme.api");
        assert_eq!(
            rules.rules()[1].uses().must().iter().next().unwrap().to_string(),
            "com.acme.model"
        );
    }

    #[test]
    fn invalid_toml_is_reported() {
        let result = load_rules_from_toml("[dependencies\nmode = 1");
        assert!(matches!(result, Err(LoadRulesError::Toml(_))));
    }

    #[test]
    fn wrong_field_type_is_reported() {
        let result = load_rules_from_toml("[dependencies]\nexternals = \"java.*\"\n");
        assert!(matches!(result, Err(LoadRulesError::Toml(_))));
    }
}
