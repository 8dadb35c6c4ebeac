//! Locates the configuration file.
//!
//! Order of precedence:
//!
//! 1. `--config` flag
//! 2. `dep-assert.toml` or `.dep-assert.toml` in the project directory or
//!    the nearest ancestor that has one
//! 3. `~/.dep-assert/config.toml`, or `$DEP_ASSERT_CONFIG_DIR/config.toml`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory or one of its ancestors.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config came from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["dep-assert.toml", ".dep-assert.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let project_dir = project_dir
        .canonicalize()
        .unwrap_or_else(|_| project_dir.to_path_buf());
    resolve_with(&project_dir, explicit, global_config_dir())
}

// Takes the global dir as a parameter so tests need no env vars.
fn resolve_with(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_in_ancestors(project_dir) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Returns the global config directory: `$DEP_ASSERT_CONFIG_DIR`, else
/// `~/.dep-assert/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("DEP_ASSERT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".dep-assert"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_is_trusted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dep-assert.toml"), "").unwrap();

        let explicit = Path::new("/nonexistent/rules.toml");
        let result = resolve_with(tmp.path(), Some(explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit.to_path_buf()));
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dep-assert.toml"), "").unwrap();
        fs::write(tmp.path().join(".dep-assert.toml"), "").unwrap();

        let result = resolve_with(tmp.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join("dep-assert.toml"))
        );
    }

    #[test]
    fn dot_prefixed_name_found() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".dep-assert.toml"), "").unwrap();

        let result = resolve_with(tmp.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join(".dep-assert.toml"))
        );
    }

    #[test]
    fn nearest_ancestor_wins() {
        let tmp = TempDir::new().unwrap();
        let module = tmp.path().join("module");
        let nested = module.join("src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("dep-assert.toml"), "").unwrap();
        fs::write(module.join("dep-assert.toml"), "").unwrap();

        let result = resolve_with(&nested, None, None);
        assert_eq!(result, ConfigSource::Project(module.join("dep-assert.toml")));
    }

    #[test]
    fn directory_with_config_name_is_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("dep-assert.toml")).unwrap();
        fs::write(tmp.path().join(".dep-assert.toml"), "").unwrap();

        let result = resolve_with(tmp.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join(".dep-assert.toml"))
        );
    }

    #[test]
    fn global_used_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );
        assert!(result.is_global());
    }

    #[test]
    fn empty_global_dir_means_defaults() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }
}
