//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# dep-assert configuration

[analyzer]
# JSON graph to analyze, relative to this file (--graph wins)
graph = "target/dep-graph.json"

# "packages" or "classes"
scope = "packages"

detect-cycles = true

# Finding kinds that make `dep-assert check` exit with status 1
fail-on = ["missing", "denied", "cycle"]

[dependencies]
# "allow-all": only must-not relations deny
# "deny-all": every edge needs a may-use or must-use relation
mode = "allow-all"

# Prepended to every rule pattern
base = "com.example"

# Code every element may use, not prefixed with base
externals = ["java.*"]

[[dependencies.rule]]
name = "api"
must-use = ["model"]

[[dependencies.rule]]
name = "model"
must-not-use = ["api"]

# A camelCase name becomes a dotted pattern ("subPack" -> "sub.pack"),
# a trailing underscore adds ".*"
# [[dependencies.rule]]
# name = "internal_"
# optional = true
# must-not-be-used-by = ["api"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("dep-assert.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created dep-assert.toml");
    println!("\nNext steps:");
    println!("  1. Export your class graph as JSON");
    println!("  2. Edit dep-assert.toml to declare your rules");
    println!("  3. Run: dep-assert check");

    Ok(())
}
