//! dep-assert CLI tool.
//!
//! Usage:
//! ```bash
//! dep-assert check [OPTIONS] [PATH]
//! dep-assert init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use dep_assert_core::Scope;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Checks dependency rules and cycles of a package or class graph
#[derive(Parser)]
#[command(name = "dep-assert")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the graph against the configured rules
    Check {
        /// Project directory used to find the configuration (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// JSON graph to analyze (overrides `analyzer.graph`)
        #[arg(short, long)]
        graph: Option<PathBuf>,

        /// Analyze packages or classes (overrides `analyzer.scope`)
        #[arg(short, long)]
        scope: Option<ScopeArg>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Skip cycle detection
        #[arg(long)]
        no_cycles: bool,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for findings.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

/// Scope selection on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ScopeArg {
    /// Package graph.
    Packages,
    /// Class graph.
    Classes,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Packages => Self::Packages,
            ScopeArg::Classes => Self::Classes,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            graph,
            scope,
            format,
            no_cycles,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                graph,
                scope: scope.map(Scope::from),
                format,
                no_cycles,
            };
            commands::check::run(&source, &options)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
