//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resbase - compare deployed Kubernetes resources against an approved baseline.
#[derive(Parser, Debug)]
#[command(name = "resbase")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "RESBASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a template configuration file.
    Init {
        /// Directory to initialize (defaults to current directory).
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Force overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Compare deployed resources against the baseline.
    Compare {
        /// Print every differing row, not just the summary.
        #[arg(short, long)]
        detailed: bool,

        /// Do not write report files.
        #[arg(long)]
        no_write: bool,

        /// Exit with a failure status when anything differs.
        #[arg(long)]
        fail_on_diff: bool,
    },

    /// Summarize the baseline file.
    Baseline,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compare_flags() {
        let cli = Cli::try_parse_from(["resbase", "-c", "my.yaml", "compare", "--detailed", "--fail-on-diff"])
            .expect("arguments parse");

        assert_eq!(cli.config, Some(PathBuf::from("my.yaml")));
        assert!(matches!(
            cli.command,
            Commands::Compare {
                detailed: true,
                no_write: false,
                fail_on_diff: true
            }
        ));
    }

    #[test]
    fn test_global_output_after_subcommand() {
        let cli = Cli::try_parse_from(["resbase", "baseline", "--output", "json"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Baseline));
    }

    #[test]
    fn test_init_defaults() {
        let cli = Cli::try_parse_from(["resbase", "init"]).unwrap();
        match cli.command {
            Commands::Init { path, force } => {
                assert_eq!(path, PathBuf::from("."));
                assert!(!force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
