//! CLI module for the baseline monitor.
//!
//! This module provides the command-line interface for comparing deployed
//! resources against a baseline.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
