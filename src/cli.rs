//! Command-line argument parsing for the replay tool
//!
//! Supports:
//! - Replaying a YAML scenario script
//! - Text or JSON trace output
//! - An explicit config file instead of the user config

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay overlay interaction scenarios against a headless engine
#[derive(Parser, Debug)]
#[command(
    name = "overlay-replay",
    version,
    about = "Replay overlay interaction scenarios"
)]
pub struct CliArgs {
    /// Scenario script (YAML), or the name of one saved in the scripts dir
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Trace output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Engine config file (defaults to the user config)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
