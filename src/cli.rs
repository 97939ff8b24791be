//! CLI argument parsing for calltrace

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for rendered traces
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented human-readable trace (default)
    Text,
    /// JSON document for machine parsing
    Json,
}

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color only when stdout is a terminal
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "calltrace")]
#[command(version)]
#[command(about = "Replay recorded call/return events as an indented execution trace", long_about = None)]
pub struct Cli {
    /// Event script (JSON) to replay
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Maximum recorded call depth
    #[arg(short = 'd', long = "max-depth", value_name = "DEPTH")]
    pub max_depth: Option<u32>,

    /// Path cut marker for display (repeatable, comma-separated accepted)
    #[arg(long = "path-cut", value_name = "MARKER")]
    pub path_cuts: Vec<String>,

    /// Reject events whose caller or callee path contains this substring (repeatable)
    #[arg(long = "path-filter", value_name = "SUBSTR")]
    pub path_filters: Vec<String>,

    /// Dump local bindings under each call
    #[arg(short = 'a', long = "show-args")]
    pub show_args: bool,

    /// Load tracer configuration from a TOML file (flags override it)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Colorize text output
    #[arg(long = "color", value_enum, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable debug logging on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
