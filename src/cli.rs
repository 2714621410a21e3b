// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Re-run a command whenever files under a directory change.",
    long_about = None,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Directory to watch for file changes.
    ///
    /// Default: `[watch].dir` from the config file, or `.`.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Comma separated list of patterns to watch files.
    #[arg(long, value_name = "PATTERNS", value_delimiter = ',')]
    pub pattern: Vec<String>,

    /// Comma separated list of patterns to ignore files when changed, e.g. `*_test.go`.
    #[arg(long, value_name = "PATTERNS", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Path to a config file (TOML).
    ///
    /// If omitted, `Watchrun.toml` in the current directory is used when it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print version.
    #[arg(long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Execute in verbose mode (same as `--log-level debug`).
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the configuration, but don't watch or execute.
    #[arg(long)]
    pub dry_run: bool,

    /// Command (and its arguments) to execute when some file is changed.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "CMD")]
    pub command: Vec<String>,
}

impl CliArgs {
    /// Effective log level requested on the command line, if any.
    ///
    /// An explicit `--log-level` wins over `-V`.
    pub fn requested_log_level(&self) -> Option<LogLevel> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level),
            (None, true) => Some(LogLevel::Debug),
            (None, false) => None,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
