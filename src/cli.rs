// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Only the `--run-*` flags belong to the tool itself. Everything else is
//! collected verbatim into [`CliArgs::args`]: task path segments, the
//! `=name` / `+name` / `-name` filters, the trailing `?` and any arguments
//! forwarded to the selected command through `$RUNARGS`. Flags therefore
//! have to come before the task path.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `run`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run",
    version,
    about = "Run tasks described in a run.yml file.",
    long_about = None,
    disable_help_flag = true
)]
pub struct CliArgs {
    /// Path to the task file (YAML).
    #[arg(long = "run-path", value_name = "PATH", default_value = "run.yml")]
    pub path: PathBuf,

    /// Print the child task names of the resolved task, one per line.
    #[arg(long = "run-complete")]
    pub complete: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUN_LOG` or a default level will be used.
    #[arg(long = "run-log-level", value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Run the trailing command under a pseudo-terminal and exit with its
    /// status. Used internally by the `faketty` option.
    #[arg(long = "run-faketty", hide = true)]
    pub faketty: bool,

    /// Task path, filters, `?` and forwarded arguments.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
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
