// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchcmd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchcmd",
    version,
    about = "Watch a project tree and run commands or call a webhook on changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Watchcmd.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Watchcmd.toml")]
    pub config: String,

    /// Run the configured actions once against an empty change record,
    /// without watching the filesystem. Useful to validate the config.
    #[arg(long)]
    pub once: bool,

    /// Write a commented example `Watchcmd.toml` and exit.
    ///
    /// Refuses to overwrite an existing file.
    #[arg(long)]
    pub init: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHCMD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
