use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `sideload` binary.
#[derive(Debug, Parser)]
#[command(
    name = "sideload",
    version,
    about = "Normalize dataset tables and upload their result folders"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no per-path lines)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra TOML config file, merged over the global and local ones
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL (overrides `server.url`)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Login email (overrides `server.email`)
    #[arg(long, global = true)]
    pub email: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
            url: self.url.clone(),
            email: self.email.clone(),
        }
    }
}
