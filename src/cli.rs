//! CLI argument parsing and command dispatch

use std::env;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use ruyi_repo::defaults::{is_truthy, ENV_DEBUG};
use ruyi_repo::output::OutputConfig;

use crate::commands;

/// ruyi-repo - Maintain the local RuyiSDK package index
#[derive(Parser, Debug)]
#[command(name = "ruyi-repo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    ///
    /// Setting RUYI_DEBUG=1 raises the level to debug.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    mirror: commands::MirrorArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update the local package index from its remote
    Update(commands::update::UpdateArgs),

    /// Show the package index configuration
    Config(commands::config::ConfigArgs),

    /// List available packages in the package index
    List(commands::list::ListArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let debug_env = env::var(ENV_DEBUG).ok();
        init_logging(resolve_log_level(&self.log_level, debug_env.as_deref()));
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Update(args) => commands::update::execute(args, &self.mirror, &output),
            Commands::Config(args) => commands::config::execute(args, &self.mirror, &output),
            Commands::List(args) => commands::list::execute(args, &self.mirror, &output),
        }
    }
}

/// Pick the log level from `--log-level` and `RUYI_DEBUG`.
///
/// A truthy `RUYI_DEBUG` never lowers a more verbose flag value.
fn resolve_log_level(flag: &str, debug_env: Option<&str>) -> LevelFilter {
    let level = flag.parse().unwrap_or(LevelFilter::Warn);
    if debug_env.is_some_and(is_truthy) {
        level.max(LevelFilter::Debug)
    } else {
        level
    }
}

fn init_logging(level: LevelFilter) {
    // RUST_LOG can still narrow or widen individual modules.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .try_init();
}
