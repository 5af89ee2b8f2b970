//! # Config Command Implementation
//!
//! This module implements the `config` subcommand, which prints the
//! `config.json` record of the local package index. The mirror is cloned
//! first if it does not exist yet; an existing mirror is read as is, without
//! contacting the remote.

use anyhow::Result;
use clap::Args;

use ruyi_repo::output::OutputConfig;
use ruyi_repo::suggestions::explain;

use super::MirrorArgs;

/// Show the package index configuration
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the whole configuration record as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `config` command.
pub fn execute(args: ConfigArgs, mirror: &MirrorArgs, output: &OutputConfig) -> Result<()> {
    let mut manager = mirror.manager();
    let repo = manager.ensure().map_err(explain)?;
    let config = repo.config().map_err(explain)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}: {}", output.name("dist"), config.dist);
    for (key, value) in &config.extra {
        println!("{}: {}", output.name(key), value);
    }

    Ok(())
}
