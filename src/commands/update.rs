//! # Update Command Implementation
//!
//! This module implements the `update` subcommand, which brings the local
//! package index in line with its remote.
//!
//! ## Functionality
//!
//! - **First run**: clones the remote branch into the mirror root.
//! - **Remote change**: if the configured remote URL differs from the one
//!   recorded in the mirror, the mirror's remote is repointed first.
//! - **Sync**: fetches the remote and moves the local branch to the remote
//!   tip, discarding any local divergence, then checks it out.
//!
//! On success the new head commit is printed.

use anyhow::Result;
use clap::Args;

use ruyi_repo::output::OutputConfig;
use ruyi_repo::suggestions::explain;

use super::MirrorArgs;

/// Update the local package index from its remote
#[derive(Args, Debug)]
pub struct UpdateArgs {}

/// Execute the `update` command.
pub fn execute(_args: UpdateArgs, mirror: &MirrorArgs, output: &OutputConfig) -> Result<()> {
    let mut manager = mirror.manager();
    let descriptor = manager.descriptor().clone();

    println!(
        "{} Updating package index from {} ({})",
        output.marker("🔄", "[SYNC]"),
        descriptor.remote,
        descriptor.branch
    );

    manager.sync().map_err(explain)?;

    let head = manager.head_commit().map_err(explain)?;
    let head = head
        .as_deref()
        .map(|id| output.commit(id))
        .unwrap_or_else(|| "(no commit)".to_string());

    println!(
        "{} Package index at {} is up to date at {}",
        output.marker("✅", "[OK]"),
        descriptor.root.display(),
        head
    );

    Ok(())
}
