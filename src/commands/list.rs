//! # List Command Implementation
//!
//! This module implements the `list` subcommand, which lists the packages
//! (or, with `list profiles`, the architecture profiles) declared in the
//! local package index.
//!
//! ## Functionality
//!
//! - **Packages**: one line per manifest, using its `name` field or, failing
//!   that, the manifest's file name.
//! - **Profiles**: one line per architecture, followed by the names of the
//!   profiles it declares.
//! - **Verbose**: `--verbose` prints each record as pretty JSON instead.
//!
//! Output is sorted by name so repeated runs are stable; the index itself
//! makes no ordering promise. A single malformed record fails the whole
//! listing.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{Map, Value};

use ruyi_repo::error::Result as RepoResult;
use ruyi_repo::output::OutputConfig;
use ruyi_repo::records::{ArchProfileDecl, PackageManifest};
use ruyi_repo::suggestions::explain;

use super::MirrorArgs;

/// List available packages in the package index
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Also show details for every entry
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub target: Option<ListTarget>,
}

#[derive(Subcommand, Debug)]
pub enum ListTarget {
    /// List all available profiles
    Profiles,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, mirror: &MirrorArgs, output: &OutputConfig) -> Result<()> {
    let mut manager = mirror.manager();
    let repo = manager.ensure().map_err(explain)?;

    match args.target {
        None => {
            let manifests: Vec<PackageManifest> =
                repo.manifests().collect::<RepoResult<_>>().map_err(explain)?;
            list_manifests(manifests, args.verbose, output)
        }
        Some(ListTarget::Profiles) => {
            let profiles: Vec<ArchProfileDecl> =
                repo.profiles().collect::<RepoResult<_>>().map_err(explain)?;
            list_profiles(profiles, args.verbose, output)
        }
    }
}

fn manifest_label(manifest: &PackageManifest) -> String {
    manifest
        .name()
        .or_else(|| manifest.file_stem())
        .unwrap_or("<unnamed>")
        .to_string()
}

fn profile_label(decl: &ArchProfileDecl) -> String {
    decl.arch()
        .or_else(|| decl.file_stem())
        .unwrap_or("<unnamed>")
        .to_string()
}

/// Names of the profiles inside an architecture declaration.
fn profile_names(decl: &ArchProfileDecl) -> Vec<&str> {
    decl.get("profiles")
        .and_then(Value::as_array)
        .map(|profiles| {
            profiles
                .iter()
                .filter_map(|p| p.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

fn print_json(object: &Map<String, Value>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(object)?);
    Ok(())
}

fn list_manifests(
    mut manifests: Vec<PackageManifest>,
    verbose: bool,
    output: &OutputConfig,
) -> Result<()> {
    if manifests.is_empty() {
        println!("No packages found in the package index.");
        return Ok(());
    }

    manifests.sort_by_key(manifest_label);
    for manifest in &manifests {
        if verbose {
            print_json(manifest.as_object())?;
        } else {
            println!("{}", output.name(&manifest_label(manifest)));
        }
    }

    Ok(())
}

fn list_profiles(
    mut profiles: Vec<ArchProfileDecl>,
    verbose: bool,
    output: &OutputConfig,
) -> Result<()> {
    if profiles.is_empty() {
        println!("No profiles found in the package index.");
        return Ok(());
    }

    profiles.sort_by_key(profile_label);
    for decl in &profiles {
        if verbose {
            print_json(decl.as_object())?;
            continue;
        }

        println!("{}", output.name(&profile_label(decl)));
        for name in profile_names(decl) {
            println!("  {}", name);
        }
    }

    Ok(())
}
