//! # Ruyi Package Metadata Repository
//!
//! This library maintains a local mirror of a git-tracked package metadata
//! repository and reads the structured records stored in it. It is used by
//! the `ruyi-repo` command-line tool and is meant to be embedded by package
//! manager front-ends that need the package index on disk.
//!
//! ## Quick Example
//!
//! ```no_run
//! use ruyi_repo::mirror::{MirrorDescriptor, MirrorManager};
//!
//! let descriptor = MirrorDescriptor::new(
//!     "/tmp/mirror",
//!     "https://github.com/ruyisdk/packages-index.git",
//!     "main",
//! );
//! let mut manager = MirrorManager::new(descriptor);
//!
//! // Clone on first use, then fast-forward to the remote tip
//! manager.sync()?;
//!
//! let repo = manager.ensure()?;
//! println!("dist: {}", repo.config()?.dist);
//! for manifest in repo.manifests() {
//!     let manifest = manifest?;
//!     println!("{}", manifest.name().unwrap_or("<unnamed>"));
//! }
//! # Ok::<(), ruyi_repo::error::Error>(())
//! ```
//!
//! ## Repository Layout
//!
//! - `config.json`: repository-wide settings, at least `dist` ([`config`]).
//! - `manifests/*.json`: one package manifest per file ([`records`]).
//! - `profiles/*.json`: one architecture profile declaration per file
//!   ([`records`]).
//!
//! ## Core Concepts
//!
//! - **Mirror (`mirror`, `git`)**: open-or-clone of the working tree and
//!   fast-forward-overwrite sync against the remote branch.
//! - **Configuration (`config`)**: the repository's `config.json`.
//! - **Records (`records`)**: lazy, fail-fast enumeration of manifests and
//!   profiles.
//! - **Errors (`error`, `suggestions`)**: one error enum for the whole crate,
//!   plus CLI-facing hints for resolving each failure.
//! - **Output (`output`)**: color and emoji handling for the CLI.

pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod mirror;
pub mod output;
pub mod records;
pub mod suggestions;
