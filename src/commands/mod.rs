//! # CLI Command Implementations
//!
//! Each subcommand of `ruyi-repo` lives in its own file with an `Args`
//! struct derived with `clap` and an `execute` function that calls into the
//! `ruyi_repo` library.
//!
//! Every command works on the mirror described by [`MirrorArgs`], which are
//! global flags resolved as: command-line flag, then environment variable,
//! then built-in default.

pub mod config;
pub mod list;
pub mod update;

use std::path::PathBuf;

use clap::Args;

use ruyi_repo::defaults::{
    default_repo_root, DEFAULT_BRANCH, DEFAULT_REMOTE, ENV_REPO_BRANCH, ENV_REPO_REMOTE,
    ENV_REPO_ROOT,
};
use ruyi_repo::mirror::{MirrorDescriptor, MirrorManager};

/// Location and upstream of the package index mirror
#[derive(Args, Debug, Clone)]
pub struct MirrorArgs {
    /// Directory holding the local package index.
    ///
    /// Defaults to the system cache directory (`~/.cache/ruyi/packages-index`
    /// on Linux).
    #[arg(long, global = true, value_name = "DIR", env = ENV_REPO_ROOT)]
    pub repo_root: Option<PathBuf>,

    /// URL of the remote package index repository.
    #[arg(long, global = true, value_name = "URL", env = ENV_REPO_REMOTE, default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// Branch of the remote repository to track.
    #[arg(long, global = true, value_name = "BRANCH", env = ENV_REPO_BRANCH, default_value = DEFAULT_BRANCH)]
    pub branch: String,
}

impl MirrorArgs {
    pub fn descriptor(&self) -> MirrorDescriptor {
        let root = self.repo_root.clone().unwrap_or_else(default_repo_root);
        MirrorDescriptor::new(root, self.remote.clone(), self.branch.clone())
    }

    pub fn manager(&self) -> MirrorManager {
        MirrorManager::new(self.descriptor())
    }
}
