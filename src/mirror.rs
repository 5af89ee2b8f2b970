//! # Metadata Repository Mirror
//!
//! This module provides the `MirrorManager`, which owns the local working
//! tree of the package metadata repository and keeps it in step with a
//! branch of a remote repository.
//!
//! ## Design
//!
//! The manager talks to version control exclusively through the
//! **`GitOperations`** trait. In the application `DefaultGitOperations` is
//! used, which drives the system `git` command (see [`crate::git`]). Tests
//! swap in a mock to exercise the open-or-clone and sync logic without git
//! or network access.
//!
//! ## Lifecycle
//!
//! A manager is built from a [`MirrorDescriptor`] and materializes the
//! working tree lazily: the first call to [`MirrorManager::ensure`] either
//! opens an existing tree at the descriptor's root or clones the remote
//! into it. The resulting [`MirroredRepository`] handle is cached for the
//! lifetime of the manager.
//!
//! ## Sync semantics
//!
//! [`MirrorManager::sync`] is a fast-forward-overwrite: after it succeeds
//! the tracked branch points at the remote tip no matter where it pointed
//! before, and the working tree is checked out at that commit. Nobody is
//! expected to commit to the mirror, so local divergence is discarded.
//!
//! Sync is not atomic. If it stops halfway the tree is left as the last
//! completed step made it, and calling `sync` again converges because every
//! step forces state rather than deriving it from what was there.

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{self, RepoConfig};
use crate::defaults::{DEFAULT_REMOTE_NAME, MANIFESTS_DIR, PROFILES_DIR};
use crate::error::{Error, Result};
use crate::records::{self, ArchProfileDecl, PackageManifest, RecordIter};

/// Version-control operations needed by the mirror - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` at `branch` into `target_dir`, creating parent
    /// directories as needed.
    fn clone_branch(&self, url: &str, branch: &str, target_dir: &Path) -> Result<()>;

    /// Verifies that `path` is the top level of an existing working tree.
    fn open(&self, path: &Path) -> Result<()>;

    /// Returns the configured URL of `remote`, or `None` if it is not set up.
    fn remote_url(&self, work_tree: &Path, remote: &str) -> Result<Option<String>>;

    /// Points `remote` at a new URL.
    fn set_remote_url(&self, work_tree: &Path, remote: &str, url: &str) -> Result<()>;

    /// Registers `remote` with the given URL.
    fn add_remote(&self, work_tree: &Path, remote: &str, url: &str) -> Result<()>;

    /// Fetches all branches of `remote`. `url` is used for error reporting.
    fn fetch(&self, work_tree: &Path, remote: &str, url: &str) -> Result<()>;

    /// Resolves a ref to a commit id, `None` if the ref does not exist.
    fn resolve_commit(&self, work_tree: &Path, rev: &str) -> Result<Option<String>>;

    /// Forces `refname` to `commit`.
    fn update_ref(&self, work_tree: &Path, refname: &str, commit: &str) -> Result<()>;

    /// Checks out `branch`, overwriting tracked files in the working tree.
    fn checkout(&self, work_tree: &Path, branch: &str) -> Result<()>;

    /// Returns the checked out branch, `None` for a detached HEAD.
    fn current_branch(&self, work_tree: &Path) -> Result<Option<String>>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_branch(&self, url: &str, branch: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone_branch(url, branch, target_dir)
    }

    fn open(&self, path: &Path) -> Result<()> {
        crate::git::open_work_tree(path)
    }

    fn remote_url(&self, work_tree: &Path, remote: &str) -> Result<Option<String>> {
        crate::git::remote_url(work_tree, remote)
    }

    fn set_remote_url(&self, work_tree: &Path, remote: &str, url: &str) -> Result<()> {
        crate::git::set_remote_url(work_tree, remote, url)
    }

    fn add_remote(&self, work_tree: &Path, remote: &str, url: &str) -> Result<()> {
        crate::git::add_remote(work_tree, remote, url)
    }

    fn fetch(&self, work_tree: &Path, remote: &str, url: &str) -> Result<()> {
        crate::git::fetch(work_tree, remote, url)
    }

    fn resolve_commit(&self, work_tree: &Path, rev: &str) -> Result<Option<String>> {
        crate::git::resolve_commit(work_tree, rev)
    }

    fn update_ref(&self, work_tree: &Path, refname: &str, commit: &str) -> Result<()> {
        crate::git::update_ref(work_tree, refname, commit)
    }

    fn checkout(&self, work_tree: &Path, branch: &str) -> Result<()> {
        crate::git::checkout_force(work_tree, branch)
    }

    fn current_branch(&self, work_tree: &Path) -> Result<Option<String>> {
        crate::git::current_branch(work_tree)
    }
}

/// Where a mirror lives and what it tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorDescriptor {
    /// Root of the local working tree.
    pub root: PathBuf,
    /// URL of the upstream repository.
    pub remote: String,
    /// Branch of the upstream repository to track.
    pub branch: String,
}

impl MirrorDescriptor {
    pub fn new(
        root: impl Into<PathBuf>,
        remote: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            remote: remote.into(),
            branch: branch.into(),
        }
    }
}

/// Handle to an opened or freshly cloned mirror working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredRepository {
    root: PathBuf,
    remote_name: String,
}

impl MirroredRepository {
    pub(crate) fn new(root: PathBuf, remote_name: &str) -> Self {
        Self {
            root,
            remote_name: remote_name.to_string(),
        }
    }

    /// Root directory of the working tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the git remote the mirror tracks.
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.root.join(MANIFESTS_DIR)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join(PROFILES_DIR)
    }

    /// Read `config.json` from the checked out tree. See [`config::get_config`].
    pub fn config(&self) -> Result<RepoConfig> {
        config::get_config(self)
    }

    /// Enumerate package manifests. See [`records::iter_manifests`].
    pub fn manifests(&self) -> RecordIter<PackageManifest> {
        records::iter_manifests(self)
    }

    /// Enumerate architecture profiles. See [`records::iter_profiles`].
    pub fn profiles(&self) -> RecordIter<ArchProfileDecl> {
        records::iter_profiles(self)
    }
}

/// Owner of a single mirror working tree.
///
/// `ensure` and `sync` take `&mut self`; sharing a manager across threads
/// requires wrapping it in a mutex.
pub struct MirrorManager {
    descriptor: MirrorDescriptor,
    git_ops: Box<dyn GitOperations>,
    repo: Option<MirroredRepository>,
}

impl MirrorManager {
    /// Creates a manager that uses the system `git` command.
    pub fn new(descriptor: MirrorDescriptor) -> Self {
        Self::with_operations(descriptor, Box::new(DefaultGitOperations))
    }

    /// Creates a manager with a custom `GitOperations` implementation.
    pub fn with_operations(
        descriptor: MirrorDescriptor,
        git_ops: Box<dyn GitOperations>,
    ) -> Self {
        Self {
            descriptor,
            git_ops,
            repo: None,
        }
    }

    pub fn descriptor(&self) -> &MirrorDescriptor {
        &self.descriptor
    }

    /// The cached repository handle, if `ensure` has already succeeded.
    pub fn repository(&self) -> Option<&MirroredRepository> {
        self.repo.as_ref()
    }

    pub fn is_materialized(&self) -> bool {
        self.repo.is_some()
    }

    /// Opens or clones the working tree, caching the handle.
    ///
    /// - A cached handle is returned as is.
    /// - If the root exists it is opened; its remote and branch are not
    ///   checked against the descriptor, and no network access happens.
    /// - Otherwise the remote branch is cloned into the root.
    pub fn ensure(&mut self) -> Result<&MirroredRepository> {
        let repo = match self.repo.take() {
            Some(repo) => repo,
            None => self.materialize()?,
        };
        Ok(self.repo.insert(repo))
    }

    fn materialize(&self) -> Result<MirroredRepository> {
        let MirrorDescriptor {
            root,
            remote,
            branch,
        } = &self.descriptor;

        if root.exists() {
            self.git_ops.open(root)?;
        } else {
            debug!("{} does not exist, cloning from {}", root.display(), remote);
            self.git_ops.clone_branch(remote, branch, root)?;
        }

        Ok(MirroredRepository::new(root.clone(), DEFAULT_REMOTE_NAME))
    }

    /// Brings the working tree to the remote branch tip.
    ///
    /// Steps, each fatal on failure:
    /// 1. `ensure` the working tree.
    /// 2. Repoint the remote at the descriptor's URL if it differs (or add
    ///    it if missing).
    /// 3. Fetch all branches from the remote.
    /// 4. Force the local branch to the fetched remote tip.
    /// 5. Force-checkout the branch.
    pub fn sync(&mut self) -> Result<()> {
        let repo = self.ensure()?.clone();
        let root = repo.root();
        let remote = repo.remote_name();
        let MirrorDescriptor {
            remote: url,
            branch,
            ..
        } = &self.descriptor;

        match self.git_ops.remote_url(root, remote)? {
            Some(current) if current == *url => {}
            Some(current) => {
                debug!("repointing remote {} from {} to {}", remote, current, url);
                self.git_ops.set_remote_url(root, remote, url)?;
            }
            None => {
                debug!("remote {} missing, adding it as {}", remote, url);
                self.git_ops.add_remote(root, remote, url)?;
            }
        }

        debug!("fetching {} from {}", remote, url);
        self.git_ops.fetch(root, remote, url)?;

        let tracking_ref = format!("refs/remotes/{}/{}", remote, branch);
        let tip = self
            .git_ops
            .resolve_commit(root, &tracking_ref)?
            .ok_or_else(|| Error::BranchNotFound {
                url: url.clone(),
                branch: branch.clone(),
            })?;

        debug!("moving {} to {}", branch, tip);
        self.git_ops
            .update_ref(root, &format!("refs/heads/{}", branch), &tip)?;
        self.git_ops.checkout(root, branch)?;

        Ok(())
    }

    /// Commit id currently checked out in the mirror.
    pub fn head_commit(&mut self) -> Result<Option<String>> {
        let root = self.ensure()?.root().to_path_buf();
        self.git_ops.resolve_commit(&root, "HEAD")
    }

    /// Branch currently checked out in the mirror.
    pub fn current_branch(&mut self) -> Result<Option<String>> {
        let root = self.ensure()?.root().to_path_buf();
        self.git_ops.current_branch(&root)
    }
}
