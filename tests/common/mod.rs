//! Shared test utilities for integration and E2E tests.
//!
//! The main fixture is [`Upstream`], a throwaway bare git repository laid
//! out like a package index, with a seed working tree used to push new
//! commits to it. Tests clone it over a plain filesystem path, so nothing
//! here touches the network.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let upstream = Upstream::new();
//!     // ... test code
//! }
//! ```

#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::prelude::*;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::index;
    pub use super::{git, git_available, should_skip_network_tests, Upstream};
}

/// File contents for a small package index.
pub mod index {
    pub const CONFIG: &str = r#"{"dist":"https://example/dist"}"#;
    pub const GCC: &str = r#"{"name":"gcc","kind":["binary"]}"#;
    pub const BINUTILS: &str = r#"{"name":"binutils","kind":["binary"]}"#;
    pub const RISCV64: &str =
        r#"{"arch":"riscv64","profiles":[{"name":"generic"},{"name":"sipeed-lpi4a"}]}"#;
}

/// Whether a working `git` executable is on PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// Run `git` in `dir` with a fixed identity and return trimmed stdout.
///
/// Panics if git exits unsuccessfully.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "commit.gpgsign=false", "-c", "advice.detachedHead=false"])
        .args(args)
        .env("GIT_AUTHOR_NAME", "Index Bot")
        .env("GIT_AUTHOR_EMAIL", "index@example.com")
        .env("GIT_COMMITTER_NAME", "Index Bot")
        .env("GIT_COMMITTER_EMAIL", "index@example.com")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A bare "remote" package index plus a seed working tree that pushes to it.
pub struct Upstream {
    temp_dir: assert_fs::TempDir,
    seed: PathBuf,
    bare: PathBuf,
}

impl Upstream {
    /// Create an upstream whose `main` holds a config, two manifests, and
    /// one profile declaration.
    pub fn new() -> Self {
        let upstream = Self::empty();
        upstream
            .write("config.json", index::CONFIG)
            .write("manifests/a.json", index::GCC)
            .write("manifests/b.json", index::BINUTILS)
            .write("profiles/riscv64.json", index::RISCV64);
        upstream.commit("initial index");
        upstream
    }

    /// Create an upstream with no commits.
    pub fn empty() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let seed = temp_dir.path().join("seed");
        let bare = temp_dir.path().join("upstream.git");
        fs::create_dir_all(&seed).expect("Failed to create seed directory");
        fs::create_dir_all(&bare).expect("Failed to create bare directory");

        git(&bare, &["init", "--quiet", "--bare"]);
        git(&bare, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&seed, &["init", "--quiet"]);
        git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        Self {
            temp_dir,
            seed,
            bare,
        }
    }

    /// A second upstream holding the same history at a different URL.
    pub fn fork(&self) -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let seed = temp_dir.path().join("seed");
        let bare = temp_dir.path().join("upstream.git");
        let source = self.url();

        git(
            temp_dir.path(),
            &["clone", "--quiet", "--bare", &source, "upstream.git"],
        );
        git(temp_dir.path(), &["clone", "--quiet", &source, "seed"]);

        Self {
            temp_dir,
            seed,
            bare,
        }
    }

    /// Write a file into the seed tree (not yet committed).
    pub fn write(&self, path: &str, content: &str) -> &Self {
        self.temp_dir
            .child("seed")
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Remove a file from the seed tree (not yet committed).
    pub fn remove(&self, path: &str) -> &Self {
        fs::remove_file(self.seed.join(path)).expect("Failed to remove file");
        self
    }

    /// Commit everything in the seed tree and push it to `main`.
    pub fn commit(&self, message: &str) -> String {
        self.commit_to("main", message)
    }

    /// Commit everything in the seed tree and push it to `branch`.
    pub fn commit_to(&self, branch: &str, message: &str) -> String {
        let bare = self.url();
        let target = format!("HEAD:refs/heads/{}", branch);
        git(&self.seed, &["add", "-A"]);
        git(&self.seed, &["commit", "--quiet", "--allow-empty", "-m", message]);
        git(&self.seed, &["push", "--quiet", "--force", &bare, &target]);
        git(&self.seed, &["rev-parse", "HEAD"])
    }

    /// Remote URL of the bare repository.
    pub fn url(&self) -> String {
        self.bare.to_string_lossy().into_owned()
    }

    /// Commit id `branch` points at in the bare repository.
    pub fn tip(&self, branch: &str) -> String {
        git(&self.bare, &["rev-parse", &format!("refs/heads/{}", branch)])
    }

    /// Delete the bare repository, making the remote unreachable.
    pub fn destroy(&self) {
        fs::remove_dir_all(&self.bare).expect("Failed to remove bare repository");
    }

    /// A scratch directory that lives as long as this fixture.
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join("scratch").join(name)
    }
}

impl Default for Upstream {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands for the `ruyi-repo` binary pointed at an upstream fixture.
impl Upstream {
    /// A `ruyi-repo` command whose mirror lives at `root` and tracks `main`
    /// of this upstream. Ambient `RUYI_*` settings are cleared.
    pub fn command(&self, root: &Path) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ruyi-repo");
        cmd.env_remove("RUYI_REPO_ROOT")
            .env_remove("RUYI_REPO_REMOTE")
            .env_remove("RUYI_REPO_BRANCH")
            .env_remove("RUYI_DEBUG")
            .env("NO_COLOR", "1")
            .arg("--repo-root")
            .arg(root)
            .arg("--remote")
            .arg(self.url())
            .arg("--branch")
            .arg("main");
        cmd
    }
}
