//! # Git Plumbing
//!
//! Thin wrappers around the system `git` executable. The user's git
//! configuration (credentials, `insteadOf` rewrites, proxies) applies as is.
//!
//! Every wrapper runs non-interactively (`GIT_TERMINAL_PROMPT=0`), so a
//! remote that wants a password fails instead of blocking on a prompt.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Output};

use log::trace;

use crate::error::{Error, Result};

/// Build a `git` command, optionally rooted at a working tree.
fn git_command(work_tree: Option<&Path>) -> Command {
    let mut cmd = Command::new("git");
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    if let Some(dir) = work_tree {
        cmd.arg("-C").arg(dir);
    }
    cmd
}

/// Run `git <args>` inside `work_tree`, returning the raw output.
///
/// Only a failure to spawn `git` is an error here; a non-zero exit status is
/// left for the caller to interpret.
fn run_raw<I, S>(work_tree: &Path, args: I) -> io::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = git_command(Some(work_tree));
    cmd.args(args);
    trace!("running {:?}", cmd);
    cmd.output()
}

/// Run a git plumbing command and return its trimmed stdout.
fn run(work_tree: &Path, args: &[&str]) -> Result<String> {
    let command = args.join(" ");
    let output = run_raw(work_tree, args).map_err(|e| spawn_error(&command, work_tree, &e))?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            path: work_tree.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Like [`run`], but exit status 1 means "nothing there" rather than failure.
///
/// `git config --get` and `git rev-parse --verify --quiet` both report a
/// missing key or ref this way.
fn run_optional(work_tree: &Path, args: &[&str]) -> Result<Option<String>> {
    let command = args.join(" ");
    let output = run_raw(work_tree, args).map_err(|e| spawn_error(&command, work_tree, &e))?;

    match output.status.code() {
        Some(0) => {
            let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok(Some(value).filter(|v| !v.is_empty()))
        }
        Some(1) => Ok(None),
        _ => Err(Error::GitCommand {
            command,
            path: work_tree.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
    }
}

/// `GitCommand` error for a `git` process that could not be started.
fn spawn_error(command: &str, work_tree: &Path, err: &io::Error) -> Error {
    Error::GitCommand {
        command: command.to_string(),
        path: work_tree.to_path_buf(),
        stderr: spawn_failure_message(err),
    }
}

fn spawn_failure_message(err: &io::Error) -> String {
    if err.kind() == io::ErrorKind::NotFound {
        "git executable not found on PATH".to_string()
    } else {
        err.to_string()
    }
}

fn is_auth_failure(stderr: &str) -> bool {
    stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
        || stderr.contains("terminal prompts disabled")
}

/// Clone `url` at `branch` into `target_dir`, creating parent directories.
///
/// This is a full (non-shallow) clone so that later syncs can fetch and
/// fast-forward the branch like any other working tree.
pub fn clone_branch(url: &str, branch: &str, target_dir: &Path) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut cmd = git_command(None);
    cmd.args(["clone", "--branch", branch, "--", url])
        .arg(target_dir);
    trace!("running {:?}", cmd);

    let output = cmd.output().map_err(|e| Error::GitClone {
        url: url.to_string(),
        r#ref: branch.to_string(),
        message: spawn_failure_message(&e),
        hint: (e.kind() == io::ErrorKind::NotFound)
            .then(|| "Install git and make sure it is on PATH".to_string()),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let hint = is_auth_failure(&stderr).then(|| {
            "Make sure you have access to the repository (SSH key in ssh-agent, \
             git credential helper, or an HTTPS URL for public access)"
                .to_string()
        });

        return Err(Error::GitClone {
            url: url.to_string(),
            r#ref: branch.to_string(),
            message: stderr,
            hint,
        });
    }

    Ok(())
}

/// Check that `path` is the top level of a git working tree.
///
/// A directory nested inside some other repository is rejected, as is a
/// bare repository.
pub fn open_work_tree(path: &Path) -> Result<()> {
    let open_error = |message: String| Error::RepositoryOpen {
        path: path.to_path_buf(),
        message,
    };

    if !path.is_dir() {
        return Err(open_error("not a directory".to_string()));
    }

    let output = run_raw(path, ["rev-parse", "--show-toplevel"])
        .map_err(|e| spawn_error("rev-parse --show-toplevel", path, &e))?;
    if !output.status.success() {
        return Err(open_error(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let toplevel = Path::new(&toplevel)
        .canonicalize()
        .map_err(|e| open_error(format!("cannot resolve {}: {}", toplevel, e)))?;
    let root = path
        .canonicalize()
        .map_err(|e| open_error(format!("cannot resolve root: {}", e)))?;
    if toplevel != root {
        return Err(open_error(format!(
            "directory is inside the working tree of {}",
            toplevel.display()
        )));
    }

    Ok(())
}

/// Read the configured URL of `remote`, or `None` if no such remote exists.
pub fn remote_url(work_tree: &Path, remote: &str) -> Result<Option<String>> {
    let key = format!("remote.{}.url", remote);
    run_optional(work_tree, &["config", "--get", &key])
}

/// Point an existing remote at a new URL, keeping its name.
pub fn set_remote_url(work_tree: &Path, remote: &str, url: &str) -> Result<()> {
    run(work_tree, &["remote", "set-url", remote, url]).map(drop)
}

/// Register a new remote.
pub fn add_remote(work_tree: &Path, remote: &str, url: &str) -> Result<()> {
    run(work_tree, &["remote", "add", remote, url]).map(drop)
}

/// Fetch every branch of `remote` into `refs/remotes/<remote>/*`.
///
/// The refspec is passed explicitly so a tree cloned with `--single-branch`
/// or a narrowed fetch refspec still learns about every branch. Branches
/// deleted upstream are pruned. `url` is only used for error reporting.
pub fn fetch(work_tree: &Path, remote: &str, url: &str) -> Result<()> {
    let refspec = format!("+refs/heads/*:refs/remotes/{}/*", remote);
    let output = run_raw(work_tree, ["fetch", "--prune", remote, refspec.as_str()]).map_err(
        |e| Error::Sync {
            url: url.to_string(),
            message: spawn_failure_message(&e),
        },
    )?;

    if !output.status.success() {
        return Err(Error::Sync {
            url: url.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Resolve a ref (or any revision expression) to a commit id.
pub fn resolve_commit(work_tree: &Path, rev: &str) -> Result<Option<String>> {
    let spec = format!("{}^{{commit}}", rev);
    run_optional(work_tree, &["rev-parse", "--verify", "--quiet", &spec])
}

/// Force `refname` to point at `commit`, creating it if needed.
pub fn update_ref(work_tree: &Path, refname: &str, commit: &str) -> Result<()> {
    run(work_tree, &["update-ref", refname, commit]).map(drop)
}

/// Check out `branch`, discarding local modifications to tracked files.
pub fn checkout_force(work_tree: &Path, branch: &str) -> Result<()> {
    run(work_tree, &["checkout", "--force", branch]).map(drop)
}

/// Name of the currently checked out branch, or `None` when HEAD is detached.
pub fn current_branch(work_tree: &Path) -> Result<Option<String>> {
    run_optional(work_tree, &["symbolic-ref", "--quiet", "--short", "HEAD"])
}
