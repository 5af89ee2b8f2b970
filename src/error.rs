//! # Error Handling
//!
//! This module defines the error type shared by every part of the
//! `ruyi-repo` library. It uses `thiserror` to derive a single `Error` enum
//! covering the failure modes of the metadata mirror:
//!
//! - Opening an existing working tree that turns out not to be a repository.
//! - Cloning the remote for the first time.
//! - Fetching from the remote during a sync.
//! - Looking up the tracked branch on the remote.
//! - Any other git plumbing step (remote URL update, ref update, checkout).
//! - Reading and parsing `config.json`, manifests, and profiles.
//!
//! Nothing in the library recovers from these errors. They are surfaced to
//! the immediate caller, and the `Result<T>` alias keeps signatures short.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for ruyi-repo operations
#[derive(Error, Debug)]
pub enum Error {
    /// The mirror root exists but is not the top level of a git working tree.
    #[error("Cannot open repository at {}: {message}", path.display())]
    RepositoryOpen { path: PathBuf, message: String },

    /// An error occurred while cloning the remote into the mirror root.
    ///
    /// Includes the repository URL, the branch being cloned, git's error
    /// output, and an optional hint for resolution.
    #[error("Git clone error for {url}@{r#ref}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// Fetching from the remote failed during a sync.
    #[error("Failed to sync from {url}: {message}")]
    Sync { url: String, message: String },

    /// The remote has no branch with the tracked name.
    #[error("Branch '{branch}' not found on remote {url}")]
    BranchNotFound { url: String, branch: String },

    /// A git plumbing command other than clone or fetch failed.
    #[error("Git command failed in {}: {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// `config.json` is missing from the mirror root.
    #[error("Repository config not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// `config.json` exists but is not a valid config record.
    #[error("Repository config parsing error in {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// A package manifest could not be read or parsed.
    #[error("Malformed package manifest {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// An architecture profile declaration could not be read or parsed.
    #[error("Malformed architecture profile {}: {message}", path.display())]
    ProfileParse { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_repository_open() {
        let error = Error::RepositoryOpen {
            path: PathBuf::from("/tmp/mirror"),
            message: "not a git repository".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Cannot open repository"));
        assert!(display.contains("/tmp/mirror"));
        assert!(display.contains("not a git repository"));
    }

    #[test]
    fn test_error_display_git_clone() {
        let error = Error::GitClone {
            url: "https://example.org/repo.git".to_string(),
            r#ref: "main".to_string(),
            message: "Repository not found".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Git clone error"));
        assert!(display.contains("https://example.org/repo.git@main"));
        assert!(display.contains("Repository not found"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_git_clone_with_hint() {
        let error = Error::GitClone {
            url: "git@example.org:repo.git".to_string(),
            r#ref: "main".to_string(),
            message: "Permission denied".to_string(),
            hint: Some("Check SSH keys".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("hint:"));
        assert!(display.contains("Check SSH keys"));
    }

    #[test]
    fn test_error_display_sync() {
        let error = Error::Sync {
            url: "https://example.org/repo.git".to_string(),
            message: "Could not resolve host".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to sync"));
        assert!(display.contains("Could not resolve host"));
    }

    #[test]
    fn test_error_display_branch_not_found() {
        let error = Error::BranchNotFound {
            url: "https://example.org/repo.git".to_string(),
            branch: "stable".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("'stable'"));
        assert!(display.contains("https://example.org/repo.git"));
    }

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "checkout --force main".to_string(),
            path: PathBuf::from("/tmp/mirror"),
            stderr: "error: pathspec".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("checkout --force main"));
        assert!(display.contains("error: pathspec"));
    }

    #[test]
    fn test_error_display_config() {
        let not_found = Error::ConfigNotFound {
            path: PathBuf::from("/tmp/mirror/config.json"),
        };
        assert!(not_found.to_string().contains("config not found"));

        let parse = Error::ConfigParse {
            path: PathBuf::from("/tmp/mirror/config.json"),
            message: "missing field `dist`".to_string(),
        };
        assert!(parse.to_string().contains("missing field `dist`"));
    }

    #[test]
    fn test_error_display_record_parse() {
        let manifest = Error::ManifestParse {
            path: PathBuf::from("manifests/gcc.json"),
            message: "EOF while parsing".to_string(),
        };
        assert!(manifest.to_string().contains("package manifest"));
        assert!(manifest.to_string().contains("manifests/gcc.json"));

        let profile = Error::ProfileParse {
            path: PathBuf::from("profiles/riscv64.json"),
            message: "expected value".to_string(),
        };
        assert!(profile.to_string().contains("architecture profile"));
        assert!(profile.to_string().contains("profiles/riscv64.json"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }
}
