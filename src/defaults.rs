//! Default values for ruyi-repo configuration.
//!
//! This module provides centralized default values used by the library and
//! the CLI, covering the mirror layout, the upstream repository, and the
//! environment variables that override them.

use std::path::PathBuf;

/// Upstream metadata repository used when no remote is configured.
pub const DEFAULT_REMOTE: &str = "https://github.com/ruyisdk/packages-index.git";

/// Branch tracked when no branch is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Name of the git remote the mirror tracks.
pub const DEFAULT_REMOTE_NAME: &str = "origin";

/// Repository configuration file at the mirror root.
pub const CONFIG_FILENAME: &str = "config.json";

/// Directory holding package manifests.
pub const MANIFESTS_DIR: &str = "manifests";

/// Directory holding architecture profile declarations.
pub const PROFILES_DIR: &str = "profiles";

/// Environment variable overriding the mirror root.
pub const ENV_REPO_ROOT: &str = "RUYI_REPO_ROOT";

/// Environment variable overriding the remote URL.
pub const ENV_REPO_REMOTE: &str = "RUYI_REPO_REMOTE";

/// Environment variable overriding the tracked branch.
pub const ENV_REPO_BRANCH: &str = "RUYI_REPO_BRANCH";

/// Environment variable enabling debug output.
pub const ENV_DEBUG: &str = "RUYI_DEBUG";

/// Returns the default mirror root.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/ruyi/packages-index` (XDG Base Directory)
/// - macOS: `~/Library/Caches/ruyi/packages-index`
/// - Windows: `{FOLDERID_LocalAppData}\ruyi\packages-index`
///
/// Falls back to `.ruyi-cache/packages-index` in the current directory if
/// the platform cache directory cannot be determined.
pub fn default_repo_root() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("ruyi"))
        .unwrap_or_else(|| PathBuf::from(".ruyi-cache"))
        .join("packages-index")
}

/// Whether a `RUYI_DEBUG` value turns debug output on.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "x" | "y" | "yes"
    )
}
