//! # Error Suggestions
//!
//! Turns library errors into CLI errors that say what went wrong and how to
//! fix it, as `hint:` lines appended to the message.
//!
//! ```rust,ignore
//! manager.sync().map_err(suggestions::explain)?;
//! ```

use crate::error::Error;

/// Attach remediation hints to a library error.
pub fn explain(err: Error) -> anyhow::Error {
    let hints = hints_for(&err);
    if hints.is_empty() {
        return anyhow::Error::new(err);
    }

    let hints: Vec<String> = hints.iter().map(|h| format!("hint: {}", h)).collect();
    anyhow::anyhow!("{}\n\n{}", err, hints.join("\n"))
}

fn hints_for(err: &Error) -> Vec<String> {
    match err {
        Error::RepositoryOpen { path, .. } => vec![
            format!(
                "Remove {} to let ruyi-repo clone a fresh copy",
                path.display()
            ),
            "Use --repo-root or RUYI_REPO_ROOT to choose another location".to_string(),
        ],
        Error::GitClone { .. } => vec![
            "Check the remote URL (--remote, RUYI_REPO_REMOTE)".to_string(),
            "Check the branch name (--branch, RUYI_REPO_BRANCH)".to_string(),
        ],
        Error::Sync { .. } => vec![
            "Check your network connection and run `ruyi-repo update` again".to_string(),
        ],
        Error::BranchNotFound { .. } => vec![
            "Use --branch or RUYI_REPO_BRANCH to track a branch that exists on the remote"
                .to_string(),
        ],
        Error::GitCommand { stderr, .. } if stderr.contains("git executable not found") => {
            vec!["Install git and make sure it is on PATH".to_string()]
        }
        Error::ConfigNotFound { .. } | Error::ConfigParse { .. } => vec![
            "Run `ruyi-repo update` to restore the package index from the remote".to_string(),
        ],
        Error::ManifestParse { .. } | Error::ProfileParse { .. } => vec![
            "The package index looks corrupt".to_string(),
            "Run `ruyi-repo update` to restore it from the remote".to_string(),
        ],
        _ => Vec::new(),
    }
}
