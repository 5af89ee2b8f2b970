//! # Repository Configuration
//!
//! The metadata repository carries a `config.json` at its root describing
//! repository-wide settings. The only field this crate requires is `dist`,
//! the base location from which package distribution files are fetched;
//! anything else is kept verbatim in [`RepoConfig::extra`] for downstream
//! consumers.
//!
//! The file is read straight from the working tree rather than from a
//! particular commit, so it always reflects whatever is checked out. It is
//! re-read on every call.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults::CONFIG_FILENAME;
use crate::error::{Error, Result};
use crate::mirror::MirroredRepository;

/// Top-level configuration record of the metadata repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Base URL for package distribution files.
    pub dist: String,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read the configuration of a mirrored repository.
pub fn get_config(repo: &MirroredRepository) -> Result<RepoConfig> {
    from_root(repo.root())
}

/// Read `config.json` from the given working tree root.
pub fn from_root(root: &Path) -> Result<RepoConfig> {
    let path = root.join(CONFIG_FILENAME);
    let content = match fs::read(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::ConfigNotFound { path });
        }
        Err(e) => {
            return Err(Error::ConfigParse {
                path,
                message: e.to_string(),
            })
        }
    };

    parse(&content).map_err(|message| Error::ConfigParse { path, message })
}

// The document must be a JSON object; a positional array is not a config.
fn parse(content: &[u8]) -> std::result::Result<RepoConfig, String> {
    let object: Map<String, Value> =
        serde_json::from_slice(content).map_err(|e| e.to_string())?;
    serde_json::from_value(Value::Object(object)).map_err(|e| e.to_string())
}
