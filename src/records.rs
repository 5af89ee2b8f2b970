//! # Manifest and Profile Records
//!
//! The metadata repository stores one JSON object per file in two flat
//! directories:
//!
//! - `manifests/*.json`: package manifests ([`PackageManifest`])
//! - `profiles/*.json`: architecture profile declarations ([`ArchProfileDecl`])
//!
//! Both are enumerated lazily by [`RecordIter`]: the directory is listed when
//! the iterator is created, and each file is read and parsed only when the
//! iterator is advanced. Enumeration order is whatever the directory listing
//! returns.
//!
//! A file that cannot be read or does not hold a JSON object ends the
//! enumeration with an error. Malformed entries are never skipped.
//!
//! Beyond "is a JSON object", the schema of a record belongs to whoever
//! consumes it.

use std::ffi::OsStr;
use std::fs::{self, DirEntry, ReadDir};
use std::io;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::mirror::MirroredRepository;

/// File extension of record files.
pub const RECORD_EXTENSION: &str = "json";

/// Whether a directory entry name looks like a record file (`*.json`,
/// not a dot-file). Works on the raw name, so non-UTF-8 names still count.
fn is_record_name(name: &OsStr) -> bool {
    !name.as_encoded_bytes().starts_with(b".")
        && Path::new(name).extension() == Some(OsStr::new(RECORD_EXTENSION))
}

/// A JSON-object record loaded from a file in the metadata repository.
pub trait Record: Sized {
    /// Build the record from a parsed object and the file it came from.
    fn from_object(path: PathBuf, object: Map<String, Value>) -> Self;

    /// The error reported when a file of this kind is malformed.
    fn parse_error(path: PathBuf, message: String) -> Error;

    /// Read and parse one record file.
    fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read(path).map_err(|e| Self::parse_error(path.to_path_buf(), e.to_string()))?;
        let object: Map<String, Value> = serde_json::from_slice(&content)
            .map_err(|e| Self::parse_error(path.to_path_buf(), e.to_string()))?;
        Ok(Self::from_object(path.to_path_buf(), object))
    }
}

macro_rules! json_record {
    ($(#[$meta:meta])* $name:ident, $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            path: PathBuf,
            object: Map<String, Value>,
        }

        impl $name {
            /// File this record was read from.
            pub fn path(&self) -> &Path {
                &self.path
            }

            /// File name without the `.json` extension.
            pub fn file_stem(&self) -> Option<&str> {
                self.path.file_stem().and_then(|s| s.to_str())
            }

            /// Look up a top-level field.
            pub fn get(&self, key: &str) -> Option<&Value> {
                self.object.get(key)
            }

            pub fn as_object(&self) -> &Map<String, Value> {
                &self.object
            }

            pub fn into_object(self) -> Map<String, Value> {
                self.object
            }
        }

        impl Record for $name {
            fn from_object(path: PathBuf, object: Map<String, Value>) -> Self {
                Self { path, object }
            }

            fn parse_error(path: PathBuf, message: String) -> Error {
                Error::$variant { path, message }
            }
        }
    };
}

json_record!(
    /// A package manifest: one installable package and its versions.
    PackageManifest,
    ManifestParse
);

json_record!(
    /// Declaration of the profiles available for one target architecture.
    ArchProfileDecl,
    ProfileParse
);

impl PackageManifest {
    /// The package name, if the manifest carries a string `name` field.
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }
}

impl ArchProfileDecl {
    /// The architecture, if the declaration carries a string `arch` field.
    pub fn arch(&self) -> Option<&str> {
        self.get("arch").and_then(Value::as_str)
    }
}

/// Lazy, fail-fast enumeration of the records in one directory.
///
/// Yields `Ok(record)` per matching file. The first failure is yielded as
/// `Err` and ends the iteration.
pub struct RecordIter<R> {
    dir: PathBuf,
    entries: Option<ReadDir>,
    pending: Option<Error>,
    _record: PhantomData<R>,
}

impl<R: Record> RecordIter<R> {
    /// Enumerate `*.json` files directly inside `dir`.
    ///
    /// A missing directory is an empty enumeration. Any other listing
    /// failure is reported by the first call to `next`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let (entries, pending) = match fs::read_dir(&dir) {
            Ok(entries) => (Some(entries), None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => (None, None),
            Err(e) => (None, Some(R::parse_error(dir.clone(), e.to_string()))),
        };

        Self {
            dir,
            entries,
            pending,
            _record: PhantomData,
        }
    }

    /// Directory being enumerated.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_record(&mut self) -> Option<Result<R>> {
        let entries = self.entries.as_mut()?;

        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(R::parse_error(self.dir.clone(), e.to_string()))),
            };
            if !is_record_name(&entry.file_name()) {
                continue;
            }

            let path = entry.path();
            match is_directory(&entry) {
                Ok(true) => continue,
                Ok(false) => return Some(R::load(&path)),
                Err(e) => return Some(Err(R::parse_error(path, e.to_string()))),
            }
        }

        None
    }
}

// Symlinks count as directories only when their target is one; a dangling
// link is left for `load` to report.
fn is_directory(entry: &DirEntry) -> io::Result<bool> {
    let file_type = entry.file_type()?;
    if file_type.is_symlink() {
        Ok(entry.path().is_dir())
    } else {
        Ok(file_type.is_dir())
    }
}

impl<R: Record> Iterator for RecordIter<R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return Some(Err(err));
        }

        let item = self.next_record();
        if !matches!(item, Some(Ok(_))) {
            self.entries = None;
        }
        item
    }
}

impl<R: Record> FusedIterator for RecordIter<R> {}

/// Enumerate the package manifests of a mirrored repository.
pub fn iter_manifests(repo: &MirroredRepository) -> RecordIter<PackageManifest> {
    RecordIter::from_dir(repo.manifests_dir())
}

/// Enumerate the architecture profile declarations of a mirrored repository.
pub fn iter_profiles(repo: &MirroredRepository) -> RecordIter<ArchProfileDecl> {
    RecordIter::from_dir(repo.profiles_dir())
}
