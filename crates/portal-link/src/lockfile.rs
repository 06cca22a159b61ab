//! Read-only view of an npm `package-lock.json` dependency map.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::LinkError;

/// File name looked up by the CLI.
pub const LOCKFILE_NAME: &str = "package-lock.json";

/// Logical package name for a lockfile path: everything after the last
/// `node_modules` segment, or the whole path if there is none.
///
/// `node_modules/a/node_modules/@scope/b` → `@scope/b`.
pub fn package_name(rel_path: &str) -> String {
    let parts: Vec<&str> = rel_path.split('/').collect();
    let start = parts
        .iter()
        .rposition(|part| *part == "node_modules")
        .map_or(0, |i| i + 1);
    parts[start..].join("/")
}

/// One entry of the lockfile's `packages` map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Path relative to the lockfile's directory, `/`-separated.
    pub rel_path: String,
    /// Derived logical name.
    pub name: String,
    /// The package manager already materialized this entry as a symlink.
    pub already_linked: bool,
}

impl DependencyEntry {
    pub fn new(rel_path: impl Into<String>, already_linked: bool) -> Self {
        let rel_path = rel_path.into();
        let name = package_name(&rel_path);
        Self {
            rel_path,
            name,
            already_linked,
        }
    }
}

#[derive(Deserialize)]
struct RawLockfile {
    /// Kept in file order; entries are processed in that order.
    #[serde(default)]
    packages: IndexMap<String, RawPackage>,
}

#[derive(Deserialize)]
struct RawPackage {
    #[serde(default)]
    link: bool,
}

/// Dependency entries plus the directory they are relative to.
#[derive(Debug, Clone)]
pub struct Lockfile {
    dir: PathBuf,
    entries: Vec<DependencyEntry>,
}

impl Lockfile {
    pub fn new(dir: impl Into<PathBuf>, entries: Vec<DependencyEntry>) -> Self {
        Self {
            dir: dir.into(),
            entries,
        }
    }

    /// Read and parse the lockfile at `path`.
    pub fn load(path: &Path) -> Result<Self, LinkError> {
        let text = std::fs::read_to_string(path).map_err(|source| LinkError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        Self::parse(dir, &text).map_err(|source| LinkError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse lockfile JSON whose entries are relative to `dir`.
    pub fn parse(dir: impl Into<PathBuf>, json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawLockfile = serde_json::from_str(json)?;
        let entries = raw
            .packages
            .into_iter()
            .map(|(rel_path, package)| DependencyEntry::new(rel_path, package.link))
            .collect();
        Ok(Self::new(dir, entries))
    }

    /// Directory containing the lockfile.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[DependencyEntry] {
        &self.entries
    }

    /// Entries whose logical name is `name`.
    pub fn entries_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DependencyEntry> {
        self.entries.iter().filter(move |entry| entry.name == name)
    }

    /// Absolute directory of an entry.
    pub fn entry_dir(&self, entry: &DependencyEntry) -> PathBuf {
        entry
            .rel_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.dir.clone(), |dir, part| dir.join(part))
    }
}
