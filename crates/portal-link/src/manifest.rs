//! Locating and reading the local package manifest.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::LinkError;

/// File name looked up by the CLI.
pub const MANIFEST_NAME: &str = "package.json";

/// Walk from `cwd` up to the filesystem root and return the first regular
/// file called `name`.
pub fn resolve_file(name: &str, cwd: &Path) -> Result<PathBuf, LinkError> {
    for dir in cwd.ancestors() {
        let candidate = dir.join(name);
        match std::fs::metadata(&candidate) {
            Ok(meta) if meta.is_file() => return Ok(candidate),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(LinkError::Read {
                    path: candidate,
                    source,
                })
            }
        }
    }
    Err(LinkError::NotFound {
        name: name.to_string(),
        cwd: cwd.to_path_buf(),
    })
}

#[derive(Deserialize)]
struct RawManifest {
    name: Option<String>,
}

/// The fields of `package.json` the portal needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    name: String,
    root: PathBuf,
}

impl Manifest {
    /// Read the manifest at `path`; its directory becomes the package root.
    pub fn load(path: &Path) -> Result<Self, LinkError> {
        let text = std::fs::read_to_string(path).map_err(|source| LinkError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawManifest = serde_json::from_str(&text).map_err(|source| LinkError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let name = raw.name.ok_or_else(|| LinkError::MissingField {
            path: path.to_path_buf(),
            field: "name",
        })?;
        let root = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        Ok(Self { name, root })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory containing the manifest.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
