use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::MeshError;

/// Wire protocol version. Peers with a different string are ignored.
pub const PROTOCOL_VERSION: &str = "workspace-portal-v1";

/// The only message exchanged on the mesh: who a package is, where it
/// lives, and which of its outputs it wants linked into dependents.
///
/// Decoding only checks the JSON shape. Whether the name, root and links
/// are acceptable is decided by the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Protocol version string (`version` is accepted on input).
    #[serde(rename = "protocolVersion", alias = "version")]
    pub protocol_version: String,

    /// Logical package name within the dependency graph.
    pub name: String,

    /// Absolute package directory that `link` entries are relative to.
    pub root: PathBuf,

    /// Output directories to expose, relative to `root`.
    pub link: Vec<String>,
}

impl Announcement {
    /// Create an announcement for the current protocol version.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, link: Vec<String>) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            name: name.into(),
            root: root.into(),
            link,
        }
    }

    /// Serialize to a single JSON line (without the trailing newline).
    pub fn to_line(&self) -> Result<String, MeshError> {
        serde_json::to_string(self).map_err(MeshError::Serialization)
    }

    /// Parse one received line.
    pub fn from_line(line: &str) -> Result<Self, MeshError> {
        serde_json::from_str(line).map_err(MeshError::Deserialization)
    }
}
