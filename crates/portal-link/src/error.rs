use std::path::PathBuf;

/// Errors from validation, collaborators and filesystem convergence.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid announcement: {reason}")]
    InvalidAnnouncement { reason: String },

    #[error("failed to symlink {target:?} into {path:?}: {source}")]
    Symlink {
        target: PathBuf,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to resolve {name:?} in {cwd:?}")]
    NotFound { name: String, cwd: PathBuf },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path:?} has no {field:?} field")]
    MissingField { path: PathBuf, field: &'static str },
}

impl LinkError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LinkError::InvalidAnnouncement {
            reason: reason.into(),
        }
    }
}
