//! Turning announcements into dependency symlinks.
//!
//! Each logical name is handled once per process lifetime, no matter how
//! often the mesh re-delivers it. For every lockfile entry with that name
//! the announced outputs are linked into the entry's directory, unless the
//! package manager already linked the entry itself.
use std::collections::HashSet;
use std::path::PathBuf;

use portal_mesh::{Announcement, AnnouncementHandler, PROTOCOL_VERSION};

use crate::symlink::{SymlinkApplier, SymlinkOutcome};
use crate::{paths, validate, LinkError, Lockfile};

/// Names whose announcement has been processed. Insert-only.
#[derive(Debug, Default, Clone)]
pub struct ProcessedNames {
    names: HashSet<String>,
}

impl ProcessedNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`. Returns `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One filesystem decision taken for an announcement.
#[derive(Debug)]
pub enum LinkAction {
    /// A new symlink was written.
    Linked { target: PathBuf, path: PathBuf },
    /// The symlink was already correct.
    AlreadyInPlace { target: PathBuf, path: PathBuf },
    /// The package manager linked this entry; left alone.
    Skipped { path: PathBuf },
    /// Creating the symlink failed even after retrying.
    Failed {
        target: PathBuf,
        path: PathBuf,
        error: LinkError,
    },
}

/// What happened to an announcement.
#[derive(Debug)]
pub enum Disposition {
    /// Foreign protocol version; ignored.
    VersionMismatch,
    /// Name seen before; ignored.
    AlreadyProcessed,
    /// First delivery of this name, with the actions taken (possibly none).
    Processed(Vec<LinkAction>),
}

/// Convergence state for one process.
pub struct Convergence {
    protocol_version: String,
    lockfile: Lockfile,
    processed: ProcessedNames,
    applier: SymlinkApplier,
}

impl Convergence {
    pub fn new(lockfile: Lockfile) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            lockfile,
            processed: ProcessedNames::new(),
            applier: SymlinkApplier::default(),
        }
    }

    /// Accept only announcements carrying `version`.
    pub fn protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// Use a specific applier (e.g. with a shorter retry delay).
    pub fn applier(mut self, applier: SymlinkApplier) -> Self {
        self.applier = applier;
        self
    }

    pub fn processed(&self) -> &ProcessedNames {
        &self.processed
    }

    pub fn lockfile(&self) -> &Lockfile {
        &self.lockfile
    }

    /// Validate, deduplicate and apply one announcement.
    ///
    /// A symlink failure does not stop the remaining entries; it is
    /// reported as [`LinkAction::Failed`].
    pub async fn process(
        &mut self,
        announcement: &Announcement,
    ) -> Result<Disposition, LinkError> {
        if announcement.protocol_version != self.protocol_version {
            tracing::debug!(
                "ignoring {:?}: protocol {:?}",
                announcement.name,
                announcement.protocol_version
            );
            return Ok(Disposition::VersionMismatch);
        }

        validate(announcement)?;

        if !self.processed.insert(&announcement.name) {
            return Ok(Disposition::AlreadyProcessed);
        }

        let mut actions = Vec::new();
        if announcement.link.is_empty() {
            return Ok(Disposition::Processed(actions));
        }

        for entry in self.lockfile.entries_named(&announcement.name) {
            let dir = self.lockfile.entry_dir(entry);

            if entry.already_linked {
                tracing::info!("Skipping {dir:?} because it has already been linked by npm.");
                actions.push(LinkAction::Skipped { path: dir });
                continue;
            }

            for link in &announcement.link {
                let target = paths::normalize(&announcement.root.join(link));
                let path = paths::normalize(&dir.join(link));
                tracing::info!("Symlinking {target:?} into {path:?}");

                let action = match self.applier.ensure(&target, &path).await {
                    Ok(SymlinkOutcome::Created) => LinkAction::Linked { target, path },
                    Ok(SymlinkOutcome::Unchanged) => LinkAction::AlreadyInPlace { target, path },
                    Err(error) => {
                        tracing::error!("{error}");
                        LinkAction::Failed {
                            target,
                            path,
                            error,
                        }
                    }
                };
                actions.push(action);
            }
        }

        Ok(Disposition::Processed(actions))
    }
}

#[async_trait::async_trait]
impl AnnouncementHandler for Convergence {
    async fn on_announcement(&mut self, announcement: Announcement) {
        if let Err(e) = self.process(&announcement).await {
            tracing::warn!("discarding announcement from {:?}: {e}", announcement.name);
        }
    }
}
