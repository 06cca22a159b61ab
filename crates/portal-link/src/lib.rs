//! Workspace portal link layer.
//!
//! Consumes announcements delivered by `portal-mesh`, matches them against
//! the local lockfile, and materializes the requested outputs as directory
//! symlinks inside dependent packages.
//!
//! Filesystem writes go through [`SymlinkApplier`], which is idempotent and
//! retries once to ride out races with other portal processes.

pub mod convergence;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod paths;
pub mod retry;
pub mod symlink;
pub mod validate;

pub use convergence::{Convergence, Disposition, LinkAction, ProcessedNames};
pub use error::LinkError;
pub use lockfile::{package_name, DependencyEntry, Lockfile, LOCKFILE_NAME};
pub use manifest::{resolve_file, Manifest, MANIFEST_NAME};
pub use retry::RetryPolicy;
pub use symlink::{SymlinkApplier, SymlinkOutcome};
pub use validate::validate;
