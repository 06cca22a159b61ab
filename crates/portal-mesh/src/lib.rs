//! Workspace portal mesh layer.
//!
//! Every package process on a machine races for one fixed loopback port.
//! The winner becomes the hub and relays announcements between all other
//! processes (spokes). When the hub goes away the spokes race again.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use portal_mesh::{Announcement, AnnouncementHandler, MeshConfig, PeerNode};
//!
//! struct Print;
//!
//! #[async_trait::async_trait]
//! impl AnnouncementHandler for Print {
//!     async fn on_announcement(&mut self, announcement: Announcement) {
//!         println!("{} wants {:?}", announcement.name, announcement.link);
//!     }
//! }
//!
//! # async fn example() -> Result<(), portal_mesh::MeshError> {
//! let local = Announcement::new("@workspace/bar", "/repo/bar", vec!["dist".into()]);
//! let node = PeerNode::new(MeshConfig::new(), local)?;
//! node.run(Print).await;
//! # Ok::<(), portal_mesh::MeshError>(())
//! # }
//! ```

mod announcement;
mod config;
mod connection;
mod error;
mod framing;
mod hub;
mod node;
mod role;
mod spoke;

pub use announcement::{Announcement, PROTOCOL_VERSION};
pub use config::MeshConfig;
pub use error::MeshError;
pub use node::PeerNode;
pub use role::PeerRole;

/// Receives every announcement the mesh learns about, including the local one.
///
/// Called from the role loop task only, one announcement at a time.
#[async_trait::async_trait]
pub trait AnnouncementHandler: Send {
    async fn on_announcement(&mut self, announcement: Announcement);
}

/// Default coordination port shared by all portal processes.
pub const DEFAULT_PORT: u16 = 28717;
