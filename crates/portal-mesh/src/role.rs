/// The role a process currently holds in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerRole {
    /// Racing for the coordination port.
    Starting,
    /// Owns the port and relays announcements.
    Hub,
    /// Connected to the hub.
    Spoke,
}

impl std::fmt::Display for PeerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerRole::Starting => write!(f, "STARTING"),
            PeerRole::Hub => write!(f, "HUB"),
            PeerRole::Spoke => write!(f, "SPOKE"),
        }
    }
}
