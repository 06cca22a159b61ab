use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Configuration for a [`PeerNode`](crate::PeerNode).
///
/// All fields have sensible defaults. Use the builder pattern:
///
/// ```rust
/// use portal_mesh::MeshConfig;
///
/// let config = MeshConfig::new()
///     .port(40000)
///     .max_line_length(16 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct MeshConfig {
    /// Loopback address the hub listens on and spokes connect to.
    pub(crate) host: IpAddr,
    /// Fixed coordination port; every process of one workspace must agree on it.
    pub(crate) port: u16,
    /// Longest accepted announcement line in bytes.
    pub(crate) max_line_length: usize,
    /// Pause after a spoke fails to reach the hub before racing again.
    pub(crate) reconnect_delay: Duration,
    /// Channel buffer between hub connection tasks and the role loop.
    pub(crate) event_buffer: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshConfig {
    /// Create a new config with defaults.
    ///
    /// `PORTAL_PORT` and `PORTAL_HOST` override the port and loopback
    /// address when set and parseable.
    pub fn new() -> Self {
        let port = std::env::var("PORTAL_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(crate::DEFAULT_PORT);
        let host = std::env::var("PORTAL_HOST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        Self {
            host,
            port,
            max_line_length: 64 * 1024,
            reconnect_delay: Duration::from_millis(100),
            event_buffer: 256,
        }
    }

    /// Set the loopback address (default: `127.0.0.1`).
    pub fn host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Set the coordination port (default: 28717).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the maximum line length (default: 64 KiB).
    pub fn max_line_length(mut self, bytes: usize) -> Self {
        self.max_line_length = bytes;
        self
    }

    /// Set the delay after a failed spoke connect (default: 100 ms).
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the hub event channel size (default: 256).
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    /// The socket address every peer races for.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
