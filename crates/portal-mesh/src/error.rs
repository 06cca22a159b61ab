use std::net::SocketAddr;

/// Errors raised inside the mesh layer.
///
/// The role loop recovers from all of them; they surface only in logs
/// and in the lower-level helpers.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("connection i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("line framing failed: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    #[error("announcement serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("announcement deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}
