//! Spoke role: one connection to the hub, announce, then listen.

use tokio::net::TcpStream;

use crate::framing::{LineReader, LineWriter};
use crate::{Announcement, AnnouncementHandler, MeshConfig, MeshError};

/// How a spoke session ended.
#[derive(Debug)]
pub(crate) enum SpokeExit {
    /// Nobody accepted the connection.
    Unreachable(MeshError),
    /// The hub closed the connection.
    Closed,
    /// The established connection failed.
    Failed(MeshError),
}

/// Connect to the hub and deliver every announcement it sends until the
/// connection goes away.
pub(crate) async fn run<H: AnnouncementHandler>(
    local_line: &str,
    handler: &mut H,
    config: &MeshConfig,
) -> SpokeExit {
    let addr = config.addr();
    let stream = match TcpStream::connect(addr).await {
        Ok(s) => s,
        Err(source) => return SpokeExit::Unreachable(MeshError::Connect { addr, source }),
    };
    tracing::debug!("spoke: connected to hub at {addr}");

    let (read, write) = stream.into_split();
    let mut reader = LineReader::new(read, config.max_line_length);
    let mut writer = LineWriter::new(write);

    if let Err(e) = writer.send(local_line).await {
        return SpokeExit::Failed(e);
    }

    loop {
        match reader.next_line().await {
            Ok(Some(line)) => match Announcement::from_line(&line) {
                Ok(announcement) => handler.on_announcement(announcement).await,
                Err(e) => tracing::debug!("spoke: dropping line from hub: {e}"),
            },
            Ok(None) => return SpokeExit::Closed,
            Err(e) => return SpokeExit::Failed(e),
        }
    }
}
