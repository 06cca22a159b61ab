use std::net::SocketAddr;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::framing::{LineReader, LineWriter};
use crate::MeshError;

/// Hub-local handle for one accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ConnId(pub u64);

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// What a connection task reports back to the hub loop.
#[derive(Debug)]
pub(crate) enum ConnEvent {
    Line { id: ConnId, line: String },
    Closed { id: ConnId, error: Option<MeshError> },
}

/// Outgoing side of a connection. Dropping it ends the writer task.
pub(crate) type Outbox = mpsc::UnboundedSender<String>;

/// Split an accepted stream into a reader and a writer task.
///
/// The reader forwards every line to `events` and reports `Closed` when the
/// peer goes away. Both tasks live in `tasks`, so dropping the set tears the
/// connection down.
pub(crate) fn spawn(
    id: ConnId,
    stream: TcpStream,
    remote: SocketAddr,
    events: mpsc::Sender<ConnEvent>,
    tasks: &mut JoinSet<()>,
    max_line_length: usize,
) -> Outbox {
    let (read, write) = stream.into_split();
    let (outbox, mut rx) = mpsc::unbounded_channel::<String>();

    tasks.spawn(async move {
        let mut writer = LineWriter::new(write);
        while let Some(line) = rx.recv().await {
            if let Err(e) = writer.send(&line).await {
                tracing::debug!("{id} ({remote}): write failed: {e}");
                break;
            }
        }
    });

    tasks.spawn(async move {
        let mut reader = LineReader::new(read, max_line_length);
        let error = loop {
            match reader.next_line().await {
                Ok(Some(line)) => {
                    if events.send(ConnEvent::Line { id, line }).await.is_err() {
                        // Hub loop is gone
                        return;
                    }
                }
                Ok(None) => break None,
                Err(e) => break Some(e),
            }
        };
        let _ = events.send(ConnEvent::Closed { id, error }).await;
    });

    outbox
}
