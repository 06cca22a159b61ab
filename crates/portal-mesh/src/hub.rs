//! Hub role: own the port, replay known peers to newcomers, relay lines.

use std::collections::HashMap;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::connection::{self, ConnEvent, ConnId, Outbox};
use crate::{Announcement, AnnouncementHandler, MeshConfig, MeshError};

/// A connected spoke as seen by the hub.
struct Peer {
    outbox: Outbox,
    /// Exact wire line of the last announcement received on this connection.
    last: Option<String>,
}

/// Known-Peers Table plus the fan-out rules around it.
///
/// Pure bookkeeping, no I/O: lines are queued on each peer's outbox.
#[derive(Default)]
pub(crate) struct PeerTable {
    peers: HashMap<ConnId, Peer>,
}

impl PeerTable {
    /// Register a new connection and queue its greeting: our own line
    /// followed by every announcement already known.
    pub fn join(&mut self, id: ConnId, outbox: Outbox, local_line: &str) {
        let _ = outbox.send(local_line.to_string());
        let mut known: Vec<_> = self
            .peers
            .iter()
            .filter_map(|(peer_id, peer)| peer.last.clone().map(|line| (*peer_id, line)))
            .collect();
        // Replay in connection order
        known.sort_by_key(|(peer_id, _)| *peer_id);
        for (_, line) in known {
            let _ = outbox.send(line);
        }
        self.peers.insert(id, Peer { outbox, last: None });
    }

    /// Remember `line` as the latest announcement on `id`.
    pub fn record(&mut self, id: ConnId, line: &str) {
        if let Some(peer) = self.peers.get_mut(&id) {
            peer.last = Some(line.to_string());
        }
    }

    /// Queue `line` for every peer except its sender.
    pub fn relay(&self, from: ConnId, line: &str) -> usize {
        let mut relayed = 0;
        for (id, peer) in &self.peers {
            if *id != from && peer.outbox.send(line.to_string()).is_ok() {
                relayed += 1;
            }
        }
        relayed
    }

    pub fn leave(&mut self, id: ConnId) -> bool {
        self.peers.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }
}

/// Serve as hub until the listener fails. Returns the failure.
///
/// Every connection task lives in a local `JoinSet`, so they are all torn
/// down when this returns or the future is dropped.
pub(crate) async fn serve<H: AnnouncementHandler>(
    listener: TcpListener,
    local_line: &str,
    handler: &mut H,
    config: &MeshConfig,
) -> MeshError {
    let (event_tx, mut event_rx) = mpsc::channel(config.event_buffer);
    let mut tasks = JoinSet::new();
    let mut table = PeerTable::default();
    let mut next_id = 0u64;

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, remote) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => return MeshError::Accept(e),
                };
                let id = ConnId(next_id);
                next_id += 1;
                let outbox = connection::spawn(
                    id,
                    stream,
                    remote,
                    event_tx.clone(),
                    &mut tasks,
                    config.max_line_length,
                );
                table.join(id, outbox, local_line);
                tracing::debug!("hub: {id} joined from {remote} ({} peers)", table.len());
            }

            Some(event) = event_rx.recv() => match event {
                ConnEvent::Line { id, line } => {
                    let announcement = match Announcement::from_line(&line) {
                        Ok(a) => a,
                        Err(e) => {
                            tracing::debug!("hub: dropping line from {id}: {e}");
                            continue;
                        }
                    };
                    table.record(id, &line);
                    handler.on_announcement(announcement).await;
                    let relayed = table.relay(id, &line);
                    tracing::trace!("hub: relayed {id} to {relayed} peers");
                }
                ConnEvent::Closed { id, error } => {
                    if table.leave(id) {
                        match error {
                            Some(e) => tracing::debug!("hub: {id} dropped: {e}"),
                            None => tracing::debug!("hub: {id} closed"),
                        }
                    }
                }
            },

            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }
}
