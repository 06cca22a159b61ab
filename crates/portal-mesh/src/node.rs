use std::convert::Infallible;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::spoke::{self, SpokeExit};
use crate::{hub, Announcement, AnnouncementHandler, MeshConfig, MeshError, PeerRole};

/// Internal role state; the hub variant owns its listener.
enum State {
    Starting,
    Hub(TcpListener),
    Spoke,
}

/// One process's membership in the mesh.
///
/// Construct it with the local announcement, then hand it a handler via
/// [`PeerNode::run`]. The role loop never finishes on its own; stop it by
/// dropping the future or ending the process.
pub struct PeerNode {
    config: MeshConfig,
    local: Announcement,
    local_line: String,
    role_tx: watch::Sender<PeerRole>,
}

impl PeerNode {
    /// Fails only if the local announcement cannot be encoded
    /// (e.g. a root path that is not valid UTF-8).
    pub fn new(config: MeshConfig, local: Announcement) -> Result<Self, MeshError> {
        let local_line = local.to_line()?;
        let (role_tx, _) = watch::channel(PeerRole::Starting);
        Ok(Self {
            config,
            local,
            local_line,
            role_tx,
        })
    }

    /// The announcement this node sends to its peers.
    pub fn local(&self) -> &Announcement {
        &self.local
    }

    /// Watch the current role.
    pub fn role(&self) -> watch::Receiver<PeerRole> {
        self.role_tx.subscribe()
    }

    /// Deliver the local announcement to `handler`, then keep a role on the
    /// coordination port forever.
    ///
    /// Starting → Hub when the bind succeeds, Spoke otherwise. A hub whose
    /// listener fails becomes a spoke; a spoke whose connection ends races
    /// for the port again.
    pub async fn run<H: AnnouncementHandler>(self, mut handler: H) -> Infallible {
        handler.on_announcement(self.local.clone()).await;

        let local_line = self.local_line.as_str();
        let addr = self.config.addr();
        let mut state = State::Starting;

        loop {
            state = match state {
                State::Starting => {
                    self.set_role(PeerRole::Starting);
                    match TcpListener::bind(addr).await {
                        Ok(listener) => State::Hub(listener),
                        Err(source) => {
                            let e = MeshError::Bind { addr, source };
                            tracing::debug!("{e}; joining as spoke");
                            State::Spoke
                        }
                    }
                }

                State::Hub(listener) => {
                    self.set_role(PeerRole::Hub);
                    tracing::info!("mesh: hub on {addr}");
                    let e = hub::serve(listener, local_line, &mut handler, &self.config).await;
                    tracing::warn!("mesh: hub listener lost: {e}");
                    State::Spoke
                }

                State::Spoke => {
                    self.set_role(PeerRole::Spoke);
                    match spoke::run(local_line, &mut handler, &self.config).await {
                        SpokeExit::Unreachable(e) => {
                            tracing::debug!("mesh: {e}");
                            tokio::time::sleep(self.config.reconnect_delay).await;
                        }
                        SpokeExit::Closed => tracing::info!("mesh: hub went away, re-electing"),
                        SpokeExit::Failed(e) => {
                            tracing::warn!("mesh: hub connection failed: {e}, re-electing")
                        }
                    }
                    State::Starting
                }
            };
        }
    }

    fn set_role(&self, role: PeerRole) {
        self.role_tx.send_if_modified(|current| {
            if *current == role {
                return false;
            }
            tracing::debug!("mesh: role {current} -> {role}");
            *current = role;
            true
        });
    }
}
