//! Accept loop and the per-connection task driving lobby registration,
//! pairing, and session hand-off.

use crate::connection::Connection;
use crate::lobby::{Lobby, PairAttempt};
use crate::session;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

/// Tunables threaded from the command line into every connection task.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// Deadline for every blocking read on a client socket.
    pub read_timeout: Duration,
    /// Idle delay between pairing attempts against the lobby.
    pub pair_poll_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            read_timeout: shared::READ_TIMEOUT,
            pair_poll_interval: Duration::from_millis(100),
        }
    }
}

/// Accepts connections forever, spawning one handler task per client.
/// A failed accept is logged and never stops the loop.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> std::io::Result<()> {
    let lobby = Arc::new(Lobby::new());
    let mut next_id: u32 = 1;

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let id = next_id;
                next_id = next_id.wrapping_add(1);
                info!("connection {} accepted from {}", id, addr);

                let conn = Connection::new(id, stream, config.read_timeout);
                let lobby = Arc::clone(&lobby);
                tokio::spawn(async move {
                    handle_connection(lobby, conn, config).await;
                });
            }
            Err(e) => warn!("accept failed: {}", e),
        }
    }
}

/// Drives one connection through enqueue, pairing, and session hand-off,
/// looping as long as some connection survives to play again.
///
/// When a session returns two survivors the partner goes back into the
/// queue task-less; this task keeps polling for the one it retains and the
/// very next attempt pairs the two up again (or either with an
/// earlier-waiting third player, FIFO).
async fn handle_connection(lobby: Arc<Lobby>, mut conn: Connection, config: ServerConfig) {
    loop {
        let id = conn.id;
        if !lobby.enqueue(conn).await {
            return;
        }

        let (mine, partner) = loop {
            match lobby.try_pair(id).await {
                PairAttempt::Paired(mine, partner) => break (mine, partner),
                PairAttempt::Waiting => sleep(config.pair_poll_interval).await,
                PairAttempt::Claimed => {
                    // Another task pulled this connection into its session
                    // and owns it from here on.
                    debug!("connection {} claimed by another task", id);
                    return;
                }
            }
        };

        let mut survivors = session::run_session(mine, partner).await;
        match survivors.len() {
            0 => return,
            1 => conn = survivors.remove(0),
            _ => {
                let keeper = survivors.remove(0);
                for other in survivors {
                    lobby.enqueue(other).await;
                }
                conn = keeper;
            }
        }
    }
}
