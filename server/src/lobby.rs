//! Shared waiting queue that pairs idle connections into sessions.
//!
//! This is the only state touched by more than one task. The queue lock is
//! held for inspection and removal only, never across a socket read or
//! write, and a connection is claimed by at most one pairing attempt.

use crate::connection::Connection;
use crate::error::GameError;
use log::{debug, info, warn};
use shared::Message;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Result of one pairing attempt for a specific queued connection.
#[derive(Debug)]
pub enum PairAttempt {
    /// Both ends of a fresh session, the polling connection first.
    Paired(Connection, Connection),
    /// Nobody else is waiting yet; poll again after a short sleep.
    Waiting,
    /// Another task already pulled this connection into a session.
    Claimed,
}

pub struct Lobby {
    queue: Mutex<VecDeque<Connection>>,
}

impl Lobby {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Announces the wait to the client, then appends it to the queue.
    ///
    /// The WAITING_FOR_PLAYER frame goes out before the append so that a
    /// connection visible in the queue is never written to by its old
    /// owner. Returns false when the connection is already dead, in which
    /// case it is dropped here.
    pub async fn enqueue(&self, mut conn: Connection) -> bool {
        if !conn.alive {
            warn!("lobby refused: {}", GameError::StaleReference(conn.id));
            return false;
        }
        if conn.send(&Message::WaitingForPlayer).await.is_err() {
            info!("connection {} dropped before entering the lobby", conn.id);
            return false;
        }
        debug!("connection {} waiting in the lobby", conn.id);
        self.queue.lock().await.push_back(conn);
        true
    }

    /// Tries to claim `id` together with the earliest other waiting
    /// connection, all under one lock acquisition.
    ///
    /// A connection never pairs with itself; stale entries are purged on
    /// the way.
    pub async fn try_pair(&self, id: u32) -> PairAttempt {
        let mut queue = self.queue.lock().await;

        queue.retain(|conn| {
            if conn.alive {
                true
            } else {
                warn!("lobby skipped: {}", GameError::StaleReference(conn.id));
                false
            }
        });

        let me = match queue.iter().position(|conn| conn.id == id) {
            Some(index) => index,
            None => return PairAttempt::Claimed,
        };
        let other = match queue.iter().position(|conn| conn.id != id) {
            Some(index) => index,
            None => return PairAttempt::Waiting,
        };

        // Remove the later index first so the earlier one stays valid.
        let (low, high) = if me < other { (me, other) } else { (other, me) };
        match (queue.remove(high), queue.remove(low)) {
            (Some(high_conn), Some(low_conn)) => {
                let (mine, partner) = if me < other {
                    (low_conn, high_conn)
                } else {
                    (high_conn, low_conn)
                };
                info!("paired connections {} and {}", mine.id, partner.id);
                PairAttempt::Paired(mine, partner)
            }
            // Indices came from the same locked inspection, so both
            // removals succeed; this arm keeps the handler polling instead
            // of crashing if that ever stops holding.
            _ => PairAttempt::Waiting,
        }
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::net::{TcpListener, TcpStream};

    async fn connection(id: u32) -> (Connection, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (accepted, peer) = tokio::join!(listener.accept(), TcpStream::connect(addr));
        let (stream, _) = accepted.unwrap();
        (
            Connection::new(id, stream, Duration::from_secs(1)),
            peer.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_enqueue_announces_the_wait() {
        let lobby = Lobby::new();
        let (conn, mut peer) = connection(1).await;
        assert!(lobby.enqueue(conn).await);

        let mut frame = [0u8; 2];
        peer.read_exact(&mut frame).await.unwrap();
        assert_eq!(frame, [shared::Opcode::WaitingForPlayer as u8, 0]);
    }

    #[tokio::test]
    async fn test_lone_connection_never_pairs_with_itself() {
        let lobby = Lobby::new();
        let (conn, _peer) = connection(1).await;
        lobby.enqueue(conn).await;

        assert!(matches!(lobby.try_pair(1).await, PairAttempt::Waiting));
        assert!(matches!(lobby.try_pair(1).await, PairAttempt::Waiting));
    }

    #[tokio::test]
    async fn test_pairs_fifo_with_earliest_other() {
        let lobby = Lobby::new();
        let (a, _pa) = connection(1).await;
        let (b, _pb) = connection(2).await;
        let (c, _pc) = connection(3).await;
        lobby.enqueue(a).await;
        lobby.enqueue(b).await;
        lobby.enqueue(c).await;

        // C polls: its partner is A, the earliest other entry.
        match lobby.try_pair(3).await {
            PairAttempt::Paired(mine, partner) => {
                assert_eq!(mine.id, 3);
                assert_eq!(partner.id, 1);
            }
            other => panic!("expected a pair, got {:?}", other),
        }

        // B is the only one left.
        assert!(matches!(lobby.try_pair(2).await, PairAttempt::Waiting));
    }

    #[tokio::test]
    async fn test_claimed_connection_stops_polling() {
        let lobby = Lobby::new();
        let (a, _pa) = connection(1).await;
        let (b, _pb) = connection(2).await;
        lobby.enqueue(a).await;
        lobby.enqueue(b).await;

        assert!(matches!(lobby.try_pair(1).await, PairAttempt::Paired(_, _)));
        // B's task finds its connection gone: the pairing task owns it now.
        assert!(matches!(lobby.try_pair(2).await, PairAttempt::Claimed));
    }

    #[tokio::test]
    async fn test_stale_connection_is_refused_and_purged() {
        let lobby = Lobby::new();
        let (mut dead, _pd) = connection(1).await;
        dead.alive = false;
        assert!(!lobby.enqueue(dead).await);

        // A live entry plus a stale one that slipped in is purged on poll.
        let (live, _pl) = connection(2).await;
        lobby.enqueue(live).await;
        let (stale, _ps) = connection(3).await;
        lobby.enqueue(stale).await;
        lobby.queue.lock().await.back_mut().unwrap().alive = false;

        assert!(matches!(lobby.try_pair(2).await, PairAttempt::Waiting));
    }
}
