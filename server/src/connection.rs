//! Per-connection socket primitives: exact-byte-count reads under the
//! session timeout, frame writes, and the typed reads the game layers use.

use crate::error::{GameError, GameResult};
use log::debug;
use shared::{Message, Opcode, Role};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// One client socket plus its protocol-level bookkeeping.
///
/// A connection is owned by exactly one component at a time: the lobby
/// while queued, a session task while playing. It moves between owners and
/// is never shared, so no locking happens at this level.
#[derive(Debug)]
pub struct Connection {
    pub id: u32,
    pub alive: bool,
    pub role: Option<Role>,
    stream: TcpStream,
    read_timeout: Duration,
}

impl Connection {
    pub fn new(id: u32, stream: TcpStream, read_timeout: Duration) -> Self {
        Self {
            id,
            alive: true,
            role: None,
            stream,
            read_timeout,
        }
    }

    /// Encodes and writes one frame. A failed write marks the connection
    /// dead and surfaces as `PeerClosed`.
    pub async fn send(&mut self, message: &Message) -> GameResult<()> {
        let frame = message.encode()?;
        if let Err(e) = self.stream.write_all(&frame).await {
            debug!("connection {}: write failed: {}", self.id, e);
            self.alive = false;
            return Err(GameError::PeerClosed);
        }
        Ok(())
    }

    /// Reads exactly `n` bytes; callers never see partial data.
    ///
    /// End-of-stream and socket errors surface as `PeerClosed`, the
    /// deadline as `ReadTimeout`. Either failure drops the liveness flag.
    pub async fn read_exact(&mut self, n: usize) -> GameResult<Vec<u8>> {
        let mut buf = vec![0u8; n];
        match timeout(self.read_timeout, self.stream.read_exact(&mut buf)).await {
            Ok(Ok(_)) => Ok(buf),
            Ok(Err(e)) => {
                debug!("connection {}: read failed: {}", self.id, e);
                self.alive = false;
                Err(GameError::PeerClosed)
            }
            Err(_) => {
                self.alive = false;
                Err(GameError::ReadTimeout(self.read_timeout))
            }
        }
    }

    /// Reads a 2-byte GUESS frame and returns the guessed letter.
    pub async fn read_guess(&mut self) -> GameResult<u8> {
        let frame = self.read_exact(2).await?;
        expect_opcode(Opcode::Guess, frame[0])?;
        Ok(frame[1])
    }

    /// Reads a SETWORD reply and returns the submitted bytes, unvalidated.
    pub async fn read_word(&mut self) -> GameResult<Vec<u8>> {
        let header = self.read_exact(2).await?;
        expect_opcode(Opcode::SetWord, header[0])?;
        let len = header[1] as usize;
        if len == 0 {
            return Ok(Vec::new());
        }
        self.read_exact(len).await
    }

    /// Reads a 2-byte RESTART reply; true means the client wants another
    /// round.
    pub async fn read_restart_reply(&mut self) -> GameResult<bool> {
        let frame = self.read_exact(2).await?;
        expect_opcode(Opcode::Restart, frame[0])?;
        Ok(frame[1] == 1)
    }
}

fn expect_opcode(expected: Opcode, got: u8) -> GameResult<()> {
    if got == expected as u8 {
        Ok(())
    } else {
        Err(GameError::ProtocolViolation { expected, got })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn connected(read_timeout: Duration) -> (Connection, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (accepted, peer) = tokio::join!(listener.accept(), TcpStream::connect(addr));
        let (stream, _) = accepted.unwrap();
        (Connection::new(1, stream, read_timeout), peer.unwrap())
    }

    #[tokio::test]
    async fn test_read_guess_frame() {
        let (mut conn, mut peer) = connected(Duration::from_secs(1)).await;
        peer.write_all(&[Opcode::Guess as u8, b'x']).await.unwrap();
        assert_eq!(conn.read_guess().await.unwrap(), b'x');
        assert!(conn.alive);
    }

    #[tokio::test]
    async fn test_wrong_opcode_is_protocol_violation() {
        let (mut conn, mut peer) = connected(Duration::from_secs(1)).await;
        peer.write_all(&[Opcode::SetWord as u8, 0]).await.unwrap();
        match conn.read_guess().await {
            Err(GameError::ProtocolViolation { expected, got }) => {
                assert_eq!(expected, Opcode::Guess);
                assert_eq!(got, Opcode::SetWord as u8);
            }
            other => panic!("expected protocol violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_peer_close_surfaces_as_peer_closed() {
        let (mut conn, peer) = connected(Duration::from_secs(1)).await;
        drop(peer);
        assert!(matches!(conn.read_guess().await, Err(GameError::PeerClosed)));
        assert!(!conn.alive);
    }

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        let (mut conn, _peer) = connected(Duration::from_millis(50)).await;
        assert!(matches!(
            conn.read_guess().await,
            Err(GameError::ReadTimeout(_))
        ));
        assert!(!conn.alive);
    }

    #[tokio::test]
    async fn test_read_word_accepts_empty_submission() {
        // Validation happens upstream; the read itself passes it through.
        let (mut conn, mut peer) = connected(Duration::from_secs(1)).await;
        peer.write_all(&[Opcode::SetWord as u8, 0]).await.unwrap();
        assert_eq!(conn.read_word().await.unwrap(), Vec::<u8>::new());
    }

    #[tokio::test]
    async fn test_read_word_reads_declared_length() {
        let (mut conn, mut peer) = connected(Duration::from_secs(1)).await;
        peer.write_all(&[Opcode::SetWord as u8, 3, b'c', b'a', b't'])
            .await
            .unwrap();
        assert_eq!(conn.read_word().await.unwrap(), b"cat".to_vec());
    }

    #[tokio::test]
    async fn test_send_writes_wire_frame() {
        let (mut conn, mut peer) = connected(Duration::from_secs(1)).await;
        conn.send(&Message::WaitingForPlayer).await.unwrap();
        let mut frame = [0u8; 2];
        peer.read_exact(&mut frame).await.unwrap();
        assert_eq!(frame, [Opcode::WaitingForPlayer as u8, 0]);
    }

    #[tokio::test]
    async fn test_restart_reply_flag() {
        let (mut conn, mut peer) = connected(Duration::from_secs(1)).await;
        peer.write_all(&[Opcode::Restart as u8, 1]).await.unwrap();
        assert!(conn.read_restart_reply().await.unwrap());
        peer.write_all(&[Opcode::Restart as u8, 0]).await.unwrap();
        assert!(!conn.read_restart_reply().await.unwrap());
    }
}
