//! Failure taxonomy for rounds, sessions, and the lobby.

use shared::{Opcode, WireError};
use std::time::Duration;
use thiserror::Error;

/// Everything that can cut a session short, plus the locally recoverable
/// malformed-word case.
#[derive(Debug, Error)]
pub enum GameError {
    /// Remote end closed the stream mid-read; fatal to the session.
    #[error("peer closed the connection")]
    PeerClosed,
    /// Nothing arrived within the deadline; treated like a disconnect.
    #[error("no data within {0:?}")]
    ReadTimeout(Duration),
    /// Well-formed frame with an opcode the state machine did not expect.
    #[error("expected {expected:?}, got opcode {got:#04x}")]
    ProtocolViolation { expected: Opcode, got: u8 },
    /// Setter submitted an empty or non-alphabetic word; re-requested
    /// rather than escalated.
    #[error("word must be non-empty ascii letters")]
    MalformedWord,
    /// A queued connection whose liveness flag already dropped; skipped.
    #[error("connection {0} is no longer live")]
    StaleReference(u32),
    #[error(transparent)]
    Codec(#[from] WireError),
}

pub type GameResult<T> = Result<T, GameError>;
