//! Frame I/O against the server socket.

use shared::{Message, Opcode, WireError};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Error)]
pub enum NetError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Wire(#[from] WireError),
    /// Opcode this reader does not know. The caller logs it and keeps
    /// reading; nothing was consumed past the opcode byte.
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
}

/// Reads one server frame.
///
/// Every opcode has a fixed payload shape, so the reader pulls exactly the
/// bytes the frame owns and hands the whole thing to the shared decoder.
pub async fn read_server_message<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Message, NetError> {
    let mut opcode = [0u8; 1];
    reader.read_exact(&mut opcode).await?;
    let parsed = Opcode::from_u8(opcode[0]).ok_or(NetError::UnknownOpcode(opcode[0]))?;

    let mut frame = vec![opcode[0]];
    match parsed {
        // The server's SETWORD prompt is a bare opcode.
        Opcode::SetWord => {}
        Opcode::PlayerRole
        | Opcode::Start
        | Opcode::Guess
        | Opcode::Restart
        | Opcode::RestartConfirm
        | Opcode::WaitingForPlayer => read_bytes(reader, &mut frame, 1).await?,
        Opcode::GameOverWin
        | Opcode::GameOverLose
        | Opcode::OpponentWon
        | Opcode::OpponentLost => read_field(reader, &mut frame).await?,
        Opcode::GameState => {
            read_field(reader, &mut frame).await?; // masked display
            read_field(reader, &mut frame).await?; // wrong letters
            read_bytes(reader, &mut frame, 2).await?; // remaining + turn flag
        }
    }
    Ok(Message::decode(&frame)?)
}

async fn read_bytes<R: AsyncRead + Unpin>(
    reader: &mut R,
    frame: &mut Vec<u8>,
    count: usize,
) -> std::io::Result<()> {
    let start = frame.len();
    frame.resize(start + count, 0);
    reader.read_exact(&mut frame[start..]).await?;
    Ok(())
}

async fn read_field<R: AsyncRead + Unpin>(
    reader: &mut R,
    frame: &mut Vec<u8>,
) -> std::io::Result<()> {
    let mut len = [0u8; 1];
    reader.read_exact(&mut len).await?;
    frame.push(len[0]);
    read_bytes(reader, frame, len[0] as usize).await
}

/// Encodes and writes one frame to the server.
pub async fn send_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &Message,
) -> Result<(), NetError> {
    let frame = message.encode()?;
    writer.write_all(&frame).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Role;

    #[tokio::test]
    async fn test_reads_game_state_frame() {
        let mut mock = tokio_test::io::Builder::new()
            .read(&[9, 3, b'c', b'_', b'_', 2, b'x', b'y', 4, 1])
            .build();
        let message = read_server_message(&mut mock).await.unwrap();
        assert_eq!(
            message,
            Message::GameState {
                display: b"c__".to_vec(),
                wrong: b"xy".to_vec(),
                remaining: 4,
                your_turn: true,
            }
        );
    }

    #[tokio::test]
    async fn test_reads_bare_setword_request() {
        let mut mock = tokio_test::io::Builder::new().read(&[1]).build();
        let message = read_server_message(&mut mock).await.unwrap();
        assert_eq!(message, Message::SetWordRequest);
    }

    #[tokio::test]
    async fn test_reads_consecutive_frames_from_one_chunk() {
        let mut mock = tokio_test::io::Builder::new()
            .read(&[14, 0, 8, 2])
            .build();
        assert_eq!(
            read_server_message(&mut mock).await.unwrap(),
            Message::WaitingForPlayer
        );
        assert_eq!(
            read_server_message(&mut mock).await.unwrap(),
            Message::PlayerRole {
                role: Role::Guesser
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_opcode_is_reported() {
        let mut mock = tokio_test::io::Builder::new().read(&[3]).build();
        match read_server_message(&mut mock).await {
            Err(NetError::UnknownOpcode(3)) => {}
            other => panic!("expected unknown opcode, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_writes_wire_frame() {
        let mut mock = tokio_test::io::Builder::new()
            .write(&[2, b'q'])
            .build();
        send_message(&mut mock, &Message::Guess { letter: b'q' })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reads_game_over_with_word() {
        let mut mock = tokio_test::io::Builder::new()
            .read(&[6, 3, b'c', b'a', b't'])
            .build();
        assert_eq!(
            read_server_message(&mut mock).await.unwrap(),
            Message::GameOverWin {
                word: b"cat".to_vec()
            }
        );
    }
}
