use std::time::Duration;
use thiserror::Error;

/// Wrong guesses a round tolerates before the guesser loses.
pub const MAX_ERRORS: u8 = 6;

/// How long either end waits on a blocking read before the session is dropped.
pub const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Hard cap for a single length-prefixed field (one length byte).
pub const MAX_FIELD_LEN: usize = 255;

/// Frame opcodes. Values 3 and 10 are unassigned and decode as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    SetWord = 1,
    Guess = 2,
    Restart = 4,
    Start = 5,
    GameOverWin = 6,
    GameOverLose = 7,
    PlayerRole = 8,
    GameState = 9,
    OpponentWon = 11,
    OpponentLost = 12,
    RestartConfirm = 13,
    WaitingForPlayer = 14,
}

impl Opcode {
    pub fn from_u8(byte: u8) -> Option<Opcode> {
        match byte {
            1 => Some(Opcode::SetWord),
            2 => Some(Opcode::Guess),
            4 => Some(Opcode::Restart),
            5 => Some(Opcode::Start),
            6 => Some(Opcode::GameOverWin),
            7 => Some(Opcode::GameOverLose),
            8 => Some(Opcode::PlayerRole),
            9 => Some(Opcode::GameState),
            11 => Some(Opcode::OpponentWon),
            12 => Some(Opcode::OpponentLost),
            13 => Some(Opcode::RestartConfirm),
            14 => Some(Opcode::WaitingForPlayer),
            _ => None,
        }
    }
}

/// Which side of the round a player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Role {
    Setter = 1,
    Guesser = 2,
}

impl Role {
    pub fn from_u8(byte: u8) -> Option<Role> {
        match byte {
            1 => Some(Role::Setter),
            2 => Some(Role::Guesser),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("field of {len} bytes exceeds the {MAX_FIELD_LEN}-byte frame limit")]
    FieldTooLong { len: usize },
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("frame ends before its declared payload")]
    Truncated,
    #[error("frame carries {0} bytes beyond its payload")]
    TrailingBytes(usize),
    #[error("unknown role byte {0}")]
    BadRole(u8),
}

/// A single protocol frame.
///
/// `SetWordRequest` is the server's bare-opcode prompt; `SetWord` is the
/// client's length-prefixed reply on the same opcode. `Restart` carries the
/// server's ask (flag 1) and the client's reply flag in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    PlayerRole { role: Role },
    SetWordRequest,
    SetWord { word: Vec<u8> },
    Start { word_len: u8 },
    Guess { letter: u8 },
    GameState { display: Vec<u8>, wrong: Vec<u8>, remaining: u8, your_turn: bool },
    GameOverWin { word: Vec<u8> },
    GameOverLose { word: Vec<u8> },
    OpponentWon { word: Vec<u8> },
    OpponentLost { word: Vec<u8> },
    Restart { flag: u8 },
    RestartConfirm { resume: bool },
    WaitingForPlayer,
}

impl Message {
    pub fn opcode(&self) -> Opcode {
        match self {
            Message::PlayerRole { .. } => Opcode::PlayerRole,
            Message::SetWordRequest | Message::SetWord { .. } => Opcode::SetWord,
            Message::Start { .. } => Opcode::Start,
            Message::Guess { .. } => Opcode::Guess,
            Message::GameState { .. } => Opcode::GameState,
            Message::GameOverWin { .. } => Opcode::GameOverWin,
            Message::GameOverLose { .. } => Opcode::GameOverLose,
            Message::OpponentWon { .. } => Opcode::OpponentWon,
            Message::OpponentLost { .. } => Opcode::OpponentLost,
            Message::Restart { .. } => Opcode::Restart,
            Message::RestartConfirm { .. } => Opcode::RestartConfirm,
            Message::WaitingForPlayer => Opcode::WaitingForPlayer,
        }
    }

    /// Encodes the frame as it goes on the wire.
    ///
    /// Fields longer than one length byte can express are rejected, never
    /// truncated.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut frame = vec![self.opcode() as u8];
        match self {
            Message::PlayerRole { role } => frame.push(*role as u8),
            Message::SetWordRequest => {}
            Message::SetWord { word } => put_field(&mut frame, word)?,
            Message::Start { word_len } => frame.push(*word_len),
            Message::Guess { letter } => frame.push(*letter),
            Message::GameState { display, wrong, remaining, your_turn } => {
                put_field(&mut frame, display)?;
                put_field(&mut frame, wrong)?;
                frame.push(*remaining);
                frame.push(u8::from(*your_turn));
            }
            Message::GameOverWin { word }
            | Message::GameOverLose { word }
            | Message::OpponentWon { word }
            | Message::OpponentLost { word } => put_field(&mut frame, word)?,
            Message::Restart { flag } => frame.push(*flag),
            Message::RestartConfirm { resume } => frame.push(u8::from(*resume)),
            Message::WaitingForPlayer => frame.push(0),
        }
        Ok(frame)
    }

    /// Decodes one complete frame.
    ///
    /// A lone SETWORD opcode is the server's request; with a payload it is
    /// the client's reply.
    pub fn decode(frame: &[u8]) -> Result<Message, WireError> {
        let (&opcode, payload) = frame.split_first().ok_or(WireError::Truncated)?;
        let opcode = Opcode::from_u8(opcode).ok_or(WireError::UnknownOpcode(opcode))?;

        let mut cursor = Cursor { payload, pos: 0 };
        let message = match opcode {
            Opcode::PlayerRole => {
                let byte = cursor.byte()?;
                let role = Role::from_u8(byte).ok_or(WireError::BadRole(byte))?;
                Message::PlayerRole { role }
            }
            Opcode::SetWord => {
                if payload.is_empty() {
                    Message::SetWordRequest
                } else {
                    Message::SetWord { word: cursor.field()? }
                }
            }
            Opcode::Start => Message::Start { word_len: cursor.byte()? },
            Opcode::Guess => Message::Guess { letter: cursor.byte()? },
            Opcode::GameState => Message::GameState {
                display: cursor.field()?,
                wrong: cursor.field()?,
                remaining: cursor.byte()?,
                your_turn: cursor.byte()? != 0,
            },
            Opcode::GameOverWin => Message::GameOverWin { word: cursor.field()? },
            Opcode::GameOverLose => Message::GameOverLose { word: cursor.field()? },
            Opcode::OpponentWon => Message::OpponentWon { word: cursor.field()? },
            Opcode::OpponentLost => Message::OpponentLost { word: cursor.field()? },
            Opcode::Restart => Message::Restart { flag: cursor.byte()? },
            Opcode::RestartConfirm => Message::RestartConfirm { resume: cursor.byte()? != 0 },
            Opcode::WaitingForPlayer => {
                cursor.byte()?; // filler
                Message::WaitingForPlayer
            }
        };

        let rest = cursor.payload.len() - cursor.pos;
        if rest > 0 {
            return Err(WireError::TrailingBytes(rest));
        }
        Ok(message)
    }
}

fn put_field(frame: &mut Vec<u8>, data: &[u8]) -> Result<(), WireError> {
    if data.len() > MAX_FIELD_LEN {
        return Err(WireError::FieldTooLong { len: data.len() });
    }
    frame.push(data.len() as u8);
    frame.extend_from_slice(data);
    Ok(())
}

struct Cursor<'a> {
    payload: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn byte(&mut self) -> Result<u8, WireError> {
        let byte = *self.payload.get(self.pos).ok_or(WireError::Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    fn field(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.byte()? as usize;
        let end = self.pos + len;
        let data = self.payload.get(self.pos..end).ok_or(WireError::Truncated)?;
        self.pos = end;
        Ok(data.to_vec())
    }
}
