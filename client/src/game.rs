//! Client-side view of the round, fed by server frames.

use shared::{Role, MAX_ERRORS};

/// What the player currently sees. The server state is authoritative;
/// this struct only mirrors the latest broadcast.
#[derive(Debug, Default)]
pub struct ClientGame {
    pub role: Option<Role>,
    pub display: Vec<u8>,
    pub wrong: Vec<u8>,
    pub remaining: u8,
    pub my_turn: bool,
}

impl ClientGame {
    pub fn new() -> Self {
        Self {
            remaining: MAX_ERRORS,
            ..Default::default()
        }
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    pub fn is_setter(&self) -> bool {
        self.role == Some(Role::Setter)
    }

    /// Resets the view to `word_len` blanks for a fresh round.
    pub fn begin_round(&mut self, word_len: u8) {
        self.display = vec![b'_'; word_len as usize];
        self.wrong.clear();
        self.remaining = MAX_ERRORS;
        self.my_turn = false;
    }

    /// Adopts the authoritative state broadcast by the server.
    pub fn apply_state(&mut self, display: Vec<u8>, wrong: Vec<u8>, remaining: u8, my_turn: bool) {
        self.display = display;
        self.wrong = wrong;
        self.remaining = remaining;
        self.my_turn = my_turn;
    }

    /// True when the letter is already revealed or known wrong; such
    /// guesses are rejected locally before they cost a round trip.
    pub fn already_tried(&self, letter: u8) -> bool {
        let letter = letter.to_ascii_lowercase();
        self.display.contains(&letter) || self.wrong.contains(&letter)
    }

    /// True once the latest broadcast shows a finished round: everything
    /// revealed or no attempts left.
    pub fn round_over(&self) -> bool {
        !self.display.contains(&b'_') || self.remaining == 0
    }
}
