//! One setter/guesser round: word submission, the guess loop with its
//! error budget, and the terminal notifications.

use crate::connection::Connection;
use crate::error::{GameError, GameResult};
use log::{debug, info, warn};
use shared::{Message, Role, MAX_ERRORS};

/// Terminal result of a round, seen from the guesser's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    GuesserWon,
    GuesserLost,
}

/// What a single guess did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    /// Repeated or non-alphabetic letter; costs nothing and changes
    /// nothing.
    Ignored,
    Hit,
    Miss,
}

/// Bookkeeping for a round in progress. Pure state; all socket traffic
/// lives in [`run_round`].
pub struct RoundState {
    word: Vec<u8>,
    display: Vec<u8>,
    wrong: Vec<u8>,
    guessed: Vec<u8>,
    errors: u8,
}

impl RoundState {
    /// Accepts only non-empty, all-alphabetic submissions.
    pub fn validate_word(raw: &[u8]) -> GameResult<()> {
        if raw.is_empty() || !raw.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(GameError::MalformedWord);
        }
        Ok(())
    }

    /// Builds the round from a submitted word, normalized to lowercase.
    /// Alphabetic positions are masked; anything else shows through.
    pub fn new(raw: &[u8]) -> Self {
        let word: Vec<u8> = raw.iter().map(|b| b.to_ascii_lowercase()).collect();
        let display = word
            .iter()
            .map(|&b| if b.is_ascii_alphabetic() { b'_' } else { b })
            .collect();
        Self {
            word,
            display,
            wrong: Vec::new(),
            guessed: Vec::new(),
            errors: 0,
        }
    }

    /// Applies one letter to the round.
    pub fn apply_guess(&mut self, letter: u8) -> GuessResult {
        let letter = letter.to_ascii_lowercase();
        if !letter.is_ascii_alphabetic() || self.guessed.contains(&letter) {
            return GuessResult::Ignored;
        }
        self.guessed.push(letter);
        if self.word.contains(&letter) {
            for (position, &b) in self.word.iter().enumerate() {
                if b == letter {
                    self.display[position] = letter;
                }
            }
            GuessResult::Hit
        } else {
            self.errors += 1;
            self.wrong.push(letter);
            GuessResult::Miss
        }
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if !self.display.contains(&b'_') {
            Some(RoundOutcome::GuesserWon)
        } else if self.errors >= MAX_ERRORS {
            Some(RoundOutcome::GuesserLost)
        } else {
            None
        }
    }

    pub fn remaining(&self) -> u8 {
        MAX_ERRORS.saturating_sub(self.errors)
    }

    pub fn word(&self) -> &[u8] {
        &self.word
    }

    pub fn display(&self) -> &[u8] {
        &self.display
    }

    pub fn wrong(&self) -> &[u8] {
        &self.wrong
    }

    pub fn errors(&self) -> u8 {
        self.errors
    }
}

/// Runs one full round between the paired connections.
///
/// Any read timeout, disconnect, or protocol violation propagates out and
/// the caller disbands the whole session; only a malformed word submission
/// is recovered here, by asking again.
pub async fn run_round(
    setter: &mut Connection,
    guesser: &mut Connection,
) -> GameResult<RoundOutcome> {
    setter.role = Some(Role::Setter);
    guesser.role = Some(Role::Guesser);
    setter.send(&Message::PlayerRole { role: Role::Setter }).await?;
    guesser.send(&Message::PlayerRole { role: Role::Guesser }).await?;

    let word = await_word(setter).await?;
    let mut round = RoundState::new(&word);
    info!(
        "round start: connection {} set a {}-letter word for connection {}",
        setter.id,
        round.word().len(),
        guesser.id
    );

    guesser
        .send(&Message::Start {
            word_len: round.word().len() as u8,
        })
        .await?;
    broadcast_state(setter, guesser, &round).await?;

    let outcome = loop {
        let letter = guesser.read_guess().await?;
        match round.apply_guess(letter) {
            GuessResult::Ignored => {
                debug!(
                    "connection {}: letter '{}' repeated or invalid, state unchanged",
                    guesser.id, letter as char
                );
                broadcast_state(setter, guesser, &round).await?;
                continue;
            }
            GuessResult::Hit => debug!("connection {}: hit '{}'", guesser.id, letter as char),
            GuessResult::Miss => debug!("connection {}: miss #{}", guesser.id, round.errors()),
        }
        let outcome = round.outcome();
        broadcast_state(setter, guesser, &round).await?;
        if let Some(outcome) = outcome {
            break outcome;
        }
    };

    let word = round.word().to_vec();
    match outcome {
        RoundOutcome::GuesserWon => {
            info!("connection {} guessed the word", guesser.id);
            guesser
                .send(&Message::GameOverWin { word: word.clone() })
                .await?;
            setter.send(&Message::OpponentWon { word }).await?;
        }
        RoundOutcome::GuesserLost => {
            info!("connection {} ran out of attempts", guesser.id);
            guesser
                .send(&Message::GameOverLose { word: word.clone() })
                .await?;
            setter.send(&Message::OpponentLost { word }).await?;
        }
    }
    Ok(outcome)
}

/// Requests the secret word until the setter produces a usable one. Every
/// attempt runs under the same read timeout as any other blocking receive.
async fn await_word(setter: &mut Connection) -> GameResult<Vec<u8>> {
    loop {
        setter.send(&Message::SetWordRequest).await?;
        let raw = setter.read_word().await?;
        match RoundState::validate_word(&raw) {
            Ok(()) => return Ok(raw),
            Err(e) => warn!("connection {}: {}; asking again", setter.id, e),
        }
    }
}

/// Sends the current state to both players. The guesser holds the turn
/// flag for the whole round.
async fn broadcast_state(
    setter: &mut Connection,
    guesser: &mut Connection,
    round: &RoundState,
) -> GameResult<()> {
    guesser
        .send(&Message::GameState {
            display: round.display().to_vec(),
            wrong: round.wrong().to_vec(),
            remaining: round.remaining(),
            your_turn: true,
        })
        .await?;
    setter
        .send(&Message::GameState {
            display: round.display().to_vec(),
            wrong: round.wrong().to_vec(),
            remaining: round.remaining(),
            your_turn: false,
        })
        .await
}
