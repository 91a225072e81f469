//! Stdin prompts for the secret word, guesses, and the restart decision.

use crate::game::ClientGame;
use shared::MAX_FIELD_LEN;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-based prompt helper over stdin. One instance per program so the
/// buffered reader never loses input between prompts.
pub struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, prompt: &str) -> std::io::Result<String> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        let line = self.lines.next_line().await?.ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed")
        })?;
        Ok(line.trim().to_ascii_lowercase())
    }

    /// Prompts until the player enters a usable secret word; the same
    /// checks the server applies, so a round trip is never wasted.
    pub async fn secret_word(&mut self) -> std::io::Result<String> {
        loop {
            let word = self.ask("Choose the secret word: ").await?;
            if !word.is_empty()
                && word.len() <= MAX_FIELD_LEN
                && word.bytes().all(|b| b.is_ascii_alphabetic())
            {
                return Ok(word);
            }
            println!("The word must be 1-{} ascii letters.", MAX_FIELD_LEN);
        }
    }

    /// Prompts until the player enters a single letter they have not tried
    /// this round.
    pub async fn guess(&mut self, game: &ClientGame) -> std::io::Result<u8> {
        loop {
            let line = self.ask("Your turn. Guess a letter: ").await?;
            let bytes = line.as_bytes();
            if bytes.len() == 1 && bytes[0].is_ascii_alphabetic() {
                if game.already_tried(bytes[0]) {
                    println!("You already tried '{}'.", line);
                    continue;
                }
                return Ok(bytes[0]);
            }
            println!("Enter exactly one letter.");
        }
    }

    /// Play-again decision; anything but "1" declines.
    pub async fn play_again(&mut self) -> std::io::Result<bool> {
        let answer = self.ask("Play again? (1=yes / 0=no): ").await?;
        Ok(answer == "1")
    }
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}
