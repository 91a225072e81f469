//! Terminal client for the hangman server.
//!
//! The client is frame-driven: it reads one server message at a time,
//! updates its local view of the round, and prompts on stdin whenever the
//! protocol expects something back (the secret word, a guess, or the
//! play-again decision). Unknown opcodes are logged and skipped so the
//! reader can resynchronize.

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
