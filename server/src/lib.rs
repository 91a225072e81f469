//! # Hangman Game Server Library
//!
//! Server core for the two-player hangman game played over raw TCP.
//!
//! The server pairs waiting connections into sessions, runs setter/guesser
//! rounds over the binary protocol defined in the `shared` crate, and
//! negotiates between rounds whether each player returns to the lobby or
//! leaves.
//!
//! ## Module Organization
//!
//! ### Connection Module (`connection`)
//! Exact-byte-count reads with the session timeout applied, frame writes,
//! and the typed reads (guess, word submission, restart reply) the game
//! layers build on.
//!
//! ### Lobby Module (`lobby`)
//! The only state shared across connection tasks: a mutex-protected FIFO
//! queue pairing idle connections into sessions.
//!
//! ### Round Module (`round`)
//! One setter/guesser round: word submission with re-request on malformed
//! input, the guess loop with its error budget, and the terminal
//! notifications.
//!
//! ### Session Module (`session`)
//! Orchestrates a paired round, keeps the pair's scores, and runs the
//! restart negotiation that decides who survives into the lobby.
//!
//! ### Handler Module (`handler`)
//! The accept loop and the per-connection task driving lobby registration,
//! pairing, and session hand-off.
//!
//! ## Concurrency Model
//!
//! One tokio task per accepted connection. The lobby queue is the only
//! cross-task state and its lock is never held across I/O. Within a
//! session a single task drives both sockets sequentially, so sessions
//! need no locking. Any read timeout, disconnect, or protocol violation
//! unwinds the whole session; the owning task returns cleanly and the
//! accept loop is never affected.

pub mod connection;
pub mod error;
pub mod handler;
pub mod lobby;
pub mod round;
pub mod session;
