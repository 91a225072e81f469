//! Session orchestration: one coin-flipped round for a paired connection
//! set, then the restart negotiation deciding who returns to the lobby.

use crate::connection::Connection;
use crate::round::{self, RoundOutcome};
use log::{debug, info, warn};
use shared::Message;

/// Runs a session for a freshly paired connection set and returns the
/// connections that stay with the server. Everyone not returned is already
/// closed.
///
/// Roles come from an unbiased coin flip, so the same player can end up
/// setting twice in a row across re-pairings. When both players continue
/// they go back to the general lobby rather than looping here; repeated
/// rounds between the same two players emerge from immediate re-pairing.
pub async fn run_session(first: Connection, second: Connection) -> Vec<Connection> {
    let ids = (first.id, second.id);
    info!("session start: connections {} and {}", ids.0, ids.1);

    let mut players = [first, second];
    let mut scores = [0u32; 2];

    let setter_index = usize::from(rand::random::<bool>());
    let guesser_index = 1 - setter_index;

    let outcome = {
        let (left, right) = players.split_at_mut(1);
        let (setter, guesser) = if setter_index == 0 {
            (&mut left[0], &mut right[0])
        } else {
            (&mut right[0], &mut left[0])
        };
        round::run_round(setter, guesser).await
    };

    match outcome {
        Ok(RoundOutcome::GuesserWon) => scores[guesser_index] += 1,
        Ok(RoundOutcome::GuesserLost) => {}
        Err(e) => {
            // Round failure disbands the pair; neither side is re-lobbied.
            warn!("session {}/{} aborted: {}", ids.0, ids.1, e);
            return Vec::new();
        }
    }
    info!(
        "session {}/{} over: connection {} ({:?}) scored {}, connection {} ({:?}) scored {}",
        ids.0,
        ids.1,
        players[0].id,
        players[0].role,
        scores[0],
        players[1].id,
        players[1].role,
        scores[1]
    );

    negotiate_restart(players).await
}

/// Asks both players for another round and applies the decision matrix:
/// each connection survives exactly when its own flag says continue, and a
/// failed, late, or mis-framed reply counts as a decline for that
/// connection without touching the other player's outcome.
async fn negotiate_restart(mut players: [Connection; 2]) -> Vec<Connection> {
    for player in players.iter_mut() {
        if player.send(&Message::Restart { flag: 1 }).await.is_err() {
            // The failed vote read below turns this into a decline.
            debug!("connection {}: restart ask failed", player.id);
        }
    }

    let mut flags = [false; 2];
    for (index, player) in players.iter_mut().enumerate() {
        flags[index] = match player.read_restart_reply().await {
            Ok(flag) => flag,
            Err(e) => {
                debug!(
                    "connection {}: no restart reply ({}), counting as decline",
                    player.id, e
                );
                false
            }
        };
    }

    let mut survivors = Vec::new();
    for (mut player, wants_restart) in players.into_iter().zip(flags) {
        let confirmed = player
            .send(&Message::RestartConfirm {
                resume: wants_restart,
            })
            .await
            .is_ok();
        if wants_restart && confirmed {
            info!("connection {} returns to the lobby", player.id);
            survivors.push(player);
        } else {
            info!("connection {} leaves", player.id);
            // Dropping the connection closes the socket.
        }
    }
    survivors
}
