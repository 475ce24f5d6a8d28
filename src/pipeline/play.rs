//! Turn-based self-play with deferred, zero-sum credit assignment

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Agent, Game},
};

/// What a player did on their last turn and what it has earned them since
///
/// Overwritten every time the player moves. Until then `state` and `action`
/// are `None` and the record only collects the negated rewards of other
/// players' moves.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord<S, A> {
    pub state: Option<S>,
    pub action: Option<A>,
    pub reward: f64,
}

impl<S, A> Default for TurnRecord<S, A> {
    fn default() -> Self {
        Self {
            state: None,
            action: None,
            reward: 0.0,
        }
    }
}

impl<S, A> TurnRecord<S, A> {
    /// The record of a move that just earned `reward`
    pub fn new(state: S, action: A, reward: f64) -> Self {
        Self {
            state: Some(state),
            action: Some(action),
            reward,
        }
    }

    /// The move still waiting to be learned from, if the player has moved
    pub fn pending(&self) -> Option<(&S, &A)> {
        self.state.as_ref().zip(self.action.as_ref())
    }
}

/// Result of one complete game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayOutcome {
    /// Index of the winning player, `None` for a draw or a loser-only ending
    pub winner: Option<usize>,
    /// Score reported for the last move
    pub final_reward: f64,
    /// Number of moves made
    pub moves: usize,
}

/// Winner implied by the score of the last move.
///
/// A positive score wins for the mover. A negative one only implies a
/// winner in a two-player game, where it is the other player.
pub fn infer_winner(mover: usize, final_reward: f64, num_players: usize) -> Option<usize> {
    if final_reward > 0.0 {
        Some(mover)
    } else if final_reward < 0.0 && num_players == 2 {
        Some(1 - mover)
    } else {
        None
    }
}

/// Play one game to the end, training every player along the way.
///
/// Players move in slice order, round after round, until the game reports
/// that it is over. Before each move a player learns from its previous move,
/// judged against the state it faces now. Every reward is credited to the
/// mover and debited from all other players. Once the game is over each
/// player that moved learns once more from the final state.
///
/// # Errors
///
/// Returns [`Error::NoPlayers`] for an empty slice. Errors raised by the
/// players are returned unchanged and end the game.
pub fn play<G: Game>(game: &G, players: &mut [&mut dyn Agent<G>]) -> Result<PlayOutcome> {
    if players.is_empty() {
        return Err(Error::NoPlayers);
    }

    let mut records: Vec<TurnRecord<G::State, G::Action>> =
        players.iter().map(|_| TurnRecord::default()).collect();
    let mut state = game.init_state();
    let mut moves = 0;

    let (mover, final_reward) = 'game: loop {
        for (index, player) in players.iter_mut().enumerate() {
            let record = &records[index];
            if let Some((old_state, action)) = record.pending() {
                debug!(
                    "updating {} {:?} -- {:?} --> {:?} = {}",
                    player.id(),
                    old_state,
                    action,
                    state,
                    record.reward
                );
                player.update_action_value(game, old_state, action, &state, record.reward)?;
            }

            let action = player.choose_action(game, &state)?;
            let new_state = game.updated(&state, &action);
            let (reward, game_over) = game.score_and_game_over(&new_state);

            let old_state = std::mem::replace(&mut state, new_state);
            records[index] = TurnRecord::new(old_state, action, reward);
            for (other, record) in records.iter_mut().enumerate() {
                if other != index {
                    record.reward -= reward;
                }
            }

            moves += 1;
            if game_over {
                break 'game (index, reward);
            }
        }
    };

    for (player, record) in players.iter_mut().zip(&records) {
        if let Some((old_state, action)) = record.pending() {
            debug!(
                "final update {} {:?} -- {:?} --> {:?} = {}",
                player.id(),
                old_state,
                action,
                state,
                record.reward
            );
            player.update_action_value(game, old_state, action, &state, record.reward)?;
        }
    }

    Ok(PlayOutcome {
        winner: infer_winner(mover, final_reward, players.len()),
        final_reward,
        moves,
    })
}

/// Fraction of rounds won by each player identifier
///
/// Identifiers that never won are absent rather than present with 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinFractions {
    rounds: usize,
    fractions: BTreeMap<String, f64>,
}

impl WinFractions {
    /// Fractions from per-identifier win counts over `rounds` rounds
    pub fn from_counts(counts: &BTreeMap<String, usize>, rounds: usize) -> Self {
        let fractions = if rounds == 0 {
            BTreeMap::new()
        } else {
            counts
                .iter()
                .filter(|(_, wins)| **wins > 0)
                .map(|(id, &wins)| (id.clone(), wins as f64 / rounds as f64))
                .collect()
        };
        Self { rounds, fractions }
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.fractions.get(id).copied()
    }

    /// Fraction won by `id`, 0 when it never won
    pub fn fraction(&self, id: &str) -> f64 {
        self.get(id).unwrap_or(0.0)
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Fraction of rounds nobody won
    pub fn draw_fraction(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            1.0 - self.fractions.values().sum::<f64>()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fractions.iter().map(|(id, &f)| (id.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }
}

/// Play `num_rounds` games and report the fraction each identifier won.
///
/// Players keep learning throughout.
pub fn play_many<G: Game>(
    game: &G,
    players: &mut [&mut dyn Agent<G>],
    num_rounds: usize,
) -> Result<WinFractions> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..num_rounds {
        let outcome = play(game, players)?;
        if let Some(winner) = outcome.winner {
            *counts.entry(players[winner].id().to_string()).or_default() += 1;
        }
    }
    Ok(WinFractions::from_counts(&counts, num_rounds))
}
