//! Common test utilities for the turn-learner test suite.
//!
//! This module provides a game with scripted scores, an agent that records
//! the updates it receives, and helpers for training countdown agents.

#![allow(dead_code)]

use turn_learner::{
    Error, Result,
    games::Countdown,
    pipeline::{Trainer, TrainingConfig, TrainingResult},
    ports::{Agent, Game},
    q_learning::{QAgent, QAgentConfig},
};

/// A game with a single action whose `k`-th move scores `scores[k]`.
///
/// The state is the number of moves made so far; the game ends after the
/// last scripted score.
#[derive(Debug, Clone)]
pub struct ScriptedGame {
    pub scores: Vec<f64>,
}

impl ScriptedGame {
    pub fn new(scores: &[f64]) -> Self {
        Self {
            scores: scores.to_vec(),
        }
    }
}

impl Game for ScriptedGame {
    type State = usize;
    type Action = ();

    fn init_state(&self) -> usize {
        0
    }

    fn actions(&self, state: &usize) -> Vec<()> {
        if *state < self.scores.len() {
            vec![()]
        } else {
            Vec::new()
        }
    }

    fn updated(&self, state: &usize, _action: &()) -> usize {
        state + 1
    }

    fn score_and_game_over(&self, state: &usize) -> (f64, bool) {
        match state.checked_sub(1) {
            Some(last) => (
                self.scores.get(last).copied().unwrap_or(0.0),
                *state >= self.scores.len(),
            ),
            None => (0.0, self.scores.is_empty()),
        }
    }
}

/// One update an agent received: old state, new state, reward
pub type Update = (usize, usize, f64);

/// Agent that always plays the only action and records its updates
#[derive(Debug)]
pub struct Recorder {
    pub id: String,
    pub updates: Vec<Update>,
}

impl Recorder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            updates: Vec::new(),
        }
    }
}

impl Agent<ScriptedGame> for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn choose_action(&mut self, game: &ScriptedGame, state: &usize) -> Result<()> {
        game.actions(state)
            .pop()
            .ok_or_else(|| Error::NoLegalActions {
                state: state.to_string(),
            })
    }

    fn value(&self, _game: &ScriptedGame, _state: &usize) -> Result<f64> {
        Ok(0.0)
    }

    fn update_action_value(
        &mut self,
        _game: &ScriptedGame,
        old_state: &usize,
        _action: &(),
        new_state: &usize,
        reward: f64,
    ) -> Result<()> {
        self.updates.push((*old_state, *new_state, reward));
        Ok(())
    }

    fn explore_chance(&self) -> f64 {
        0.0
    }

    fn set_explore_chance(&mut self, _explore_chance: f64) {}
}

/// Train a single tabular agent on countdown with a decaying explore chance.
///
/// The agent ends frozen (explore chance 0).
pub fn trained_countdown_agent(
    game: &Countdown,
    rounds: usize,
    seed: u64,
) -> (QAgent<Countdown>, TrainingResult) {
    let config = QAgentConfig {
        learning_rate: 0.5,
        explore_chance: 0.5,
        discount_factor: 0.9,
    };
    let mut agent: QAgent<Countdown> = QAgent::from_config("A", config).unwrap();
    let result = {
        let players: &mut [&mut dyn Agent<Countdown>] = &mut [&mut agent];
        Trainer::new(TrainingConfig {
            num_rounds: rounds,
            seed: Some(seed),
            reduce_explore_chance: true,
        })
        .run(game, players)
        .unwrap()
    };
    (agent, result)
}

/// Totals visited by `agent` playing countdown alone from the start.
///
/// Stops when the game ends or after `start` moves.
pub fn rollout(game: &Countdown, agent: &mut dyn Agent<Countdown>) -> Vec<i64> {
    let mut state = game.init_state();
    let mut path = vec![state];
    for _ in 0..game.start() {
        if game.score_and_game_over(&state).1 {
            break;
        }
        let action = agent.choose_action(game, &state).unwrap();
        state = game.updated(&state, &action);
        path.push(state);
    }
    path
}
