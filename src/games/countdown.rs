//! Countdown: subtract 1, 2 or 3 from a running total
//!
//! Whoever brings the total to exactly 0 scores a point and ends the game.
//! Played alone it is a shortest-path puzzle; played by two it is a
//! subtraction game whose losing positions are the multiples of 4.

use ndarray::Array2;

use crate::{
    dqn::onehot,
    ports::{ActionMask, DqnCodec, Game},
};

const MOVES: [i64; 3] = [3, 2, 1];

/// Countdown from `start` to 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    start: i64,
}

impl Countdown {
    pub fn new(start: i64) -> Self {
        Self { start }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    /// Codec encoding every total from 0 to `start` one-hot.
    pub fn codec(&self) -> CountdownCodec {
        CountdownCodec::new(self.start)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Game for Countdown {
    type State = i64;
    type Action = i64;

    fn init_state(&self) -> i64 {
        self.start
    }

    fn actions(&self, state: &i64) -> Vec<i64> {
        MOVES.iter().copied().filter(|&m| m <= *state).collect()
    }

    fn updated(&self, state: &i64, action: &i64) -> i64 {
        state - action
    }

    fn score_and_game_over(&self, state: &i64) -> (f64, bool) {
        if *state == 0 {
            (1.0, true)
        } else {
            (0.0, *state < 0)
        }
    }
}

/// One-hot state encoding over `0..=start`, action `a` at output `a - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownCodec {
    start: i64,
}

impl CountdownCodec {
    pub fn new(start: i64) -> Self {
        Self {
            start: start.max(0),
        }
    }

    fn state_index(&self, state: i64) -> Option<usize> {
        usize::try_from(state)
            .ok()
            .filter(|&index| index <= self.start as usize)
    }
}

impl DqnCodec<Countdown> for CountdownCodec {
    fn input_size(&self) -> usize {
        self.start as usize + 1
    }

    fn output_size(&self) -> usize {
        MOVES.len()
    }

    /// Totals outside `0..=start` encode as the zero vector.
    fn input_vector(&self, _game: &Countdown, state: &i64) -> Array2<f64> {
        let size = self.input_size();
        match self.state_index(*state) {
            Some(index) => onehot(index, size),
            None => Array2::zeros((1, size)),
        }
    }

    fn action_mask(&self, game: &Countdown, state: &i64) -> ActionMask {
        ActionMask::from_legal_indices(
            self.output_size(),
            game.actions(state)
                .iter()
                .map(|action| self.action_index(game, action)),
        )
    }

    fn action_and_value(
        &self,
        _game: &Countdown,
        output: &Array2<f64>,
        mask: &ActionMask,
    ) -> Option<(i64, f64)> {
        mask.masked_argmax(output.row(0))
            .map(|(index, value)| (index as i64 + 1, value))
    }

    fn action_index(&self, _game: &Countdown, action: &i64) -> usize {
        usize::try_from(action - 1).unwrap_or(usize::MAX)
    }
}
