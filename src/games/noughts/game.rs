//! Noughts and crosses rules

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, CELLS, Marker, SIZE, row_label};
use crate::ports::Game;

/// Placing the next marker at `(row, col)`
///
/// Displayed as a row letter and column number, so `(1, 2)` is `B3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoughtsAction {
    pub row: usize,
    pub col: usize,
}

impl NoughtsAction {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major cell index
    pub fn index(&self) -> usize {
        self.row * SIZE + self.col
    }

    pub fn from_index(index: usize) -> Self {
        Self::new(index / SIZE, index % SIZE)
    }
}

impl fmt::Display for NoughtsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", row_label(self.row), self.col + 1)
    }
}

/// A board and the index (0 or 1) of the player to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NoughtsState {
    pub board: Board,
    pub next_player: usize,
}

impl NoughtsState {
    pub fn new(board: Board, next_player: usize) -> Self {
        Self { board, next_player }
    }
}

impl fmt::Display for NoughtsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.board, f)
    }
}

/// Two-player noughts and crosses on a 3x3 board
///
/// `markers[i]` is the mark placed by player `i`; by default X moves first.
/// With a symmetric opening the first move is limited to a corner, an edge
/// or the centre, since every other opening is a rotation or reflection of
/// one of those.
///
/// # Examples
///
/// ```
/// use turn_learner::{
///     games::noughts::{Noughts, NoughtsAction},
///     ports::Game,
/// };
///
/// let game = Noughts::default();
/// let state = game.updated(&game.init_state(), &NoughtsAction::new(1, 1));
/// assert_eq!(state.next_player, 1);
/// assert_eq!(game.actions(&state).len(), 8);
/// assert_eq!(NoughtsAction::new(1, 2).to_string(), "B3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Noughts {
    markers: [Marker; 2],
    symmetric_opening: bool,
}

/// Representative first moves: corner, edge and centre
const OPENING_CELLS: [(usize, usize); 3] = [(0, 0), (1, 0), (1, 1)];

impl Noughts {
    pub fn new(markers: [Marker; 2]) -> Self {
        Self {
            markers,
            symmetric_opening: false,
        }
    }

    pub fn with_symmetric_opening(mut self, symmetric_opening: bool) -> Self {
        self.symmetric_opening = symmetric_opening;
        self
    }

    pub fn symmetric_opening(&self) -> bool {
        self.symmetric_opening
    }

    pub fn markers(&self) -> [Marker; 2] {
        self.markers
    }

    /// Index of the player who owns `marker`
    pub fn player_of(&self, marker: Marker) -> usize {
        if marker == self.markers[0] { 0 } else { 1 }
    }

    /// Index of the player with three in a row, if any
    pub fn winner(&self, state: &NoughtsState) -> Option<usize> {
        state.board.winner().map(|marker| self.player_of(marker))
    }
}

impl Default for Noughts {
    fn default() -> Self {
        Self::new([Marker::X, Marker::O])
    }
}

impl Game for Noughts {
    type State = NoughtsState;
    type Action = NoughtsAction;

    fn init_state(&self) -> NoughtsState {
        NoughtsState::default()
    }

    fn actions(&self, state: &NoughtsState) -> Vec<NoughtsAction> {
        if self.symmetric_opening && state.board.empty_positions().count() == CELLS {
            return OPENING_CELLS
                .iter()
                .map(|&(row, col)| NoughtsAction::new(row, col))
                .collect();
        }
        state
            .board
            .empty_positions()
            .map(|(row, col)| NoughtsAction::new(row, col))
            .collect()
    }

    fn updated(&self, state: &NoughtsState, action: &NoughtsAction) -> NoughtsState {
        let marker = self.markers[state.next_player % 2];
        NoughtsState {
            board: state.board.with(action.row, action.col, marker.to_cell()),
            next_player: 1 - state.next_player % 2,
        }
    }

    /// Scored for whoever just moved, who is never `next_player`.
    fn score_and_game_over(&self, state: &NoughtsState) -> (f64, bool) {
        match self.winner(state) {
            Some(winner) if winner == state.next_player => (-1.0, true),
            Some(_) => (1.0, true),
            None => (0.0, state.board.is_full()),
        }
    }
}
