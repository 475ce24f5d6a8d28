//! Network encodings of noughts and crosses
//!
//! Both codecs share the action side: nine outputs, one per cell in
//! row-major order, with every cell the game does not allow masked out. They differ in how the
//! board is presented to the input layer.

use ndarray::Array2;

use super::{
    board::{CELLS, Cell},
    game::{Noughts, NoughtsAction, NoughtsState},
};
use crate::{
    dqn::onehot,
    ports::{ActionMask, DqnCodec, Game},
};

/// Number of distinct boards when each cell is one of three values
pub const BOARD_STATES: usize = 3usize.pow(CELLS as u32);

fn cell_mask(game: &Noughts, state: &NoughtsState) -> ActionMask {
    ActionMask::from_legal_indices(
        CELLS,
        game.actions(state).iter().map(NoughtsAction::index),
    )
}

fn masked_action(output: &Array2<f64>, mask: &ActionMask) -> Option<(NoughtsAction, f64)> {
    mask.masked_argmax(output.row(0))
        .map(|(index, value)| (NoughtsAction::from_index(index), value))
}

/// Index of a board among all `3^9` boards
///
/// Cell `i` contributes `m * 3^i` where `m` is 0 when empty, 1 for the
/// first player's marker and 2 for the second's. Whose turn it is does not
/// take part.
pub fn board_index(game: &Noughts, state: &NoughtsState) -> usize {
    state
        .board
        .cells()
        .iter()
        .rev()
        .fold(0, |index, &cell| index * 3 + cell_digit(game, cell))
}

fn cell_digit(game: &Noughts, cell: Cell) -> usize {
    match cell.marker() {
        None => 0,
        Some(marker) => game.player_of(marker) + 1,
    }
}

/// One input per possible board, 18 hidden units by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneHotNoughtsCodec;

impl DqnCodec<Noughts> for OneHotNoughtsCodec {
    fn input_size(&self) -> usize {
        BOARD_STATES
    }

    fn output_size(&self) -> usize {
        CELLS
    }

    fn suggested_hidden_size(&self) -> usize {
        18
    }

    fn input_vector(&self, game: &Noughts, state: &NoughtsState) -> Array2<f64> {
        onehot(board_index(game, state), BOARD_STATES)
    }

    fn action_mask(&self, game: &Noughts, state: &NoughtsState) -> ActionMask {
        cell_mask(game, state)
    }

    fn action_and_value(
        &self,
        _game: &Noughts,
        output: &Array2<f64>,
        mask: &ActionMask,
    ) -> Option<(NoughtsAction, f64)> {
        masked_action(output, mask)
    }

    fn action_index(&self, _game: &Noughts, action: &NoughtsAction) -> usize {
        action.index()
    }
}

/// One input per cell: -1 for the first player's marker, 0 when empty,
/// +1 for the second player's. 81 hidden units by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactNoughtsCodec;

impl DqnCodec<Noughts> for CompactNoughtsCodec {
    fn input_size(&self) -> usize {
        CELLS
    }

    fn output_size(&self) -> usize {
        CELLS
    }

    fn suggested_hidden_size(&self) -> usize {
        81
    }

    fn input_vector(&self, game: &Noughts, state: &NoughtsState) -> Array2<f64> {
        let cells = state.board.cells();
        Array2::from_shape_fn((1, CELLS), |(_, i)| match cells[i].marker() {
            None => 0.0,
            Some(marker) if game.player_of(marker) == 0 => -1.0,
            Some(_) => 1.0,
        })
    }

    fn action_mask(&self, game: &Noughts, state: &NoughtsState) -> ActionMask {
        cell_mask(game, state)
    }

    fn action_and_value(
        &self,
        _game: &Noughts,
        output: &Array2<f64>,
        mask: &ActionMask,
    ) -> Option<(NoughtsAction, f64)> {
        masked_action(output, mask)
    }

    fn action_index(&self, _game: &Noughts, action: &NoughtsAction) -> usize {
        action.index()
    }
}
