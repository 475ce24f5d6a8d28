//! Noughts and crosses (tic-tac-toe)
//!
//! - [`board`]: cells, markers and win detection
//! - [`game`]: the [`Game`](crate::ports::Game) rules for two players
//! - [`codec`]: one-hot and compact network encodings

pub mod board;
pub mod codec;
pub mod game;

pub use board::{Board, Cell, Marker};
pub use codec::{CompactNoughtsCodec, OneHotNoughtsCodec};
pub use game::{Noughts, NoughtsAction, NoughtsState};
