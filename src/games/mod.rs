//! Concrete games
//!
//! Adapters implementing [`Game`](crate::ports::Game), and
//! [`DqnCodec`](crate::ports::DqnCodec) where a network should play them.

pub mod countdown;
pub mod noughts;

pub use countdown::{Countdown, CountdownCodec};
pub use noughts::{CompactNoughtsCodec, Noughts, NoughtsAction, NoughtsState, OneHotNoughtsCodec};
