//! Ports (trait boundaries) between the learning core and its collaborators.
//!
//! The core owns these traits. Concrete games, agents, codecs and training
//! observers are adapters that implement them.

pub mod agent;
pub mod codec;
pub mod game;
pub mod observer;

pub use agent::Agent;
pub use codec::{ActionMask, DqnCodec};
pub use game::Game;
pub use observer::Observer;
