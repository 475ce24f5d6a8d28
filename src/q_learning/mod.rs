//! Tabular Q-learning
//!
//! Each agent keeps a sparse table from `(state, action)` to an estimated
//! value and moves entries toward a Bellman target every time it learns what
//! happened after its last move.
//!
//! ## Update rule
//!
//! ```text
//! Q(s,a) += r + α (γ V(s') - Q(s,a))        V(s') = max_a' Q(s',a'), 0 if terminal
//! ```
//!
//! `s'` is the next state in which the same agent has to move, so `V(s')`
//! already accounts for every opponent's reply.
//!
//! ## Usage Example
//!
//! ```
//! use turn_learner::{
//!     games::Countdown,
//!     pipeline::play_many,
//!     ports::Agent,
//!     q_learning::{QAgent, QAgentConfig},
//! };
//!
//! let game = Countdown::new(10);
//! let mut agent: QAgent<Countdown> = QAgent::from_config("A", QAgentConfig::default())
//!     .unwrap()
//!     .with_seed(7);
//! let players: &mut [&mut dyn Agent<Countdown>] = &mut [&mut agent];
//! let fractions = play_many(&game, players, 200).unwrap();
//! assert_eq!(fractions.get("A"), Some(1.0));
//! ```

pub mod action_values;
pub mod agent;

pub use action_values::ActionValueTable;
pub use agent::{QAgent, QAgentConfig};
