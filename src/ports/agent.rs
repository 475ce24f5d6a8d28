//! Agent port - the contract every learning player implements

use crate::{Result, ports::Game};

/// A player that chooses actions and learns from delayed rewards.
///
/// Both the tabular Q-learning agent and the neural (DQN-style) agent
/// implement this trait, so the trainer can drive any mix of them.
///
/// # Learning protocol
///
/// The trainer calls [`Agent::update_action_value`] at the start of each of
/// the agent's turns, with the state the agent last acted from, the action it
/// took, the state it now faces (after every other player has moved) and the
/// reward accumulated since. A final call is made once the game is over.
pub trait Agent<G: Game> {
    /// Identifier used when tallying wins.
    fn id(&self) -> &str;

    /// Choose an action to play from `state`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] if `state` has no legal actions
    /// and exploration did not pick one first.
    fn choose_action(&mut self, game: &G, state: &G::State) -> Result<G::Action>;

    /// Estimated value of `state`: the best action value available from it.
    ///
    /// Terminal states (no legal actions) are worth exactly 0.
    fn value(&self, game: &G, state: &G::State) -> Result<f64>;

    /// Move the estimate for `(old_state, action)` toward the Bellman target.
    fn update_action_value(
        &mut self,
        game: &G,
        old_state: &G::State,
        action: &G::Action,
        new_state: &G::State,
        reward: f64,
    ) -> Result<()>;

    /// Probability of playing a uniformly random legal action.
    fn explore_chance(&self) -> f64;

    /// Change the exploration probability (0 freezes the agent into greedy play).
    fn set_explore_chance(&mut self, explore_chance: f64);

    /// Reseed the agent's random number generator.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for deterministic agents.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
