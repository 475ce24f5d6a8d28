//! Game port - the rules of a finite, turn-based, perfect-information game

use std::{fmt::Debug, hash::Hash};

/// Rules of a sequential game, consumed by agents and the trainer.
///
/// States and actions are immutable values. Both must be usable as lookup
/// keys, so they need value equality and a stable hash.
///
/// # Contract
///
/// * [`Game::actions`] is non-empty whenever the game is not over.
/// * [`Game::updated`] never mutates its input.
/// * [`Game::score_and_game_over`] scores `state` from the perspective of
///   the player who moved into it. Every other player is credited with the
///   negation of that score.
///
/// # Examples
///
/// ```
/// use turn_learner::{games::Countdown, ports::Game};
///
/// let game = Countdown::new(5);
/// let state = game.init_state();
/// assert_eq!(game.actions(&state), vec![3, 2, 1]);
/// assert_eq!(game.score_and_game_over(&game.updated(&state, &3)), (0.0, false));
/// ```
pub trait Game {
    /// A complete snapshot of a position.
    type State: Clone + Eq + Hash + Debug;

    /// A move available from some state.
    type Action: Clone + Eq + Hash + Debug;

    /// The position every game starts from.
    fn init_state(&self) -> Self::State;

    /// Legal actions from `state`, in a stable enumeration order.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// The state reached by playing `action` from `state`.
    fn updated(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Signed score for whoever moved into `state`, and whether the game is over.
    fn score_and_game_over(&self, state: &Self::State) -> (f64, bool);
}
