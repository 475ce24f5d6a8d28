//! Observer port - abstraction for watching a training run
//!
//! Observers are told about each round as the trainer plays it, which keeps
//! progress display and metrics out of the training loop itself.

use crate::{Result, pipeline::PlayOutcome};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_rounds)` - Once at the beginning
/// 2. `on_round_end(round, outcome)` - After every round
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```
/// use turn_learner::{pipeline::PlayOutcome, ports::Observer};
///
/// struct DrawCounter {
///     draws: usize,
/// }
///
/// impl Observer for DrawCounter {
///     fn on_round_end(&mut self, _round: usize, outcome: &PlayOutcome) -> turn_learner::Result<()> {
///         if outcome.winner.is_none() {
///             self.draws += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called once before the first round.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_start(&mut self, _total_rounds: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each round with its outcome.
    ///
    /// # Parameters
    ///
    /// * `round` - Index of the round (0-based, counted across regimen blocks)
    /// * `outcome` - Winner, final reward and length of the round
    fn on_round_end(&mut self, _round: usize, _outcome: &PlayOutcome) -> Result<()> {
        Ok(())
    }

    /// Called once after the last round.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
