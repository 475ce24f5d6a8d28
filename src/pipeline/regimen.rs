//! Staged training schedules
//!
//! A regimen splits training into sequential blocks, each played at its own
//! exploration chance, so agents explore widely early and settle later.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::agent::validate_probability};

/// A run of rounds played at one exploration chance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingBlock {
    /// Number of rounds to play in this block
    pub rounds: usize,
    /// Explore chance applied to every player for this block; `None` keeps
    /// whatever the players are configured with
    #[serde(default)]
    pub explore_chance: Option<f64>,
}

impl TrainingBlock {
    pub fn new(rounds: usize, explore_chance: Option<f64>) -> Self {
        Self {
            rounds,
            explore_chance,
        }
    }
}

/// Ordered training blocks and the explore chance players end with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRegimen {
    pub blocks: Vec<TrainingBlock>,
    /// Explore chance set once every block has been played
    #[serde(default)]
    pub final_explore_chance: Option<f64>,
}

impl TrainingRegimen {
    pub fn new(blocks: Vec<TrainingBlock>) -> Self {
        Self {
            blocks,
            final_explore_chance: None,
        }
    }

    pub fn then_freeze(mut self) -> Self {
        self.final_explore_chance = Some(0.0);
        self
    }

    /// A single block at the configured explore chance
    pub fn single(rounds: usize) -> Self {
        Self::new(vec![TrainingBlock::new(rounds, None)])
    }

    /// The schedule used for the sample noughts and crosses agents:
    /// 9000 rounds at the configured chance, 6000 at 0.1, 4000 at 0.05,
    /// then exploration switched off.
    pub fn staged() -> Self {
        Self::new(vec![
            TrainingBlock::new(9000, None),
            TrainingBlock::new(6000, Some(0.1)),
            TrainingBlock::new(4000, Some(0.05)),
        ])
        .then_freeze()
    }

    /// The staged schedule with every block scaled to `total_rounds` overall
    ///
    /// Rounds lost to integer division go to the first block.
    pub fn staged_over(total_rounds: usize) -> Self {
        let staged = Self::staged();
        let full = staged.total_rounds() as u128;
        let mut blocks: Vec<TrainingBlock> = staged
            .blocks
            .iter()
            .map(|block| TrainingBlock {
                // Each share is at most `total_rounds`, so it fits back in usize.
                rounds: (block.rounds as u128 * total_rounds as u128 / full) as usize,
                ..*block
            })
            .collect();
        let assigned: usize = blocks.iter().map(|block| block.rounds).sum();
        if let Some(first) = blocks.first_mut() {
            first.rounds += total_rounds - assigned;
        }
        Self {
            blocks,
            final_explore_chance: staged.final_explore_chance,
        }
    }

    pub fn total_rounds(&self) -> usize {
        self.blocks.iter().map(|block| block.rounds).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(Error::config("training regimen has no blocks"));
        }
        for chance in self
            .blocks
            .iter()
            .filter_map(|block| block.explore_chance)
            .chain(self.final_explore_chance)
        {
            validate_probability("explore chance", chance)?;
        }
        Ok(())
    }
}

impl Default for TrainingRegimen {
    fn default() -> Self {
        Self::staged()
    }
}
