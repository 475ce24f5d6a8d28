//! Training runs: repeated self-play with observers and exploration schedules

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{
    play::{PlayOutcome, WinFractions, play},
    regimen::TrainingRegimen,
};
use crate::{
    Error, Result,
    ports::{Agent, Game, Observer},
};

fn default_num_rounds() -> usize {
    1000
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of rounds (complete games) to play
    #[serde(default = "default_num_rounds")]
    pub num_rounds: usize,

    /// Base seed; player `i` is seeded with `seed + i`
    #[serde(default)]
    pub seed: Option<u64>,

    /// Decay every player's explore chance linearly to 0 over the run
    #[serde(default)]
    pub reduce_explore_chance: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_rounds: default_num_rounds(),
            seed: None,
            reduce_explore_chance: false,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total rounds played
    pub total_rounds: usize,

    /// Rounds won, by player index
    pub wins: Vec<usize>,

    /// Rounds without a winner
    pub draws: usize,

    /// Moves made over all rounds
    pub total_moves: usize,

    /// Fraction of rounds won, by player identifier
    pub win_fractions: WinFractions,
}

impl TrainingResult {
    fn tally(outcomes: &[PlayOutcome], ids: &[String]) -> Self {
        let mut wins = vec![0; ids.len()];
        let mut draws = 0;
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for outcome in outcomes {
            match outcome.winner {
                Some(winner) => {
                    wins[winner] += 1;
                    *counts.entry(ids[winner].clone()).or_default() += 1;
                }
                None => draws += 1,
            }
        }
        Self {
            total_rounds: outcomes.len(),
            wins,
            draws,
            total_moves: outcomes.iter().map(|outcome| outcome.moves).sum(),
            win_fractions: WinFractions::from_counts(&counts, outcomes.len()),
        }
    }

    /// Fraction of rounds won by player `index`
    pub fn win_rate(&self, index: usize) -> f64 {
        if self.total_rounds == 0 {
            0.0
        } else {
            self.wins.get(index).copied().unwrap_or(0) as f64 / self.total_rounds as f64
        }
    }

    pub fn draw_rate(&self) -> f64 {
        if self.total_rounds == 0 {
            0.0
        } else {
            self.draws as f64 / self.total_rounds as f64
        }
    }

    /// Average number of moves per round
    pub fn avg_round_length(&self) -> f64 {
        if self.total_rounds == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.total_rounds as f64
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives repeated self-play for a fixed set of players
///
/// # Examples
///
/// ```
/// use turn_learner::{
///     games::Countdown,
///     pipeline::{Trainer, TrainingConfig},
///     ports::Agent,
///     q_learning::QAgent,
/// };
///
/// let game = Countdown::new(12);
/// let mut a: QAgent<Countdown> = QAgent::new("A");
/// let mut b: QAgent<Countdown> = QAgent::new("B");
/// let players: &mut [&mut dyn Agent<Countdown>] = &mut [&mut a, &mut b];
///
/// let config = TrainingConfig {
///     num_rounds: 50,
///     seed: Some(3),
///     reduce_explore_chance: true,
/// };
/// let result = Trainer::new(config).run(&game, players).unwrap();
/// assert_eq!(result.total_rounds, 50);
/// assert_eq!(a.explore_chance(), 0.0);
/// ```
pub struct Trainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Play `num_rounds` rounds.
    ///
    /// With `reduce_explore_chance` each player's explore chance for round
    /// `r` is `initial * (1 - r / num_rounds)`, and it is set to 0 once the
    /// run is over.
    pub fn run<G: Game>(
        &mut self,
        game: &G,
        players: &mut [&mut dyn Agent<G>],
    ) -> Result<TrainingResult> {
        let num_rounds = self.config.num_rounds;
        self.start(players, num_rounds)?;

        let initial: Vec<f64> = players.iter().map(|p| p.explore_chance()).collect();
        let mut outcomes = Vec::with_capacity(num_rounds);
        for round in 0..num_rounds {
            if self.config.reduce_explore_chance {
                let remaining = 1.0 - round as f64 / num_rounds as f64;
                for (player, &chance) in players.iter_mut().zip(&initial) {
                    player.set_explore_chance(chance * remaining);
                }
            }
            outcomes.push(self.play_round(game, players, round)?);
        }
        if self.config.reduce_explore_chance {
            for player in players.iter_mut() {
                player.set_explore_chance(0.0);
            }
        }

        self.finish(players, &outcomes)
    }

    /// Play every block of `regimen` in order.
    ///
    /// Observers see one run whose round indices continue across blocks.
    /// The configured `num_rounds` and `reduce_explore_chance` are ignored.
    pub fn run_regimen<G: Game>(
        &mut self,
        game: &G,
        players: &mut [&mut dyn Agent<G>],
        regimen: &TrainingRegimen,
    ) -> Result<TrainingResult> {
        regimen.validate()?;
        if self.config.reduce_explore_chance {
            warn!("reduce_explore_chance has no effect when training with a regimen");
        }
        self.start(players, regimen.total_rounds())?;

        let mut outcomes = Vec::with_capacity(regimen.total_rounds());
        for (index, block) in regimen.blocks.iter().enumerate() {
            if let Some(chance) = block.explore_chance {
                for player in players.iter_mut() {
                    player.set_explore_chance(chance);
                }
            }
            info!(
                "block {}: {} rounds at explore chance {}",
                index + 1,
                block.rounds,
                block
                    .explore_chance
                    .map_or_else(|| "as configured".to_string(), |c| c.to_string())
            );
            for _ in 0..block.rounds {
                let round = outcomes.len();
                outcomes.push(self.play_round(game, players, round)?);
            }
        }
        if let Some(chance) = regimen.final_explore_chance {
            for player in players.iter_mut() {
                player.set_explore_chance(chance);
            }
        }

        self.finish(players, &outcomes)
    }

    fn start<G: Game>(&mut self, players: &mut [&mut dyn Agent<G>], total: usize) -> Result<()> {
        if players.is_empty() {
            return Err(Error::NoPlayers);
        }
        if total == 0 {
            warn!("training run has no rounds");
        }
        self.seed_players(players);
        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }
        Ok(())
    }

    fn play_round<G: Game>(
        &mut self,
        game: &G,
        players: &mut [&mut dyn Agent<G>],
        round: usize,
    ) -> Result<PlayOutcome> {
        let outcome = play(game, players)?;
        for observer in &mut self.observers {
            observer.on_round_end(round, &outcome)?;
        }
        Ok(outcome)
    }

    fn finish<G: Game>(
        &mut self,
        players: &[&mut dyn Agent<G>],
        outcomes: &[PlayOutcome],
    ) -> Result<TrainingResult> {
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let ids: Vec<String> = players.iter().map(|p| p.id().to_string()).collect();
        let result = TrainingResult::tally(outcomes, &ids);
        let rates: Vec<String> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| format!("{id} {:.3}", result.win_rate(index)))
            .collect();
        info!(
            "trained {} rounds: {}, draws {:.3}, {:.1} moves per round",
            result.total_rounds,
            rates.join(", "),
            result.draw_rate(),
            result.avg_round_length()
        );
        Ok(result)
    }

    fn seed_players<G: Game>(&self, players: &mut [&mut dyn Agent<G>]) {
        if let Some(seed) = self.config.seed {
            for (offset, player) in players.iter_mut().enumerate() {
                player.set_rng_seed(seed.wrapping_add(offset as u64));
            }
        }
    }
}
