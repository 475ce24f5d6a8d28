//! Command implementations and the agent setup they share

pub mod play;
pub mod showdown;
pub mod train;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use serde::Serialize;

use super::config::RunConfig;
use crate::{
    dqn::DqnAgent,
    games::{Countdown, Noughts},
    pipeline::{ProgressObserver, Trainer, TrainingRegimen, TrainingResult},
    ports::{Agent, DqnCodec, Game},
    q_learning::QAgent,
};

/// Game to train on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    /// Subtract 1, 2 or 3; reaching exactly 0 wins
    Countdown,
    /// Noughts and crosses on a 3x3 board
    Noughts,
}

/// Learning agent to train
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Tabular Q-learning
    Q,
    /// Two-layer network fed through a game codec
    Dqn,
}

/// Game, agent and training options shared by `train` and `play`
#[derive(Args, Debug, Clone)]
pub struct SetupArgs {
    /// Game to play
    #[arg(long, short = 'g', value_enum, default_value_t = GameKind::Countdown)]
    pub game: GameKind,

    /// Kind of agent in every seat
    #[arg(long, short = 'a', value_enum, default_value_t = AgentKind::Q)]
    pub agent: AgentKind,

    /// Number of players (countdown only; noughts always has two)
    #[arg(long, short = 'p')]
    pub players: Option<usize>,

    /// Starting total for countdown
    #[arg(long, default_value_t = 20)]
    pub start: i64,

    /// Limit the first noughts move to a corner, an edge or the centre
    #[arg(long, default_value_t = false)]
    pub symmetric_opening: bool,

    /// Number of training rounds
    #[arg(long, short = 'n')]
    pub rounds: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reduce exploration linearly to 0 over the run
    #[arg(long, default_value_t = false)]
    pub reduce_explore: bool,

    /// Train in stages of falling exploration, then freeze
    #[arg(long, default_value_t = false, conflicts_with = "reduce_explore")]
    pub staged: bool,

    /// JSON run configuration; flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl SetupArgs {
    /// Load the config file (if any) and apply the flags on top.
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => RunConfig::default(),
        };
        if let Some(rounds) = self.rounds {
            config.training.num_rounds = rounds;
        }
        if self.seed.is_some() {
            config.training.seed = self.seed;
        }
        if self.reduce_explore {
            config.training.reduce_explore_chance = true;
        }
        config.validate().context("Invalid run configuration")?;
        Ok(config)
    }

    pub fn num_players(&self) -> Result<usize> {
        match (self.game, self.players) {
            (GameKind::Noughts, None | Some(2)) => Ok(2),
            (GameKind::Noughts, Some(n)) => bail!("Noughts is played by 2 players, not {n}"),
            (GameKind::Countdown, Some(0)) => bail!("At least one player is needed"),
            (GameKind::Countdown, players) => Ok(players.unwrap_or(1)),
        }
    }

    pub fn countdown(&self) -> Result<Countdown> {
        if self.start < 1 {
            bail!("Countdown must start above 0, got {}", self.start);
        }
        Ok(Countdown::new(self.start))
    }

    pub fn noughts(&self) -> Noughts {
        Noughts::default().with_symmetric_opening(self.symmetric_opening)
    }

    /// Identifiers of the players: markers for noughts, letters otherwise
    pub fn player_ids(&self) -> Result<Vec<String>> {
        let count = self.num_players()?;
        Ok(match self.game {
            GameKind::Noughts => Noughts::default()
                .markers()
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            GameKind::Countdown => (0..count).map(player_letter).collect(),
        })
    }
}

fn player_letter(index: usize) -> String {
    match u8::try_from(index) {
        Ok(offset) if offset < 26 => char::from(b'A' + offset).to_string(),
        _ => format!("P{}", index + 1),
    }
}

/// Build one agent of `kind` per identifier.
///
/// `codec` is only called for neural agents. With a training seed `s`,
/// neural agent `i` draws its initial weights from `s + i`.
pub fn build_agents<G, C>(
    kind: AgentKind,
    ids: &[String],
    config: &RunConfig,
    codec: impl Fn() -> C,
) -> Result<Vec<Box<dyn Agent<G>>>>
where
    G: Game + 'static,
    C: DqnCodec<G> + 'static,
{
    ids.iter()
        .enumerate()
        .map(|(index, id)| -> Result<Box<dyn Agent<G>>> {
            let agent: Box<dyn Agent<G>> = match kind {
                AgentKind::Q => Box::new(QAgent::<G>::from_config(id.as_str(), config.q)?),
                AgentKind::Dqn => Box::new(match config.training.seed {
                    Some(seed) => DqnAgent::<G, C>::seeded(
                        id.as_str(),
                        codec(),
                        config.dqn,
                        seed.wrapping_add(index as u64),
                    )?,
                    None => DqnAgent::<G, C>::new(id.as_str(), codec(), config.dqn)?,
                }),
            };
            Ok(agent)
        })
        .collect()
}

/// Borrow boxed agents as the player slice the trainer takes
pub fn as_players<G: Game>(agents: &mut [Box<dyn Agent<G>>]) -> Vec<&mut dyn Agent<G>> {
    agents
        .iter_mut()
        .map(|agent| &mut **agent as &mut dyn Agent<G>)
        .collect()
}

/// Train `agents` on `game` as `config` and `staged` describe.
pub fn train_agents<G: Game>(
    game: &G,
    agents: &mut [Box<dyn Agent<G>>],
    config: &RunConfig,
    staged: bool,
) -> Result<TrainingResult> {
    let mut trainer =
        Trainer::new(config.training.clone()).with_observer(Box::new(ProgressObserver::new()));
    let mut players = as_players(agents);
    let result = if staged {
        let regimen = TrainingRegimen::staged_over(config.training.num_rounds);
        trainer.run_regimen(game, &mut players, &regimen)
    } else {
        trainer.run(game, &mut players)
    };
    result.context("Training failed")
}
