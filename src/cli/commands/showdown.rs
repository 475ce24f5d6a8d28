//! Showdown command - Pit trained noughts-and-crosses agents against each other
//!
//! Trains a pair of tabular agents and two pairs of neural agents (one per
//! board encoding), then prints the fraction of games each side wins in a
//! series of matches, with untrained random players as the baseline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;

use super::{AgentKind, build_agents, train_agents};
use crate::{
    cli::{
        config::RunConfig,
        output::{format_number, fractions_line, print_section},
    },
    games::{CompactNoughtsCodec, Noughts, OneHotNoughtsCodec},
    pipeline::play_many,
    ports::{Agent, DqnCodec},
    q_learning::QAgent,
};

type Pair = [Box<dyn Agent<Noughts>>; 2];

#[derive(Parser, Debug)]
#[command(about = "Train Q and DQN noughts agents and play them against each other")]
pub struct ShowdownArgs {
    /// Training rounds for each pair of agents
    #[arg(long, short = 'n', default_value_t = 2000)]
    pub rounds: usize,

    /// Games played in each match
    #[arg(long, short = 'm', default_value_t = 100)]
    pub matches: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: ShowdownArgs) -> Result<()> {
    let game = Noughts::default();
    let mut config = RunConfig::default();
    config.training.num_rounds = args.rounds;
    config.training.seed = args.seed;

    let mut q = trained_pair(&game, "Q", AgentKind::Q, &config, || OneHotNoughtsCodec)?;
    let mut dqn = trained_pair(&game, "DQN", AgentKind::Dqn, &config, || OneHotNoughtsCodec)?;
    let mut dqn2 = trained_pair(&game, "DQN2", AgentKind::Dqn, &config, || {
        CompactNoughtsCodec
    })?;
    let mut rand = novice_pair(args.seed);

    let [q_x, q_o] = &mut q;
    let [dqn_x, dqn_o] = &mut dqn;
    let [dqn2_x, dqn2_o] = &mut dqn2;
    let [rand_x, rand_o] = &mut rand;

    print_section(&format!(
        "Showdown: {} games per match",
        format_number(args.matches)
    ));
    let n = args.matches;

    duel(&game, "rand v rand", rand_x, rand_o, n)?;
    println!();
    duel(&game, "Q v Q", q_x.as_mut(), q_o.as_mut(), n)?;
    duel(&game, "rand v Q", rand_x, q_o.as_mut(), n)?;
    println!();
    duel(&game, "Q v DQN", q_x.as_mut(), dqn_o.as_mut(), n)?;
    duel(&game, "DQN v Q", dqn_x.as_mut(), q_o.as_mut(), n)?;
    println!();
    duel(&game, "DQN v rand", dqn_x.as_mut(), rand_o, n)?;
    duel(&game, "rand v DQN", rand_x, dqn_o.as_mut(), n)?;
    println!();
    duel(&game, "Q v DQN2", q_x.as_mut(), dqn2_o.as_mut(), n)?;
    duel(&game, "DQN2 v Q", dqn2_x.as_mut(), q_o.as_mut(), n)?;
    println!();
    duel(&game, "DQN2 v rand", dqn2_x.as_mut(), rand_o, n)?;
    duel(&game, "rand v DQN2", rand_x, dqn2_o.as_mut(), n)?;
    println!();
    duel(&game, "DQN v DQN2", dqn_x.as_mut(), dqn2_o.as_mut(), n)?;
    duel(&game, "DQN2 v DQN", dqn2_x.as_mut(), dqn_o.as_mut(), n)?;
    Ok(())
}

/// Two agents trained against each other on the staged schedule
fn trained_pair<C: DqnCodec<Noughts> + 'static>(
    game: &Noughts,
    label: &str,
    kind: AgentKind,
    config: &RunConfig,
    codec: impl Fn() -> C,
) -> Result<Pair> {
    let ids = ["X".to_string(), "O".to_string()];
    let mut pair: Pair = build_agents(kind, &ids, config, codec)?
        .try_into()
        .map_err(|agents: Vec<_>| anyhow!("expected 2 agents, built {}", agents.len()))?;
    info!("training {label} pair for {} rounds", config.training.num_rounds);
    train_agents(game, &mut pair, config, true)
        .with_context(|| format!("Failed to train the {label} pair"))?;
    Ok(pair)
}

/// Untrained players that always move at random
fn novice_pair(seed: Option<u64>) -> [QAgent<Noughts>; 2] {
    let novice = |id: &str, offset: u64| {
        let agent = QAgent::new(id).with_explore_chance(1.0);
        match seed {
            Some(seed) => agent.with_seed(seed.wrapping_add(offset)),
            None => agent,
        }
    };
    [novice("X", 100), novice("O", 101)]
}

fn duel(
    game: &Noughts,
    label: &str,
    first: &mut dyn Agent<Noughts>,
    second: &mut dyn Agent<Noughts>,
    rounds: usize,
) -> Result<()> {
    let players: &mut [&mut dyn Agent<Noughts>] = &mut [first, second];
    let fractions = play_many(game, players, rounds)
        .with_context(|| format!("Match {label} failed"))?;
    println!("{}", fractions_line(label, &fractions, &["X", "O"]));
    Ok(())
}
