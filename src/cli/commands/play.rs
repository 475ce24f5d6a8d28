//! Play command - Train agents, then play against them on the terminal

use std::{
    fmt::Display,
    io::{self, Write},
};

use anyhow::{Context, Result};
use clap::Parser;

use super::{GameKind, SetupArgs, as_players, build_agents, train_agents};
use crate::{
    cli::output::{print_kv, print_section},
    games::{Countdown, Noughts, OneHotNoughtsCodec},
    pipeline::play_human_session,
    ports::{Agent, Game},
};

#[derive(Parser, Debug)]
#[command(about = "Train agents, then take one of their seats")]
pub struct PlayArgs {
    #[command(flatten)]
    pub setup: SetupArgs,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = args.setup.run_config()?;
    let ids = args.setup.player_ids()?;

    match args.setup.game {
        GameKind::Countdown => {
            let game = args.setup.countdown()?;
            let mut agents: Vec<Box<dyn Agent<Countdown>>> =
                build_agents(args.setup.agent, &ids, &config, || game.codec())?;
            train_agents(&game, &mut agents, &config, args.setup.staged)?;
            session(&game, &mut agents)
        }
        GameKind::Noughts => {
            let game = args.setup.noughts();
            let mut agents: Vec<Box<dyn Agent<Noughts>>> =
                build_agents(args.setup.agent, &ids, &config, || OneHotNoughtsCodec)?;
            train_agents(&game, &mut agents, &config, args.setup.staged)?;
            session(&game, &mut agents)
        }
    }
}

/// Freeze the agents and play against them over stdin and stdout.
fn session<G>(game: &G, agents: &mut [Box<dyn Agent<G>>]) -> Result<()>
where
    G: Game,
    G::State: Display,
    G::Action: Display,
{
    for agent in agents.iter_mut() {
        agent.set_explore_chance(0.0);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();
    writeln!(output, "\nTraining done. Press enter on an empty line to stop.")?;

    let mut players = as_players(agents);
    let winners = play_human_session(game, &mut players, &mut input, &mut output)
        .context("Game against the agents failed")?;
    drop(output);

    let decided = winners.iter().flatten().count();
    print_section("Session");
    print_kv("Games", &winners.len().to_string());
    print_kv("Decided", &decided.to_string());
    print_kv(
        "Drawn",
        &winners.iter().filter(|winner| winner.is_none()).count().to_string(),
    );
    Ok(())
}
