//! turn-learner CLI - Train and play reinforcement learning agents
//!
//! This CLI provides a unified interface for:
//! - Training tabular and neural agents on countdown or noughts and crosses
//! - Playing against freshly trained agents
//! - Comparing trained noughts-and-crosses agents in a showdown

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use flexi_logger::Logger;
use turn_learner::cli::commands::{play, showdown, train};

#[derive(Parser)]
#[command(name = "turn-learner")]
#[command(version, about = "Reinforcement learning for turn-based games", long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train agents by playing them against each other
    Train(train::TrainArgs),

    /// Train agents, then play against them
    Play(play::PlayArgs),

    /// Train Q and DQN noughts agents and compare them
    Showdown(showdown::ShowdownArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _logger = Logger::try_with_env_or_str(level)
        .context("Invalid log specification")?
        .format(flexi_logger::colored_default_format)
        .start()
        .context("Failed to start logger")?;

    match cli.command {
        Commands::Train(args) => train::execute(args),
        Commands::Play(args) => play::execute(args),
        Commands::Showdown(args) => showdown::execute(args),
    }
}
