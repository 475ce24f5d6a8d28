//! Train command - Train agents by self-play and report how they did

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use super::{AgentKind, GameKind, SetupArgs, build_agents, train_agents};
use crate::{
    cli::{
        config::RunConfig,
        output::{format_number, print_kv, print_section, print_subsection},
    },
    games::{Countdown, Noughts, OneHotNoughtsCodec},
    pipeline::TrainingResult,
    ports::{Agent, Game},
};

#[derive(Parser, Debug)]
#[command(about = "Train agents by playing them against each other")]
pub struct TrainArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    game: GameKind,
    agent: AgentKind,
    players: &'a [String],
    staged: bool,
    config: &'a RunConfig,
    result: &'a TrainingResult,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.setup.run_config()?;
    let ids = args.setup.player_ids()?;

    let result = match args.setup.game {
        GameKind::Countdown => {
            let game = args.setup.countdown()?;
            let mut agents: Vec<Box<dyn Agent<Countdown>>> =
                build_agents(args.setup.agent, &ids, &config, || game.codec())?;
            let result = train_agents(&game, &mut agents, &config, args.setup.staged)?;
            report(&ids, &result);
            show_countdown_path(&game, agents[0].as_mut())?;
            result
        }
        GameKind::Noughts => {
            let game = args.setup.noughts();
            let mut agents: Vec<Box<dyn Agent<Noughts>>> =
                build_agents(args.setup.agent, &ids, &config, || OneHotNoughtsCodec)?;
            let result = train_agents(&game, &mut agents, &config, args.setup.staged)?;
            report(&ids, &result);
            result
        }
    };

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create summary directory {}", parent.display())
            })?;
        }
        let summary = TrainingSummaryFile {
            game: args.setup.game,
            agent: args.setup.agent,
            players: &ids,
            staged: args.setup.staged,
            config: &config,
            result: &result,
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary file {}", path.display()))?;
        to_writer_pretty(file, &summary).context("Failed to write training summary")?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

/// Directory targets get `training_summary.json`; other names get a `.json`
/// extension.
fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn report(ids: &[String], result: &TrainingResult) {
    print_section("Training Results");
    print_kv("Rounds", &format_number(result.total_rounds));
    for (index, id) in ids.iter().enumerate() {
        print_kv(
            &format!("Player {id} wins"),
            &format!(
                "{} ({:.1}%)",
                result.wins.get(index).copied().unwrap_or(0),
                result.win_rate(index) * 100.0
            ),
        );
    }
    if ids.len() > 1 {
        print_kv(
            "Draws",
            &format!("{} ({:.1}%)", result.draws, result.draw_rate() * 100.0),
        );
    }
    print_kv(
        "Moves per round",
        &format!("{:.2}", result.avg_round_length()),
    );
}

/// Print the path the first agent takes from the start when playing greedily.
fn show_countdown_path(game: &Countdown, agent: &mut dyn Agent<Countdown>) -> Result<()> {
    let previous = agent.explore_chance();
    agent.set_explore_chance(0.0);
    let path = greedy_path(game, agent);
    agent.set_explore_chance(previous);
    let path = path?;

    print_subsection(&format!("Greedy path of {}", agent.id()));
    let steps: Vec<String> = path.iter().map(|total| total.to_string()).collect();
    println!("  {}", steps.join(" -> "));
    Ok(())
}

/// Totals visited from the start until the game ends, at most one per unit
/// of the starting total.
fn greedy_path(game: &Countdown, agent: &mut dyn Agent<Countdown>) -> Result<Vec<i64>> {
    let mut state = game.init_state();
    let mut path = vec![state];
    for _ in 0..game.start() {
        if game.score_and_game_over(&state).1 {
            break;
        }
        let action = agent.choose_action(game, &state)?;
        state = game.updated(&state, &action);
        path.push(state);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::QAgent;

    #[test]
    fn test_greedy_path_follows_table() {
        let game = Countdown::new(5);
        let mut agent: QAgent<Countdown> = QAgent::new("A").with_explore_chance(0.0);
        agent.table_mut().set(&5, &2, 1.0);
        agent.table_mut().set(&3, &3, 1.0);
        assert_eq!(greedy_path(&game, &mut agent).unwrap(), vec![5, 3, 0]);
    }

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("runs/first")),
            PathBuf::from("runs/first.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("runs/first.JSON")),
            PathBuf::from("runs/first.JSON")
        );
        let dir = format!("runs{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            PathBuf::from("runs").join("training_summary.json")
        );
    }

    #[test]
    fn test_greedy_path_is_bounded() {
        let game = Countdown::new(4);
        let mut agent: QAgent<Countdown> = QAgent::new("A").with_explore_chance(0.0);
        for total in 1..=4 {
            agent.table_mut().set(&total, &1, 1.0);
        }
        assert_eq!(greedy_path(&game, &mut agent).unwrap(), vec![4, 3, 2, 1, 0]);
    }
}
