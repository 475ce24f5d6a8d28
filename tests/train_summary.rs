use clap::Parser;
use tempfile::tempdir;
use turn_learner::{
    cli::{
        commands::train::{TrainArgs, execute},
        config::RunConfig,
    },
    pipeline::TrainingResult,
};

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

fn read_summary(path: &std::path::Path) -> serde_json::Value {
    let contents = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "turn-learner-train",
        "--game",
        "countdown",
        "--rounds",
        "5",
        "--seed",
        "1",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let parsed = read_summary(&expected_path);
    assert_eq!(parsed["result"]["total_rounds"], 5);
    assert_eq!(parsed["game"], "countdown");
    assert_eq!(parsed["agent"], "q");
    assert_eq!(parsed["config"]["training"]["seed"], 1);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}{}", summary_dir.display(), std::path::MAIN_SEPARATOR);

    let args = parse_args([
        "turn-learner-train",
        "--game",
        "noughts",
        "--agent",
        "q",
        "--rounds",
        "3",
        "--summary",
        &summary_arg,
    ]);

    execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let parsed = read_summary(&expected_path);
    assert_eq!(parsed["result"]["total_rounds"], 3);
    assert_eq!(parsed["players"], serde_json::json!(["X", "O"]));
}

#[test]
fn config_file_is_applied_and_flags_override_it() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("run.json");
    let mut config = RunConfig::default();
    config.training.num_rounds = 7;
    config.training.seed = Some(3);
    config.dqn.hidden_size = Some(5);
    config.save(&config_path).unwrap();
    let summary_path = tmp.path().join("summary.json");

    let args = parse_args([
        "turn-learner-train",
        "--agent",
        "dqn",
        "--players",
        "2",
        "--start",
        "9",
        "--staged",
        "--seed",
        "4",
        "--config",
        config_path.to_str().unwrap(),
        "--summary",
        summary_path.to_str().unwrap(),
    ]);
    execute(args).expect("training from a config file should succeed");

    let parsed = read_summary(&summary_path);
    assert_eq!(parsed["config"]["training"]["num_rounds"], 7);
    assert_eq!(parsed["config"]["training"]["seed"], 4);
    assert_eq!(parsed["config"]["dqn"]["hidden_size"], 5);
    assert_eq!(parsed["staged"], true);

    let result: TrainingResult = serde_json::from_value(parsed["result"].clone()).unwrap();
    assert_eq!(result.total_rounds, 7);
    assert_eq!(result.wins.iter().sum::<usize>() + result.draws, 7);
}

#[test]
fn noughts_rejects_extra_players() {
    let args = parse_args(["turn-learner-train", "--game", "noughts", "--players", "3"]);
    assert!(execute(args).is_err());
}

#[test]
fn missing_config_file_is_reported() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("absent.json");
    let args = parse_args([
        "turn-learner-train",
        "--config",
        missing.to_str().unwrap(),
    ]);
    let err = execute(args).unwrap_err();
    assert!(err.to_string().contains("Failed to load config"));
}
