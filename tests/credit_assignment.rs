//! Reward bookkeeping and winner inference of the turn-based trainer

mod common;

use common::{Recorder, ScriptedGame};
use turn_learner::{
    Error,
    pipeline::{PlayOutcome, play, play_many},
    ports::Agent,
};

#[test]
fn test_rewards_are_credited_to_mover_and_debited_from_others() {
    let game = ScriptedGame::new(&[2.0, 0.5, -1.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b];
    let outcome = play(&game, players).unwrap();

    assert_eq!(
        outcome,
        PlayOutcome {
            winner: Some(1),
            final_reward: -1.0,
            moves: 3
        }
    );
    // A scored 2 then lost 0.5 to B before moving again.
    assert_eq!(a.updates, vec![(0, 2, 1.5), (2, 3, -1.0)]);
    // B scored 0.5 and gained 1 from A's losing move.
    assert_eq!(b.updates, vec![(1, 3, 1.5)]);
}

#[test]
fn test_three_player_rewards_accumulate_between_turns() {
    let game = ScriptedGame::new(&[0.25, -0.75, 1.5, 0.0, -2.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let mut c = Recorder::new("C");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b, &mut c];
    let outcome = play(&game, players).unwrap();

    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.moves, 5);
    // A: +0.25, then +0.75 and -1.5 from the others before moving again.
    assert_eq!(a.updates, vec![(0, 3, -0.5), (3, 5, 2.0)]);
    assert_eq!(b.updates, vec![(1, 4, -2.25), (4, 5, -2.0)]);
    // Debits collected before a player's first move are dropped with it.
    assert_eq!(c.updates, vec![(2, 5, 3.5)]);
}

#[test]
fn test_positive_final_score_wins_for_mover() {
    let game = ScriptedGame::new(&[0.0, 0.0, 1.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let mut c = Recorder::new("C");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b, &mut c];
    assert_eq!(play(&game, players).unwrap().winner, Some(2));
}

#[test]
fn test_negative_final_score_in_two_player_game_wins_for_other() {
    let game = ScriptedGame::new(&[0.0, -1.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b];
    assert_eq!(play(&game, players).unwrap().winner, Some(0));
}

#[test]
fn test_negative_final_score_with_three_players_has_no_winner() {
    let game = ScriptedGame::new(&[0.0, 0.0, -1.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let mut c = Recorder::new("C");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b, &mut c];
    assert_eq!(play(&game, players).unwrap().winner, None);
}

#[test]
fn test_zero_final_score_is_a_draw() {
    let game = ScriptedGame::new(&[0.0, 0.0, 0.0, 0.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b];
    let outcome = play(&game, players).unwrap();
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.moves, 4);
}

#[test]
fn test_players_who_never_move_get_no_final_update() {
    let game = ScriptedGame::new(&[1.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b];
    play(&game, players).unwrap();
    assert_eq!(a.updates, vec![(0, 1, 1.0)]);
    assert!(b.updates.is_empty());
}

#[test]
fn test_play_many_reports_only_winners() {
    let game = ScriptedGame::new(&[1.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b];
    let fractions = play_many(&game, players, 10).unwrap();

    assert_eq!(fractions.get("A"), Some(1.0));
    assert_eq!(fractions.get("B"), None);
    assert_eq!(fractions.len(), 1);
    assert_eq!(a.updates.len(), 10);
}

#[test]
fn test_play_many_with_only_draws_is_empty() {
    let game = ScriptedGame::new(&[0.0, 0.0]);
    let mut a = Recorder::new("A");
    let mut b = Recorder::new("B");
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [&mut a, &mut b];
    let fractions = play_many(&game, players, 5).unwrap();
    assert!(fractions.is_empty());
    assert_eq!(fractions.draw_fraction(), 1.0);
}

#[test]
fn test_no_players() {
    let game = ScriptedGame::new(&[1.0]);
    let players: &mut [&mut dyn Agent<ScriptedGame>] = &mut [];
    assert!(matches!(play(&game, players), Err(Error::NoPlayers)));
}
