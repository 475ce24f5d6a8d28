//! Playing trained agents against a person over a text stream
//!
//! Nothing here trains: agents only choose actions. Freeze them first
//! (explore chance 0) to see their greedy play.

use std::{
    fmt::Display,
    io::{BufRead, Write},
};

use super::play::infer_winner;
use crate::{
    Error, Result,
    ports::{Agent, Game},
};

/// Who sits at one position of the turn order
pub enum Seat<'a, G: Game> {
    Agent(&'a mut dyn Agent<G>),
    Human(String),
}

impl<G: Game> Seat<'_, G> {
    pub fn name(&self) -> &str {
        match self {
            Seat::Agent(agent) => agent.id(),
            Seat::Human(name) => name,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Seat::Human(_))
    }
}

fn read_line<R: BufRead>(input: &mut R, waiting_for: impl FnOnce() -> String) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::InputClosed {
            waiting_for: waiting_for(),
        });
    }
    Ok(line.trim().to_string())
}

fn human_action<G, R, W>(
    game: &G,
    state: &G::State,
    name: &str,
    input: &mut R,
    output: &mut W,
) -> Result<G::Action>
where
    G: Game,
    G::Action: Display,
    R: BufRead,
    W: Write,
{
    let actions = game.actions(state);
    if actions.is_empty() {
        return Err(Error::NoLegalActions {
            state: format!("{state:?}"),
        });
    }
    loop {
        writeln!(output, "Your turn {name}. You can choose:")?;
        for (index, action) in actions.iter().enumerate() {
            writeln!(output, "{}. {action}", index + 1)?;
        }
        write!(output, "Please choose a number: ")?;
        output.flush()?;

        let line = read_line(input, || format!("a move from {name}"))?;
        if let Some(action) = line
            .parse::<usize>()
            .ok()
            .and_then(|choice| choice.checked_sub(1))
            .and_then(|index| actions.get(index))
        {
            return Ok(action.clone());
        }
    }
}

/// Play one game between agents and humans, returning the winning seat.
///
/// The state is printed before every turn. Humans pick from the numbered
/// legal actions; anything that is not one of the numbers asks again.
/// Winners are inferred exactly as in [`play`](super::play::play).
///
/// # Errors
///
/// [`Error::InputClosed`] if `input` ends while a human is to move, and any
/// error from the agents or from writing `output`.
pub fn play_human<G, R, W>(
    game: &G,
    seats: &mut [Seat<'_, G>],
    input: &mut R,
    output: &mut W,
) -> Result<Option<usize>>
where
    G: Game,
    G::State: Display,
    G::Action: Display,
    R: BufRead,
    W: Write,
{
    if seats.is_empty() {
        return Err(Error::NoPlayers);
    }

    let mut state = game.init_state();

    let (mover, final_reward) = 'game: loop {
        for (index, seat) in seats.iter_mut().enumerate() {
            writeln!(output)?;
            writeln!(output, "{state}")?;
            writeln!(output)?;

            let action = match seat {
                Seat::Human(name) => human_action(game, &state, name, input, output)?,
                Seat::Agent(agent) => {
                    let action = agent.choose_action(game, &state)?;
                    writeln!(output, "{}: {action}", agent.id())?;
                    action
                }
            };

            state = game.updated(&state, &action);
            let (reward, game_over) = game.score_and_game_over(&state);
            if game_over {
                writeln!(output)?;
                writeln!(output, "{state}")?;
                writeln!(output, "Game over!")?;
                writeln!(output)?;
                break 'game (index, reward);
            }
        }
    };

    Ok(infer_winner(mover, final_reward, seats.len()))
}

/// Let a person play repeated games against `agents`.
///
/// Before each game the person picks which position (1-based) to take from
/// the agent sitting there; an empty line or closed input ends the session.
/// Returns the winning seat of every game played.
pub fn play_human_session<G, R, W>(
    game: &G,
    agents: &mut [&mut dyn Agent<G>],
    input: &mut R,
    output: &mut W,
) -> Result<Vec<Option<usize>>>
where
    G: Game,
    G::State: Display,
    G::Action: Display,
    R: BufRead,
    W: Write,
{
    let positions: Vec<String> = (1..=agents.len()).map(|p| p.to_string()).collect();
    let mut winners = Vec::new();

    loop {
        write!(output, "Play as player number ({})? ", positions.join(", "))?;
        output.flush()?;
        let line = match read_line(input, || "a player number".to_string()) {
            Ok(line) => line,
            Err(Error::InputClosed { .. }) => break,
            Err(err) => return Err(err),
        };
        if line.is_empty() {
            break;
        }
        let Some(human) = line
            .parse::<usize>()
            .ok()
            .filter(|p| (1..=agents.len()).contains(p))
            .map(|p| p - 1)
        else {
            continue;
        };

        let mut seats: Vec<Seat<'_, G>> = agents
            .iter_mut()
            .enumerate()
            .map(|(index, agent)| {
                if index == human {
                    Seat::Human("human".to_string())
                } else {
                    Seat::Agent(&mut **agent)
                }
            })
            .collect();
        let winner = play_human(game, &mut seats, input, output)?;

        match winner.map(|index| &seats[index]) {
            Some(seat) if seat.is_human() => {
                writeln!(output, "Congratulations, the winner was {}!", seat.name())?
            }
            Some(seat) => writeln!(output, "The winner was {}", seat.name())?,
            None => writeln!(output, "The game was a draw.")?,
        }
        writeln!(output)?;
        winners.push(winner);
    }

    Ok(winners)
}
