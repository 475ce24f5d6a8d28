//! Observer implementations for training runs
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to progress display or bookkeeping.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::play::PlayOutcome;
use crate::{Error, Result, ports::Observer};

/// Wins per player index plus draws
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Tally {
    wins: Vec<usize>,
    draws: usize,
    rounds: usize,
}

impl Tally {
    fn record(&mut self, outcome: &PlayOutcome) {
        self.rounds += 1;
        match outcome.winner {
            Some(winner) => {
                if self.wins.len() <= winner {
                    self.wins.resize(winner + 1, 0);
                }
                self.wins[winner] += 1;
            }
            None => self.draws += 1,
        }
    }

    fn message(&self) -> String {
        let wins: Vec<String> = self
            .wins
            .iter()
            .enumerate()
            .map(|(index, wins)| format!("P{}:{wins}", index + 1))
            .collect();
        format!("{} D:{}", wins.join(" "), self.draws)
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    tally: Tally,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            tally: Tally::default(),
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_rounds: usize) -> Result<()> {
        let pb = ProgressBar::new(total_rounds as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rounds ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.tally = Tally::default();
        Ok(())
    }

    fn on_round_end(&mut self, round: usize, outcome: &PlayOutcome) -> Result<()> {
        self.tally.record(outcome);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(round as u64 + 1);
            pb.set_message(self.tally.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks wins, draws and round lengths
#[derive(Debug, Default)]
pub struct MetricsObserver {
    tally: Tally,
    total_moves: usize,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_rounds(&self) -> usize {
        self.tally.rounds
    }

    /// Rounds won by player `index`
    pub fn wins(&self, index: usize) -> usize {
        self.tally.wins.get(index).copied().unwrap_or(0)
    }

    pub fn draws(&self) -> usize {
        self.tally.draws
    }

    pub fn win_rate(&self, index: usize) -> f64 {
        if self.tally.rounds == 0 {
            0.0
        } else {
            self.wins(index) as f64 / self.tally.rounds as f64
        }
    }

    pub fn draw_rate(&self) -> f64 {
        if self.tally.rounds == 0 {
            0.0
        } else {
            self.tally.draws as f64 / self.tally.rounds as f64
        }
    }

    /// Get average round length in moves
    pub fn avg_round_length(&self) -> f64 {
        if self.tally.rounds == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.tally.rounds as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_rounds: self.tally.rounds,
            wins: self.tally.wins.clone(),
            draws: self.tally.draws,
            draw_rate: self.draw_rate(),
            avg_round_length: self.avg_round_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_rounds: usize,
    pub wins: Vec<usize>,
    pub draws: usize,
    pub draw_rate: f64,
    pub avg_round_length: f64,
}

impl Observer for MetricsObserver {
    fn on_round_end(&mut self, _round: usize, outcome: &PlayOutcome) -> Result<()> {
        self.tally.record(outcome);
        self.total_moves += outcome.moves;
        Ok(())
    }
}
