//! Training and play pipelines
//!
//! This module provides:
//! - The turn-based trainer: [`play`] and [`play_many`]
//! - Training runs with observers and exploration schedules
//! - Staged training regimens
//! - Matches between agents and a human over text streams

pub mod human;
pub mod observers;
pub mod play;
pub mod regimen;
pub mod training;

pub use human::{Seat, play_human, play_human_session};
pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver};
pub use play::{PlayOutcome, TurnRecord, WinFractions, infer_winner, play, play_many};
pub use regimen::{TrainingBlock, TrainingRegimen};
pub use training::{Trainer, TrainingConfig, TrainingResult};

pub use crate::ports::{Agent, Observer};
