//! Reinforcement learning for turn-based games
//!
//! This crate provides:
//! - A generic game and agent contract for deterministic, fully observable
//!   turn-based games with any number of players
//! - A tabular Q-learning agent and a neural (DQN-style) agent built on a
//!   small two-layer network
//! - A trainer that plays agents against each other with deferred credit
//!   assignment, plus staged training regimens and observers
//! - Matches against a human over text streams
//! - Countdown and noughts-and-crosses integrations

pub mod cli;
pub mod dqn;
pub mod error;
pub mod games;
pub mod neural;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use error::{Error, Result};
