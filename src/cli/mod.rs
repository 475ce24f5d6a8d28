//! CLI infrastructure for turn-learner
//!
//! This module provides the command-line interface for training agents,
//! playing against them, and pitting trained noughts-and-crosses agents
//! against each other.

pub mod commands;
pub mod config;
pub mod output;
