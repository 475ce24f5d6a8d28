//! Error types for the turn-learner crate

use thiserror::Error;

/// Main error type for the turn-learner crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no legal actions available from state {state}")]
    NoLegalActions { state: String },

    #[error("{operand} has shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        operand: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("training batch is empty")]
    EmptyBatch,

    #[error("got {inputs} input vectors but {targets} targets")]
    BatchLengthMismatch { inputs: usize, targets: usize },

    #[error("action index {index} is outside the output layer of size {size}")]
    ActionIndexOutOfRange { index: usize, size: usize },

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("input closed while waiting for {waiting_for}")]
    InputClosed { waiting_for: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Build an [`Error::InvalidConfiguration`] from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
