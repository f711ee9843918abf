//! Agent error types.

use std::path::PathBuf;

use games_morris::{PreconditionError, RuleError};
use mcts::SearchError;
use thiserror::Error;

/// Errors raised while an agent chooses or applies a move.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Reward table error: {0}")]
    Table(#[from] TableError),

    #[error("Chosen move was rejected by the game: {0}")]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("Successor carries no move")]
    MissingMove,
}

/// Errors loading or saving a reward table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed reward table: {0}")]
    Json(#[from] serde_json::Error),
}
