//! Error types for the rules engine.
//!
//! Rule violations are expected during normal play (a caller tried an action
//! that is not legal right now) and are always recoverable. Precondition
//! violations mean the caller misused the API and should not be retried.

use thiserror::Error;

/// A rejected game action. Recoverable: pick a different action and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The action is not legal in the current phase / pending-removal combination.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The action is legal in principle but the cells involved break a rule.
    #[error("Invalid move: {0}")]
    InvalidMove(String),
}

/// Structural misuse of the board or game API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Position out of range: ring {ring} (0-2), cell {cell} (0-7)")]
    PositionOutOfRange { ring: i32, cell: i32 },

    #[error("Cell index out of range: {0} (0-23)")]
    IndexOutOfRange(i32),

    #[error("The winner is undefined until the game is finished")]
    GameNotFinished,

    #[error("Inconsistent position: {0}")]
    InconsistentPosition(String),
}

/// Failure to decode a move or snapshot from its packed or textual form.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid packed move {0:#08x}: {1}")]
    InvalidPacked(u32, String),

    #[error("Invalid position text '{0}', expected ring:cell")]
    InvalidPositionText(String),

    #[error(transparent)]
    OutOfRange(#[from] PreconditionError),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
