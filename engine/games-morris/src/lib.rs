//! Nine Men's Morris rules engine
//!
//! This crate provides the board, the turn/phase state machine and the
//! successor generator consumed by the search crates.
//!
//! # Usage
//!
//! ```rust
//! use games_morris::{Color, MillGame, Position, State};
//!
//! let mut game = MillGame::new(Color::White).with_max_moves(Some(150));
//! game.place(Position::new(0, 0).unwrap()).unwrap();
//!
//! // Every legal reply for black, in canonical order
//! let replies: Vec<_> = State::new(game.clone()).successors().collect();
//! assert_eq!(replies.len(), 23);
//! ```

pub mod action;
pub mod board;
pub mod error;
pub mod game;
pub mod snapshot;
pub mod state;

pub use action::{Move, MoveRecord, PACKED_NONE, TEXT_NONE};
pub use board::{
    are_adjacent, is_intersection, Board, Cell, Color, Position, BOARD_SIZE, CELLS_PER_RING,
    RINGS,
};
pub use error::{DecodeError, PreconditionError, RuleError};
pub use game::{MillGame, Phase, Player, MIN_ALIVE_PIECES, PIECES_PER_PLAYER};
pub use snapshot::{Snapshot, SuccessorRecord};
pub use state::{State, Successors};

#[cfg(test)]
mod tests;
