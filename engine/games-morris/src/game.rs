//! Rules engine: turn/phase state machine and legal action application.

use std::fmt;

use rand::Rng;
use tracing::trace;

use crate::action::Move;
use crate::board::{are_adjacent, Board, Cell, Color, Position};
use crate::error::{PreconditionError, RuleError};

/// Pieces each side brings into the game.
pub const PIECES_PER_PLAYER: u8 = 9;

/// A side loses once it is left with this many pieces or fewer.
pub const MIN_ALIVE_PIECES: u8 = 2;

/// Per-side counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player {
    pub color: Color,
    /// Pieces not yet placed.
    pub remaining: u8,
    /// Pieces on the board plus pieces still to place.
    pub alive: u8,
}

impl Player {
    fn new(color: Color) -> Self {
        Self {
            color,
            remaining: PIECES_PER_PLAYER,
            alive: PIECES_PER_PLAYER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Placing,
    Moving,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Placing => f.write_str("placing"),
            Phase::Moving => f.write_str("moving"),
            Phase::Finished => f.write_str("finished"),
        }
    }
}

/// Complete state of a Nine Men's Morris game.
///
/// All fields are plain values, so cloning is a flat copy. Search code clones
/// the game per branch and never shares a mutable instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MillGame {
    board: Board,
    players: [Player; 2],
    turn: Color,
    phase: Phase,
    pending_removal: bool,
    move_count: u32,
    max_moves: Option<u32>,
    winner: Option<Color>,
}

impl MillGame {
    /// New game in the placing phase with `first` to move.
    pub fn new(first: Color) -> Self {
        Self {
            board: Board::new(),
            players: [Player::new(Color::White), Player::new(Color::Black)],
            turn: first,
            phase: Phase::Placing,
            pending_removal: false,
            move_count: 0,
            max_moves: None,
            winner: None,
        }
    }

    /// New game with a uniformly random first player.
    pub fn with_random_turn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let first = if rng.gen_bool(0.5) {
            Color::White
        } else {
            Color::Black
        };
        Self::new(first)
    }

    /// Rebuild a game from a board snapshot.
    ///
    /// Alive counts are derived as pieces on the board plus pieces still to
    /// place. The phase is placing while either side has pieces to place,
    /// and then the side to move must have one left.
    pub fn from_position(
        board: Board,
        turn: Color,
        remaining: [u8; 2],
    ) -> Result<Self, PreconditionError> {
        let mut players = [Player::new(Color::White), Player::new(Color::Black)];
        for player in players.iter_mut() {
            let on_board = board.count(player.color);
            let left = remaining[player.color.index()];
            let alive = on_board + left as usize;
            if alive > PIECES_PER_PLAYER as usize {
                return Err(PreconditionError::InconsistentPosition(format!(
                    "{} has {} pieces on the board and {} to place",
                    player.color, on_board, left
                )));
            }
            player.remaining = left;
            player.alive = alive as u8;
        }

        let phase = if remaining.iter().any(|&r| r > 0) {
            Phase::Placing
        } else {
            Phase::Moving
        };

        // Alternate placement never hands the turn to a side with nothing left to place
        if phase == Phase::Placing && remaining[turn.index()] == 0 {
            return Err(PreconditionError::InconsistentPosition(format!(
                "{} to move in the placing phase with no pieces to place",
                turn
            )));
        }

        Ok(Self {
            board,
            players,
            turn,
            phase,
            pending_removal: false,
            move_count: 0,
            max_moves: None,
            winner: None,
        })
    }

    /// Cap the game at `max_moves` completed turns; reaching it is a tie.
    pub fn with_max_moves(mut self, max_moves: Option<u32>) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn set_max_moves(&mut self, max_moves: Option<u32>) {
        self.max_moves = max_moves;
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// True between a mill-forming action and the removal that completes it.
    #[inline]
    pub fn has_to_remove(&self) -> bool {
        self.pending_removal
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    pub fn max_moves(&self) -> Option<u32> {
        self.max_moves
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.turn)
    }

    pub fn opponent_player(&self) -> &Player {
        self.player(self.turn.opponent())
    }

    /// Winner of a finished game; `None` means a tie.
    pub fn winner(&self) -> Result<Option<Color>, PreconditionError> {
        if self.phase != Phase::Finished {
            return Err(PreconditionError::GameNotFinished);
        }
        Ok(self.winner)
    }

    /// Place a piece of the side to move on an empty cell.
    pub fn place(&mut self, pos: Position) -> Result<(), RuleError> {
        if self.phase != Phase::Placing {
            return Err(RuleError::InvalidState(format!(
                "cannot place a piece in the {} phase",
                self.phase
            )));
        }
        if self.pending_removal {
            return Err(RuleError::InvalidState(
                "a piece must be removed before placing".into(),
            ));
        }
        if self.current_player().remaining == 0 {
            return Err(RuleError::InvalidState(format!(
                "{} has no pieces left to place",
                self.turn
            )));
        }
        if !self.board.get(pos).is_empty() {
            return Err(RuleError::InvalidMove(format!("cell {pos} is occupied")));
        }

        self.board.put(pos, Cell::from(self.turn));
        self.players[self.turn.index()].remaining -= 1;
        if self.players.iter().all(|p| p.remaining == 0) {
            self.phase = Phase::Moving;
        }

        trace!(turn = %self.turn, to = %pos, "place");
        self.after_action(pos);
        Ok(())
    }

    /// Slide a piece of the side to move to an adjacent empty cell.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Result<(), RuleError> {
        if self.phase != Phase::Moving {
            return Err(RuleError::InvalidState(format!(
                "cannot move a piece in the {} phase",
                self.phase
            )));
        }
        if self.pending_removal {
            return Err(RuleError::InvalidState(
                "a piece must be removed before moving".into(),
            ));
        }
        if !are_adjacent(from, to) {
            return Err(RuleError::InvalidMove(format!(
                "cells {from} and {to} are not adjacent"
            )));
        }
        if self.board.get(from) != Cell::from(self.turn) {
            return Err(RuleError::InvalidMove(format!(
                "cell {from} does not hold a {} piece",
                self.turn
            )));
        }
        if !self.board.get(to).is_empty() {
            return Err(RuleError::InvalidMove(format!("cell {to} is occupied")));
        }

        self.board.remove(from);
        self.board.put(to, Cell::from(self.turn));

        trace!(turn = %self.turn, from = %from, to = %to, "move");
        self.after_action(to);
        Ok(())
    }

    /// Remove an opponent piece after forming a mill.
    pub fn remove(&mut self, pos: Position) -> Result<(), RuleError> {
        if !self.pending_removal {
            return Err(RuleError::InvalidState(
                "no mill was formed, nothing may be removed".into(),
            ));
        }
        let opponent = self.turn.opponent();
        match self.board.get(pos).owner() {
            None => {
                return Err(RuleError::InvalidMove(format!("cell {pos} is empty")));
            }
            Some(owner) if owner != opponent => {
                return Err(RuleError::InvalidMove(format!(
                    "cell {pos} holds one of your own pieces"
                )));
            }
            Some(_) => {}
        }
        if self.board.is_mill(pos) && !self.all_pieces_in_mill(opponent) {
            return Err(RuleError::InvalidMove(format!(
                "the piece at {pos} is part of a mill"
            )));
        }

        self.board.remove(pos);
        self.players[opponent.index()].alive -= 1;
        let alive = self.players[opponent.index()].alive;
        trace!(turn = %self.turn, removed = %pos, alive, "remove");

        self.pending_removal = false;
        if alive <= MIN_ALIVE_PIECES {
            self.finish(Some(self.turn));
        } else {
            self.advance_turn();
        }
        Ok(())
    }

    /// Place and remove as one all-or-nothing action.
    pub fn place_and_remove(&mut self, pos: Position, removed: Position) -> Result<(), RuleError> {
        let snapshot = self.clone();
        self.place(pos)?;
        self.complete_removal(snapshot, removed)
    }

    /// Move and remove as one all-or-nothing action.
    pub fn move_and_remove(
        &mut self,
        from: Position,
        to: Position,
        removed: Position,
    ) -> Result<(), RuleError> {
        let snapshot = self.clone();
        self.move_piece(from, to)?;
        self.complete_removal(snapshot, removed)
    }

    fn complete_removal(&mut self, snapshot: MillGame, removed: Position) -> Result<(), RuleError> {
        if !self.pending_removal {
            *self = snapshot;
            return Err(RuleError::InvalidMove(
                "the action does not form a mill, nothing may be removed".into(),
            ));
        }
        if let Err(e) = self.remove(removed) {
            *self = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Apply any composite action atomically.
    ///
    /// An action that forms a mill must name the piece to remove; one that
    /// does not form a mill must not.
    pub fn apply(&mut self, mv: &Move) -> Result<(), RuleError> {
        let snapshot = self.clone();
        let result = match (mv.from, mv.removed) {
            (None, None) => self.place(mv.to),
            (None, Some(removed)) => self.place_and_remove(mv.to, removed),
            (Some(from), None) => self.move_piece(from, mv.to),
            (Some(from), Some(removed)) => self.move_and_remove(from, mv.to, removed),
        };
        match result {
            Ok(()) if self.pending_removal => {
                *self = snapshot;
                Err(RuleError::InvalidMove(
                    "the action forms a mill but names no piece to remove".into(),
                ))
            }
            Ok(()) => Ok(()),
            Err(e) => {
                *self = snapshot;
                Err(e)
            }
        }
    }

    /// Does every piece `color` has on the board belong to a mill?
    pub fn all_pieces_in_mill(&self, color: Color) -> bool {
        self.board
            .positions_of(Cell::from(color))
            .all(|pos| self.board.is_mill(pos))
    }

    /// Can `color` slide any piece to an adjacent empty cell?
    pub fn can_move(&self, color: Color) -> bool {
        self.board
            .positions_of(Cell::from(color))
            .any(|pos| self.board.any_adjacent_empty(pos))
    }

    fn after_action(&mut self, landed: Position) {
        let opponent = self.turn.opponent();
        if self.board.is_mill(landed) && self.board.count(opponent) > 0 {
            self.pending_removal = true;
        } else {
            self.advance_turn();
        }
    }

    /// Count the completed turn, then either end the game or hand over.
    fn advance_turn(&mut self) {
        self.move_count += 1;
        if self.max_moves.is_some_and(|cap| self.move_count >= cap) {
            self.finish(None);
            return;
        }
        if self.phase == Phase::Moving && !self.can_move(self.turn.opponent()) {
            self.finish(Some(self.turn));
            return;
        }
        self.turn = self.turn.opponent();
    }

    fn finish(&mut self, winner: Option<Color>) {
        self.phase = Phase::Finished;
        self.winner = winner;
        trace!(winner = ?winner, moves = self.move_count, "game finished");
    }
}

impl Default for MillGame {
    fn default() -> Self {
        Self::new(Color::White)
    }
}
