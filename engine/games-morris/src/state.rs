//! Search snapshots and the successor generator.
//!
//! A [`State`] owns a private copy of a [`MillGame`] together with the move
//! that produced it and the cached cell partition. [`Successors`] lazily
//! yields every state reachable by one composite action (place or move, plus
//! the forced removal when a mill forms).

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::action::Move;
use crate::board::{Cell, Color, Position};
use crate::game::{MillGame, Phase};
use crate::snapshot::Snapshot;

/// Immutable snapshot of a game as seen by the search code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    game: MillGame,
    last_move: Option<Move>,
    empty: Vec<Position>,
    pieces: [Vec<Position>; 2],
}

impl State {
    /// Wrap a copy of `game` as a root state.
    pub fn new(game: MillGame) -> Self {
        Self::build(game, None)
    }

    fn build(game: MillGame, last_move: Option<Move>) -> Self {
        let board = game.board();
        let empty = board.positions_of(Cell::Empty).collect();
        let pieces = [
            board.positions_of(Cell::White).collect(),
            board.positions_of(Cell::Black).collect(),
        ];
        Self {
            game,
            last_move,
            empty,
            pieces,
        }
    }

    #[inline]
    pub fn game(&self) -> &MillGame {
        &self.game
    }

    pub fn into_game(self) -> MillGame {
        self.game
    }

    /// The action that produced this state; `None` for a root.
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn empty_cells(&self) -> &[Position] {
        &self.empty
    }

    pub fn pieces(&self, color: Color) -> &[Position] {
        &self.pieces[color.index()]
    }

    pub fn is_terminal(&self) -> bool {
        self.game.is_finished()
    }

    /// Canonical fingerprint: empty cells, each side's cells, turn and
    /// pieces left to place. Independent of move history.
    pub fn fingerprint(&self) -> String {
        Snapshot::of_state(self).fingerprint()
    }

    /// Successors in canonical (index) order.
    pub fn successors(&self) -> Successors {
        Successors::new(self, None)
    }

    /// Successors in a fresh random order.
    pub fn shuffled_successors<R: Rng>(&self, rng: &mut R) -> Successors {
        Successors::new(self, Some(rng as &mut dyn RngCore))
    }
}

impl From<MillGame> for State {
    fn from(game: MillGame) -> Self {
        State::new(game)
    }
}

/// Removal branch in progress: the game after the mill-forming action.
#[derive(Debug)]
struct PendingRemoval {
    game: MillGame,
    mv: Move,
    next_victim: usize,
}

/// Lazy, single-pass generator of successor states.
///
/// Candidate `(from, to)` pairs are fixed (and shuffled, if requested) up
/// front; the expensive part, cloning and applying the game, happens one
/// candidate at a time in [`Iterator::next`].
#[derive(Debug)]
pub struct Successors {
    origin: MillGame,
    candidates: Vec<(Option<Position>, Position)>,
    next_candidate: usize,
    victims: Vec<Position>,
    pending: Option<PendingRemoval>,
}

impl Successors {
    fn new(state: &State, mut rng: Option<&mut dyn RngCore>) -> Self {
        let game = &state.game;
        let mover = game.turn();
        let mut candidates = Vec::new();

        match game.phase() {
            Phase::Placing => {
                let mut cells = state.empty.clone();
                if let Some(rng) = rng.as_deref_mut() {
                    cells.shuffle(rng);
                }
                candidates.extend(cells.into_iter().map(|to| (None, to)));
            }
            Phase::Moving => {
                let mut own = state.pieces(mover).to_vec();
                if let Some(rng) = rng.as_deref_mut() {
                    own.shuffle(rng);
                }
                for from in own {
                    let mut targets: Vec<Position> = from
                        .neighbors()
                        .filter(|&n| game.board().get(n).is_empty())
                        .collect();
                    if let Some(rng) = rng.as_deref_mut() {
                        targets.shuffle(rng);
                    } else {
                        targets.sort_unstable();
                    }
                    candidates.extend(targets.into_iter().map(|to| (Some(from), to)));
                }
            }
            Phase::Finished => {}
        }

        let mut victims = state.pieces(mover.opponent()).to_vec();
        if let Some(rng) = rng {
            victims.shuffle(rng);
        }

        Self {
            origin: game.clone(),
            candidates,
            next_candidate: 0,
            victims,
            pending: None,
        }
    }

    fn next_removal(&mut self) -> Option<State> {
        let pending = self.pending.as_mut()?;
        while let Some(&victim) = self.victims.get(pending.next_victim) {
            pending.next_victim += 1;
            let mut game = pending.game.clone();
            if game.remove(victim).is_ok() {
                return Some(State::build(game, Some(pending.mv.with_removal(victim))));
            }
        }
        self.pending = None;
        None
    }
}

impl Iterator for Successors {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        loop {
            if self.pending.is_some() {
                if let Some(state) = self.next_removal() {
                    return Some(state);
                }
                continue;
            }

            let &(from, to) = self.candidates.get(self.next_candidate)?;
            self.next_candidate += 1;

            let mut game = self.origin.clone();
            let (applied, mv) = match from {
                None => (game.place(to), Move::place(to)),
                Some(from) => (game.move_piece(from, to), Move::slide(from, to)),
            };
            if applied.is_err() {
                continue;
            }
            if game.has_to_remove() {
                self.pending = Some(PendingRemoval {
                    game,
                    mv,
                    next_victim: 0,
                });
                continue;
            }
            return Some(State::build(game, Some(mv)));
        }
    }
}
