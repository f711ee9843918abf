//! Textual state form shared with remote peers and the learning table.

use serde::{Deserialize, Serialize};

use crate::action::{Move, MoveRecord};
use crate::board::{Board, Cell, Color, Position};
use crate::error::{DecodeError, PreconditionError};
use crate::game::MillGame;
use crate::state::State;

/// Board situation without history: free cells, each side's cells, the side
/// to move and the pieces each side still has to place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "FREE")]
    pub free: Vec<u8>,
    #[serde(rename = "GAMER")]
    pub gamer: [Vec<u8>; 2],
    #[serde(rename = "TURN")]
    pub turn: Color,
    #[serde(rename = "CHIPS")]
    pub chips: [u8; 2],
}

impl Snapshot {
    pub fn of_game(game: &MillGame) -> Self {
        let board = game.board();
        let indices = |cell: Cell| board.positions_of(cell).map(|p| p.index() as u8).collect();
        Self {
            free: indices(Cell::Empty),
            gamer: [indices(Cell::White), indices(Cell::Black)],
            turn: game.turn(),
            chips: [
                game.player(Color::White).remaining,
                game.player(Color::Black).remaining,
            ],
        }
    }

    pub fn of_state(state: &State) -> Self {
        let indices = |cells: &[Position]| cells.iter().map(|p| p.index() as u8).collect();
        let game = state.game();
        Self {
            free: indices(state.empty_cells()),
            gamer: [
                indices(state.pieces(Color::White)),
                indices(state.pieces(Color::Black)),
            ],
            turn: game.turn(),
            chips: [
                game.player(Color::White).remaining,
                game.player(Color::Black).remaining,
            ],
        }
    }

    /// Canonical string key. Cell lists are kept in index order.
    pub fn fingerprint(&self) -> String {
        let list = |cells: &[u8]| {
            cells
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        format!(
            "FREE[{}]W[{}]B[{}]TURN[{}]CHIPS[{},{}]",
            list(&self.free),
            list(&self.gamer[0]),
            list(&self.gamer[1]),
            self.turn,
            self.chips[0],
            self.chips[1]
        )
    }

    /// Does `game` describe the same situation?
    pub fn matches(&self, game: &MillGame) -> bool {
        *self == Snapshot::of_game(game)
    }

    /// Rebuild a playable game from the snapshot.
    pub fn to_game(&self) -> Result<MillGame, PreconditionError> {
        let mut board = Board::new();
        for (color, cells) in [(Color::White, &self.gamer[0]), (Color::Black, &self.gamer[1])] {
            for &index in cells.iter() {
                let pos = Position::from_index(index as i32)?;
                if !board.get(pos).is_empty() {
                    return Err(PreconditionError::InconsistentPosition(format!(
                        "cell {pos} listed twice"
                    )));
                }
                board.put(pos, Cell::from(color));
            }
        }
        MillGame::from_position(board, self.turn, self.chips)
    }

    pub fn to_json(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One transition: where the game was, what was played, where it went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessorRecord {
    #[serde(rename = "STATE")]
    pub state: Snapshot,
    #[serde(rename = "MOVE")]
    pub mv: MoveRecord,
    #[serde(rename = "NEXT_STATE")]
    pub next_state: Snapshot,
}

impl SuccessorRecord {
    pub fn new(before: &MillGame, mv: &Move, after: &MillGame) -> Self {
        Self {
            state: Snapshot::of_game(before),
            mv: mv.to_record(),
            next_state: Snapshot::of_game(after),
        }
    }
}
