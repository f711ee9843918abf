//! Agent that plays from a learned reward table.

use games_morris::{MillGame, State};
use tracing::debug;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::reward_table::RewardTable;

/// Greedy player over a [`RewardTable`].
///
/// Positions the table knows nothing about (no entry for any legal move)
/// are handed to the fallback agent, usually a small MCTS.
pub struct QAgent {
    table: RewardTable,
    fallback: Box<dyn Agent>,
    table_hits: u64,
    fallbacks: u64,
}

impl QAgent {
    pub fn new(table: RewardTable, fallback: Box<dyn Agent>) -> Self {
        Self {
            table,
            fallback,
            table_hits: 0,
            fallbacks: 0,
        }
    }

    pub fn table(&self) -> &RewardTable {
        &self.table
    }

    /// Decisions answered from the table and from the fallback.
    pub fn decision_counts(&self) -> (u64, u64) {
        (self.table_hits, self.fallbacks)
    }
}

impl std::fmt::Debug for QAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QAgent")
            .field("entries", &self.table.len())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl Agent for QAgent {
    fn name(&self) -> &str {
        "qtable"
    }

    fn propose(&mut self, game: &MillGame) -> Result<Option<State>, AgentError> {
        if game.is_finished() {
            return Ok(None);
        }
        let state = State::new(game.clone());
        if let Some((next, value)) = self.table.best_successor(&state) {
            self.table_hits += 1;
            debug!(value, mv = ?next.last_move(), "qtable decision");
            return Ok(Some(next));
        }

        self.fallbacks += 1;
        debug!(fallback = self.fallback.name(), "no table entry, falling back");
        self.fallback.propose(game)
    }

    fn new_game(&mut self) {
        self.fallback.new_game();
    }

    fn release(&mut self) {
        self.fallback.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomAgent;
    use crate::reward_table::LearningParams;
    use games_morris::{Color, Move, Position};

    fn pos(ring: i32, cell: i32) -> Position {
        Position::new(ring, cell).unwrap()
    }

    #[test]
    fn test_uses_table_when_known() {
        let game = MillGame::new(Color::White);
        let mut table = RewardTable::new();
        let mv = Move::place(pos(1, 5));
        table.update(&State::new(game.clone()), &mv, 1.0, 0.0, &LearningParams::default());

        let mut agent = QAgent::new(table, Box::new(RandomAgent::with_seed(1)));
        assert_eq!(agent.peek(&game).unwrap(), Some(mv));
        assert_eq!(agent.decision_counts(), (1, 0));
    }

    #[test]
    fn test_falls_back_on_unknown_state() {
        let game = MillGame::new(Color::White);
        let mut agent = QAgent::new(RewardTable::new(), Box::new(RandomAgent::with_seed(1)));

        assert!(agent.peek(&game).unwrap().is_some());
        assert_eq!(agent.decision_counts(), (0, 1));
    }

    #[test]
    fn test_finished_game_has_no_move() {
        let mut game = MillGame::new(Color::White).with_max_moves(Some(1));
        game.place(pos(0, 0)).unwrap();
        let mut agent = QAgent::new(RewardTable::new(), Box::new(RandomAgent::with_seed(1)));
        assert!(agent.peek(&game).unwrap().is_none());
        assert_eq!(agent.decision_counts(), (0, 0));
    }
}
