//! MCTS for the opening, minimax afterwards.

use games_morris::{MillGame, State};
use tracing::debug;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::mcts_agent::MctsAgent;
use crate::minimax::MinimaxAgent;

/// Delegates its first `mcts_limit` decisions to MCTS and every later one to
/// minimax.
#[derive(Debug)]
pub struct HybridAgent {
    mcts: MctsAgent,
    minimax: MinimaxAgent,
    mcts_limit: u32,
    turn_counter: u32,
}

impl HybridAgent {
    pub fn new(mcts: MctsAgent, minimax: MinimaxAgent, mcts_limit: u32) -> Self {
        Self {
            mcts,
            minimax,
            mcts_limit,
            turn_counter: 0,
        }
    }

    /// Decisions made by the MCTS half so far.
    pub fn turn_counter(&self) -> u32 {
        self.turn_counter
    }

    /// Start counting from zero again, e.g. for a new game.
    pub fn reset(&mut self) {
        self.turn_counter = 0;
    }
}

impl Agent for HybridAgent {
    fn name(&self) -> &str {
        "hybrid"
    }

    fn propose(&mut self, game: &MillGame) -> Result<Option<State>, AgentError> {
        if game.is_finished() {
            return Ok(None);
        }
        if self.turn_counter < self.mcts_limit {
            self.turn_counter += 1;
            debug!(turn = self.turn_counter, limit = self.mcts_limit, "hybrid using mcts");
            return self.mcts.propose(game);
        }
        self.minimax.propose(game)
    }

    fn new_game(&mut self) {
        self.reset();
    }

    fn release(&mut self) {
        self.mcts.release();
    }
}
