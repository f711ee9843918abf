//! Uniformly random agent.

use games_morris::{MillGame, State};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::agent::Agent;
use crate::error::AgentError;

/// Plays the first successor of a freshly shuffled enumeration.
#[derive(Debug)]
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn propose(&mut self, game: &MillGame) -> Result<Option<State>, AgentError> {
        if game.is_finished() {
            return Ok(None);
        }
        Ok(State::new(game.clone())
            .shuffled_successors(&mut self.rng)
            .next())
    }
}
