//! MCTS-backed agent.

use games_morris::{MillGame, State};
use mcts::{run_mcts, MctsConfig, RolloutPool, SearchResult};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::agent::Agent;
use crate::error::AgentError;

/// Runs a fresh UCT search for every decision.
///
/// With `parallel` set the agent owns a [`RolloutPool`] for its whole
/// lifetime. The pool is released by [`Agent::release`] or on drop; a
/// released agent keeps playing with sequential rollouts.
#[derive(Debug)]
pub struct MctsAgent {
    config: MctsConfig,
    pool: Option<RolloutPool>,
    rng: ChaCha20Rng,
}

impl MctsAgent {
    pub fn new(config: MctsConfig) -> Result<Self, AgentError> {
        Self::with_rng(config, ChaCha20Rng::from_entropy())
    }

    pub fn with_seed(config: MctsConfig, seed: u64) -> Result<Self, AgentError> {
        Self::with_rng(config, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(config: MctsConfig, rng: ChaCha20Rng) -> Result<Self, AgentError> {
        let workers = config.resolved_workers();
        let pool = if workers > 1 {
            Some(RolloutPool::new(workers)?)
        } else {
            None
        };
        Ok(Self { config, pool, rng })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Whether rollouts currently run on worker threads.
    pub fn is_parallel(&self) -> bool {
        self.pool.as_ref().is_some_and(RolloutPool::is_active)
    }

    /// Full search result for `game`, or `None` if it is finished.
    pub fn search(&mut self, game: &MillGame) -> Result<Option<SearchResult>, AgentError> {
        if game.is_finished() {
            return Ok(None);
        }
        let result = run_mcts(game, self.config.clone(), self.pool.as_ref(), &mut self.rng)?;
        debug!(
            iterations = result.iterations,
            visits = result.visits,
            value = result.value,
            mv = ?result.action,
            "mcts decision"
        );
        Ok(Some(result))
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &str {
        "mcts"
    }

    fn propose(&mut self, game: &MillGame) -> Result<Option<State>, AgentError> {
        Ok(self.search(game)?.map(|result| result.state))
    }

    fn release(&mut self) {
        if let Some(pool) = self.pool.as_mut() {
            pool.release();
        }
    }
}
