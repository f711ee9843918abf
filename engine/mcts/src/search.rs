//! MCTS search implementation.
//!
//! Implements the UCT algorithm:
//! 1. Selection: descend through fully expanded nodes by UCT score
//! 2. Expansion: add one not-yet-tried successor of the first node that has one
//! 3. Simulation: random playouts from the new node
//! 4. Backpropagation: add the playout rewards along the path to the root

use games_morris::{MillGame, Move, PreconditionError, State};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::rollout::{rollout, RolloutPool};
use crate::tree::{MctsTree, TreeStats};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Average reward is undefined for an unvisited node")]
    Unvisited,

    #[error("UCT score is undefined for the root node")]
    RootHasNoUct,

    #[error("Node has no expanded children")]
    NoExpandedChildren,

    #[error("Rollout stalled: {0}")]
    StalledRollout(String),

    #[error("Rollout worker pool failed: {0}")]
    WorkerPool(String),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Successor chosen for the side to move
    pub state: State,

    /// Composite action leading to `state`
    pub action: Option<Move>,

    /// Mean reward of the chosen child, from the mover's point of view
    pub value: f64,

    /// Rollouts that went through the chosen child
    pub visits: u32,

    /// Iterations performed
    pub iterations: u32,
}

/// Statistics from a completed search.
#[derive(Debug, Clone)]
pub struct SearchStats {
    pub iterations: u32,
    pub tree: TreeStats,
}

/// MCTS search state.
pub struct MctsSearch<'a> {
    tree: MctsTree,
    config: MctsConfig,
    pool: Option<&'a RolloutPool>,
    iterations: u32,
}

impl<'a> MctsSearch<'a> {
    /// Create a new MCTS search from the given game.
    ///
    /// Without a pool each simulation runs a single inline rollout.
    pub fn new(game: &MillGame, config: MctsConfig, pool: Option<&'a RolloutPool>) -> Self {
        Self {
            tree: MctsTree::new(State::new(game.clone())),
            config,
            pool,
            iterations: 0,
        }
    }

    /// Run the MCTS search for the configured number of iterations and
    /// return the best root child.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        for _ in 0..self.config.iterations {
            self.run_iteration(rng)?;
        }

        let best = self.tree.get(self.tree.best_child()?);
        let stats = self.stats();
        debug!(
            iterations = stats.iterations,
            nodes = stats.tree.total_nodes,
            depth = stats.tree.max_depth,
            value = best.avg_reward()?,
            "MCTS search complete"
        );

        Ok(SearchResult {
            state: best.state.clone(),
            action: best.state.last_move(),
            value: best.avg_reward()?,
            visits: best.visits,
            iterations: self.iterations,
        })
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    pub fn run_iteration(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let leaf_id = self.tree_policy(rng)?;

        let perspective = self.tree.perspective();
        let depth = self.config.max_rollout_depth;
        let game = self.tree.get(leaf_id).state.game();
        let (reward_sum, visits) = match self.pool {
            Some(pool) => pool.simulate(game, perspective, depth, rng)?,
            None => (rollout(game, perspective, depth, rng)?, 1),
        };

        self.tree.backpropagate(leaf_id, reward_sum, visits);
        self.iterations += 1;

        trace!(
            leaf = leaf_id.0,
            reward = reward_sum,
            rollouts = visits,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Walk down from the root until a node still has an untried successor
    /// (expand it) or the game is over there.
    fn tree_policy(&mut self, rng: &mut ChaCha20Rng) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        while !self.tree.get(current).is_terminal() {
            if let Some(child) = self.tree.expand_next(current, rng) {
                return Ok(child);
            }
            current = self.tree.select_child(current, self.config.cp)?;
            if self.tree.get(current).visits == 0 {
                break;
            }
        }

        Ok(current)
    }

    /// Get the search tree (for debugging/analysis).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            iterations: self.iterations,
            tree: self.tree.stats(),
        }
    }
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts(
    game: &MillGame,
    config: MctsConfig,
    pool: Option<&RolloutPool>,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(game, config, pool);
    search.run(rng)
}
