//! Monte Carlo Tree Search (MCTS) for Nine Men's Morris.
//!
//! This crate implements UCT search over [`games_morris::State`] successors,
//! scoring leaves with uniformly random playouts.
//!
//! # Overview
//!
//! Each iteration consists of four phases:
//!
//! 1. **Selection**: Descend through fully expanded nodes, picking the child
//!    with the best UCB1 score `avg + 2 * cp * sqrt(2 * ln(N_parent) / N)`
//! 2. **Expansion**: The first node with an untried successor gets exactly
//!    one new child; successors are drawn lazily in random order
//! 3. **Simulation**: Random playouts from the new child, one per worker
//! 4. **Backpropagation**: Rewards (+1 win, -1 loss, 0 tie for the root
//!    player) are added along the path, seen from each node's mover
//!
//! After the configured iterations the root child with the highest mean
//! reward is returned.
//!
//! # Usage
//!
//! ```rust
//! use games_morris::{Color, MillGame};
//! use mcts::{run_mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let game = MillGame::new(Color::White);
//! let config = MctsConfig::for_testing();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = run_mcts(&game, config, None, &mut rng).unwrap();
//! assert_eq!(result.state.game().turn(), Color::Black);
//! ```
//!
//! # Parallel rollouts
//!
//! A [`RolloutPool`] replicates every simulation across its workers and
//! backs up the summed reward with a visit count equal to the number of
//! rollouts. The pool is owned by the caller so it can outlive a single
//! search; call [`RolloutPool::release`] (or drop it) to stop the threads.
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------+
//! |                       MctsSearch                      |
//! |  +-------------+   +-------------+   +-------------+  |
//! |  |  MctsTree   |   |    State    |   | RolloutPool |  |
//! |  |  (arena)    |   | (successors)|   |   (rayon)   |  |
//! |  +------+------+   +------+------+   +------+------+  |
//! |         v                 v                 v         |
//! |    select -> expand -> simulate -> backpropagate      |
//! +-------------------------------------------------------+
//! ```

pub mod config;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{MctsNode, NodeId};
pub use rollout::{rollout, RolloutPool};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult, SearchStats};
pub use tree::{MctsTree, TreeStats};
