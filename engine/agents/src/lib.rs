//! Move-choosing agents for Nine Men's Morris.
//!
//! Every agent implements [`Agent`]: given a game it proposes one successor
//! state, and the provided methods turn that into a peeked or applied
//! [`games_morris::Move`].
//!
//! | Agent | Strategy |
//! |---|---|
//! | [`RandomAgent`] | first successor of a shuffled enumeration |
//! | [`MinimaxAgent`] | alpha-beta over canonical successors, piece-difference heuristic |
//! | [`MctsAgent`] | UCT with random rollouts, optionally on a worker pool |
//! | [`HybridAgent`] | MCTS for the first decisions, minimax afterwards |
//! | [`QAgent`] | greedy over a [`RewardTable`], falling back to another agent |
//!
//! [`QLearner`] trains reward tables by self-play against any agent, and
//! [`play_match`] runs a series of games and collects [`MatchStats`].

pub mod agent;
pub mod arena;
pub mod error;
pub mod hybrid;
pub mod mcts_agent;
pub mod minimax;
pub mod persist;
pub mod q_agent;
pub mod random;
pub mod reward_table;
pub mod trainer;

pub use agent::Agent;
pub use arena::{play_game, play_match, GameRecord, MatchStats, Turn};
pub use error::{AgentError, TableError};
pub use hybrid::HybridAgent;
pub use mcts_agent::MctsAgent;
pub use minimax::{evaluate, MinimaxAgent, WIN_SCORE};
pub use persist::write_atomic;
pub use q_agent::QAgent;
pub use random::RandomAgent;
pub use reward_table::{LearningParams, RewardTable};
pub use trainer::{EpisodeOutcome, QLearner, TrainingSummary};
