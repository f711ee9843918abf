//! Configuration for the actor binary
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine_config::{load_config, CentralConfig};
use games_morris::{Color, MillGame};
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_data_dir() -> String {
    CENTRAL_CONFIG.common.data_dir.clone()
}

fn default_max_moves() -> u32 {
    CENTRAL_CONFIG.game.max_moves
}

fn default_first_turn() -> String {
    CENTRAL_CONFIG.game.first_turn.clone()
}

fn default_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.iterations
}

fn default_cp() -> f64 {
    CENTRAL_CONFIG.mcts.cp
}

fn default_parallel() -> bool {
    CENTRAL_CONFIG.mcts.parallel
}

fn default_workers() -> usize {
    CENTRAL_CONFIG.mcts.workers
}

fn default_max_rollout_depth() -> u32 {
    CENTRAL_CONFIG.mcts.max_rollout_depth
}

fn default_max_depth() -> u32 {
    CENTRAL_CONFIG.minimax.max_depth
}

fn default_mcts_limit() -> u32 {
    CENTRAL_CONFIG.hybrid.mcts_limit
}

fn default_fallback_iterations() -> u32 {
    CENTRAL_CONFIG.learning.fallback_iterations
}

fn default_table_file() -> String {
    CENTRAL_CONFIG.learning.table_file.clone()
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.arena.games
}

fn default_episodes() -> u32 {
    CENTRAL_CONFIG.learning.episodes
}

fn default_epsilon() -> f64 {
    CENTRAL_CONFIG.learning.epsilon
}

fn default_learning_rate() -> f64 {
    CENTRAL_CONFIG.learning.learning_rate
}

fn default_discount() -> f64 {
    CENTRAL_CONFIG.learning.discount
}

fn default_initial_value() -> f64 {
    CENTRAL_CONFIG.learning.initial_value
}

#[derive(Parser, Debug, Clone)]
#[command(name = "actor")]
#[command(about = "Nine Men's Morris match runner and reward-table trainer")]
#[command(
    long_about = "Plays series of games between agents (random, minimax, mcts, hybrid,
qtable) and trains reward tables by Q-learning against an opponent agent.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,

    /// Directory for reward tables, transcripts and stats
    #[arg(long, global = true, default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Turns before a game is declared a tie (0 for no cap)
    #[arg(long, global = true, default_value_t = default_max_moves())]
    pub max_moves: u32,

    /// Who moves first: white, black or random
    #[arg(long, global = true, default_value_t = default_first_turn())]
    pub first_turn: String,

    /// Seed for every random choice made by the run
    #[arg(long, global = true, env = "MORRIS_SEED")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub search: SearchArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Agent construction settings shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// MCTS iterations per decision
    #[arg(long, global = true, default_value_t = default_iterations())]
    pub iterations: u32,

    /// MCTS exploration constant
    #[arg(long, global = true, default_value_t = default_cp())]
    pub cp: f64,

    /// Replicate rollouts across a worker pool
    #[arg(long, global = true, action = clap::ArgAction::Set, default_value_t = default_parallel())]
    pub parallel: bool,

    /// Rollout workers (0 for hardware parallelism)
    #[arg(long, global = true, default_value_t = default_workers())]
    pub workers: usize,

    /// Further turns a rollout may play before scoring a tie
    #[arg(long, global = true, default_value_t = default_max_rollout_depth())]
    pub max_rollout_depth: u32,

    /// Minimax search depth
    #[arg(long, global = true, default_value_t = default_max_depth())]
    pub max_depth: u32,

    /// Decisions the hybrid agent hands to MCTS before switching to minimax
    #[arg(long, global = true, default_value_t = default_mcts_limit())]
    pub mcts_limit: u32,

    /// MCTS iterations of the qtable agent's fallback for unknown states
    #[arg(long, global = true, default_value_t = default_fallback_iterations())]
    pub fallback_iterations: u32,

    /// Reward table file, relative to the data directory unless absolute
    #[arg(long, global = true, default_value_t = default_table_file())]
    pub table: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Play a series of games between two agents
    Play(PlayArgs),
    /// Train a reward table against an opponent agent
    Train(TrainArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    #[arg(long, value_enum, default_value_t = AgentKind::Mcts)]
    pub white: AgentKind,

    #[arg(long, value_enum, default_value_t = AgentKind::Random)]
    pub black: AgentKind,

    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Write every transition as a JSON line to this file
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Write match statistics as JSON to this file
    #[arg(long)]
    pub stats_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, default_value_t = default_episodes())]
    pub episodes: u32,

    #[arg(long, value_enum, default_value_t = AgentKind::Random)]
    pub opponent: AgentKind,

    /// Probability of exploring a random successor
    #[arg(long, default_value_t = default_epsilon())]
    pub epsilon: f64,

    #[arg(long, default_value_t = default_learning_rate())]
    pub learning_rate: f64,

    #[arg(long, default_value_t = default_discount())]
    pub discount: f64,

    /// Value assumed for pairs the table has not seen yet
    #[arg(long, default_value_t = default_initial_value())]
    pub initial_value: f64,

    /// Write the training summary as JSON to this file
    #[arg(long)]
    pub stats_file: Option<PathBuf>,
}

/// Which agent implementation to build.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Random,
    Minimax,
    Mcts,
    Hybrid,
    Qtable,
}

/// Who moves first in each game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstTurn {
    Fixed(Color),
    Random,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.first_turn()?;

        if self.search.iterations == 0 {
            return Err(anyhow!("iterations must be greater than 0"));
        }

        if !self.search.cp.is_finite() || self.search.cp < 0.0 {
            return Err(anyhow!("cp must be a non-negative number"));
        }

        if self.search.table.is_empty() {
            return Err(anyhow!("table cannot be empty"));
        }

        match &self.command {
            Command::Play(args) => {
                if args.games == 0 {
                    return Err(anyhow!("games must be greater than 0"));
                }
            }
            Command::Train(args) => {
                if args.episodes == 0 {
                    return Err(anyhow!("episodes must be greater than 0"));
                }
                if !(0.0..=1.0).contains(&args.epsilon) {
                    return Err(anyhow!("epsilon must be within [0, 1]"));
                }
                if !(args.learning_rate > 0.0 && args.learning_rate <= 1.0) {
                    return Err(anyhow!("learning_rate must be within (0, 1]"));
                }
                if !(0.0..=1.0).contains(&args.discount) {
                    return Err(anyhow!("discount must be within [0, 1]"));
                }
            }
        }

        Ok(())
    }

    pub fn first_turn(&self) -> Result<FirstTurn> {
        match self.first_turn.to_ascii_lowercase().as_str() {
            "white" => Ok(FirstTurn::Fixed(Color::White)),
            "black" => Ok(FirstTurn::Fixed(Color::Black)),
            "random" => Ok(FirstTurn::Random),
            other => Err(anyhow!(
                "invalid first_turn '{}', expected white, black or random",
                other
            )),
        }
    }

    pub fn move_cap(&self) -> Option<u32> {
        (self.max_moves > 0).then_some(self.max_moves)
    }

    /// A fresh game honouring `first_turn` and the move cap.
    pub fn new_game<R: Rng>(&self, rng: &mut R) -> Result<MillGame> {
        let game = match self.first_turn()? {
            FirstTurn::Fixed(color) => MillGame::new(color),
            FirstTurn::Random => MillGame::with_random_turn(rng),
        };
        Ok(game.with_max_moves(self.move_cap()))
    }

    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_iterations(self.search.iterations)
            .with_cp(self.search.cp)
            .with_parallel(self.search.parallel)
            .with_workers(self.search.workers)
            .with_max_rollout_depth(self.search.max_rollout_depth)
    }

    pub fn data_path(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            Path::new(&self.data_dir).join(file)
        }
    }

    pub fn table_path(&self) -> PathBuf {
        self.data_path(Path::new(&self.search.table))
    }

    pub fn rng(&self) -> ChaCha20Rng {
        match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        }
    }
}
