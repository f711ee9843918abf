//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_max_moves() -> u32 {
    defaults::max_moves()
}
fn d_first_turn() -> String {
    defaults::first_turn().into()
}
fn d_mcts_iterations() -> u32 {
    defaults::mcts_iterations()
}
fn d_cp() -> f64 {
    defaults::cp()
}
fn d_parallel() -> bool {
    defaults::parallel()
}
fn d_workers() -> usize {
    defaults::workers()
}
fn d_max_rollout_depth() -> u32 {
    defaults::max_rollout_depth()
}
fn d_max_depth() -> u32 {
    defaults::max_depth()
}
fn d_mcts_limit() -> u32 {
    defaults::mcts_limit()
}
fn d_lr() -> f64 {
    defaults::learning_rate()
}
fn d_discount() -> f64 {
    defaults::discount()
}
fn d_epsilon() -> f64 {
    defaults::epsilon()
}
fn d_initial_value() -> f64 {
    defaults::initial_value()
}
fn d_episodes() -> u32 {
    defaults::episodes()
}
fn d_fallback_iterations() -> u32 {
    defaults::fallback_iterations()
}
fn d_table_file() -> String {
    defaults::table_file().into()
}
fn d_arena_games() -> u32 {
    defaults::arena_games()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub minimax: MinimaxConfig,
    #[serde(default)]
    pub hybrid: HybridConfig,
    #[serde(default)]
    pub learning: LearningConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Game setup
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    /// Turns before a tie is declared; 0 disables the cap
    #[serde(default = "d_max_moves")]
    pub max_moves: u32,
    /// `white`, `black` or `random`
    #[serde(default = "d_first_turn")]
    pub first_turn: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_moves: defaults::max_moves(),
            first_turn: defaults::first_turn().into(),
        }
    }
}

impl GameConfig {
    /// The cap as the game expects it.
    pub fn move_cap(&self) -> Option<u32> {
        (self.max_moves > 0).then_some(self.max_moves)
    }
}

/// MCTS search settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_mcts_iterations")]
    pub iterations: u32,
    #[serde(default = "d_cp")]
    pub cp: f64,
    #[serde(default = "d_parallel")]
    pub parallel: bool,
    /// 0 = available parallelism
    #[serde(default = "d_workers")]
    pub workers: usize,
    #[serde(default = "d_max_rollout_depth")]
    pub max_rollout_depth: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::mcts_iterations(),
            cp: defaults::cp(),
            parallel: defaults::parallel(),
            workers: defaults::workers(),
            max_rollout_depth: defaults::max_rollout_depth(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MinimaxConfig {
    #[serde(default = "d_max_depth")]
    pub max_depth: u32,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            max_depth: defaults::max_depth(),
        }
    }
}

/// Hybrid agent: MCTS for the first `mcts_limit` decisions, then minimax
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HybridConfig {
    #[serde(default = "d_mcts_limit")]
    pub mcts_limit: u32,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            mcts_limit: defaults::mcts_limit(),
        }
    }
}

/// Reward-table learning
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LearningConfig {
    #[serde(default = "d_lr")]
    pub learning_rate: f64,
    #[serde(default = "d_discount")]
    pub discount: f64,
    #[serde(default = "d_epsilon")]
    pub epsilon: f64,
    #[serde(default = "d_initial_value")]
    pub initial_value: f64,
    #[serde(default = "d_episodes")]
    pub episodes: u32,
    #[serde(default = "d_fallback_iterations")]
    pub fallback_iterations: u32,
    /// Relative paths resolve against `common.data_dir`
    #[serde(default = "d_table_file")]
    pub table_file: String,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: defaults::learning_rate(),
            discount: defaults::discount(),
            epsilon: defaults::epsilon(),
            initial_value: defaults::initial_value(),
            episodes: defaults::episodes(),
            fallback_iterations: defaults::fallback_iterations(),
            table_file: defaults::table_file().into(),
        }
    }
}

/// Match series
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    #[serde(default = "d_arena_games")]
    pub games: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: defaults::arena_games(),
        }
    }
}
