//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary and the
//! checked-in file can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    game: GameDefaults,
    mcts: MctsDefaults,
    minimax: MinimaxDefaults,
    hybrid: HybridDefaults,
    learning: LearningDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    data_dir: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct GameDefaults {
    max_moves: u32,
    first_turn: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    iterations: u32,
    cp: f64,
    parallel: bool,
    workers: usize,
    max_rollout_depth: u32,
}

#[derive(Debug, Deserialize)]
struct MinimaxDefaults {
    max_depth: u32,
}

#[derive(Debug, Deserialize)]
struct HybridDefaults {
    mcts_limit: u32,
}

#[derive(Debug, Deserialize)]
struct LearningDefaults {
    learning_rate: f64,
    discount: f64,
    epsilon: f64,
    initial_value: f64,
    episodes: u32,
    fallback_iterations: u32,
    table_file: String,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    games: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Game
pub fn max_moves() -> u32 {
    DEFAULTS.game.max_moves
}
pub fn first_turn() -> &'static str {
    &DEFAULTS.game.first_turn
}

// MCTS
pub fn mcts_iterations() -> u32 {
    DEFAULTS.mcts.iterations
}
pub fn cp() -> f64 {
    DEFAULTS.mcts.cp
}
pub fn parallel() -> bool {
    DEFAULTS.mcts.parallel
}
pub fn workers() -> usize {
    DEFAULTS.mcts.workers
}
pub fn max_rollout_depth() -> u32 {
    DEFAULTS.mcts.max_rollout_depth
}

// Minimax
pub fn max_depth() -> u32 {
    DEFAULTS.minimax.max_depth
}

// Hybrid
pub fn mcts_limit() -> u32 {
    DEFAULTS.hybrid.mcts_limit
}

// Learning
pub fn learning_rate() -> f64 {
    DEFAULTS.learning.learning_rate
}
pub fn discount() -> f64 {
    DEFAULTS.learning.discount
}
pub fn epsilon() -> f64 {
    DEFAULTS.learning.epsilon
}
pub fn initial_value() -> f64 {
    DEFAULTS.learning.initial_value
}
pub fn episodes() -> u32 {
    DEFAULTS.learning.episodes
}
pub fn fallback_iterations() -> u32 {
    DEFAULTS.learning.fallback_iterations
}
pub fn table_file() -> &'static str {
    &DEFAULTS.learning.table_file
}

// Arena
pub fn arena_games() -> u32 {
    DEFAULTS.arena.games
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        // Just accessing these will verify the TOML parses correctly
        assert_eq!(data_dir(), "./data");
        assert_eq!(log_level(), "info");
        assert_eq!(first_turn(), "white");
    }

    #[test]
    fn test_search_defaults() {
        assert_eq!(mcts_iterations(), 50);
        assert!((cp() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(parallel());
        assert_eq!(workers(), 0);
        assert_eq!(max_depth(), 4);
        assert_eq!(mcts_limit(), 10);
    }

    #[test]
    fn test_learning_defaults() {
        assert!((learning_rate() - 0.1).abs() < f64::EPSILON);
        assert!((discount() - 0.9).abs() < f64::EPSILON);
        assert_eq!(initial_value(), 0.0);
        assert_eq!(fallback_iterations(), 20);
        assert_eq!(table_file(), "reward_table.json");
    }

    #[test]
    fn test_game_defaults() {
        assert_eq!(max_moves(), 150);
        assert_eq!(arena_games(), 50);
    }
}
