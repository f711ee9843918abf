//! Locating, reading and overriding the configuration.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MORRIS_CONFIG";

/// Places tried, in order, when `MORRIS_CONFIG` is unset or missing.
pub const CONFIG_SEARCH_PATHS: &[&str] = &["config.toml", "../config.toml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// The config file `load_config` would use, if any.
pub fn locate_config() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(explicit);
        if path.exists() {
            return Some(path);
        }
        warn!(path = %path.display(), "{} points at a missing file, searching defaults", CONFIG_ENV);
    }

    CONFIG_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Load the central configuration.
///
/// Uses the file from [`locate_config`], or the built-in defaults when there
/// is none. Environment overrides are applied last in every case.
pub fn load_config() -> CentralConfig {
    match locate_config() {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_from_path(&path)
        }
        None => {
            debug!("No config.toml found, using built-in defaults");
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Parse a config file without applying environment overrides.
pub fn read_config(path: &Path) -> Result<CentralConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path` with environment overrides; an unreadable or invalid file
/// is reported and replaced by the defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    let config = read_config(path).unwrap_or_else(|e| {
        warn!("{}, using defaults", e);
        CentralConfig::default()
    });
    apply_env_overrides(config)
}

macro_rules! override_from_env {
    ($config:ident, $section:ident . $field:ident, $key:literal) => {
        if let Ok(value) = std::env::var($key) {
            debug!(key = $key, "config override");
            $config.$section.$field = value;
        }
    };
    ($config:ident, $section:ident . $field:ident, $key:literal, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(value) => {
                    debug!(key = $key, value = %raw, "config override");
                    $config.$section.$field = value;
                }
                Err(_) => warn!(key = $key, value = %raw, "Ignoring unparseable override"),
            }
        }
    };
}

/// Apply `MORRIS_<SECTION>_<KEY>` environment overrides.
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    override_from_env!(config, common.data_dir, "MORRIS_COMMON_DATA_DIR");
    override_from_env!(config, common.log_level, "MORRIS_COMMON_LOG_LEVEL");

    override_from_env!(config, game.max_moves, "MORRIS_GAME_MAX_MOVES", parse);
    override_from_env!(config, game.first_turn, "MORRIS_GAME_FIRST_TURN");

    override_from_env!(config, mcts.iterations, "MORRIS_MCTS_ITERATIONS", parse);
    override_from_env!(config, mcts.cp, "MORRIS_MCTS_CP", parse);
    override_from_env!(config, mcts.parallel, "MORRIS_MCTS_PARALLEL", parse);
    override_from_env!(config, mcts.workers, "MORRIS_MCTS_WORKERS", parse);
    override_from_env!(config, mcts.max_rollout_depth, "MORRIS_MCTS_MAX_ROLLOUT_DEPTH", parse);

    override_from_env!(config, minimax.max_depth, "MORRIS_MINIMAX_MAX_DEPTH", parse);
    override_from_env!(config, hybrid.mcts_limit, "MORRIS_HYBRID_MCTS_LIMIT", parse);

    override_from_env!(config, learning.learning_rate, "MORRIS_LEARNING_LEARNING_RATE", parse);
    override_from_env!(config, learning.discount, "MORRIS_LEARNING_DISCOUNT", parse);
    override_from_env!(config, learning.epsilon, "MORRIS_LEARNING_EPSILON", parse);
    override_from_env!(config, learning.initial_value, "MORRIS_LEARNING_INITIAL_VALUE", parse);
    override_from_env!(config, learning.episodes, "MORRIS_LEARNING_EPISODES", parse);
    override_from_env!(
        config,
        learning.fallback_iterations,
        "MORRIS_LEARNING_FALLBACK_ITERATIONS",
        parse
    );
    override_from_env!(config, learning.table_file, "MORRIS_LEARNING_TABLE_FILE");

    override_from_env!(config, arena.games, "MORRIS_ARENA_GAMES", parse);

    config
}
