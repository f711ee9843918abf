//! Shared configuration for the Morris engine crates and the actor.
//!
//! Each setting resolves in this order, first match wins:
//!
//! 1. `MORRIS_<SECTION>_<KEY>` environment variables
//! 2. the config file (`$MORRIS_CONFIG`, `./config.toml` or `../config.toml`)
//! 3. `config.defaults.toml`, compiled into the crate
//!
//! ```text
//! MORRIS_COMMON_DATA_DIR=/data
//! MORRIS_GAME_MAX_MOVES=200
//! MORRIS_MCTS_ITERATIONS=500
//! MORRIS_MCTS_PARALLEL=false
//! MORRIS_LEARNING_EPSILON=0.2
//! ```
//!
//! Values that fail to parse are logged and ignored.

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, locate_config, read_config, ConfigError,
    CONFIG_ENV, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
