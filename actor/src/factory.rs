//! Builds agents from their command-line kind.

use agents::{Agent, HybridAgent, MctsAgent, MinimaxAgent, QAgent, RandomAgent, RewardTable};
use anyhow::{Context, Result};
use rand::Rng;
use tracing::info;

use crate::config::{AgentKind, Config};

/// Build an agent of `kind`, drawing its seeds from `rng`.
///
/// `qtable` loads the configured reward table and falls back to a small
/// MCTS search for states the table has not seen.
pub fn build_agent<R: Rng>(kind: AgentKind, config: &Config, rng: &mut R) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match kind {
        AgentKind::Random => Box::new(RandomAgent::with_seed(rng.gen())),
        AgentKind::Minimax => Box::new(MinimaxAgent::new(config.search.max_depth)),
        AgentKind::Mcts => Box::new(MctsAgent::with_seed(config.mcts_config(), rng.gen())?),
        AgentKind::Hybrid => {
            let mcts = MctsAgent::with_seed(config.mcts_config(), rng.gen())?;
            Box::new(HybridAgent::new(
                mcts,
                MinimaxAgent::new(config.search.max_depth),
                config.search.mcts_limit,
            ))
        }
        AgentKind::Qtable => {
            let path = config.table_path();
            let table = RewardTable::load(&path)
                .with_context(|| format!("Failed to load reward table {}", path.display()))?;
            info!(path = %path.display(), entries = table.len(), "Loaded reward table");

            let fallback_config = config
                .mcts_config()
                .with_iterations(config.search.fallback_iterations);
            let fallback = MctsAgent::with_seed(fallback_config, rng.gen())?;
            Box::new(QAgent::new(table, Box::new(fallback)))
        }
    };
    Ok(agent)
}
