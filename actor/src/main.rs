//! Actor - match runner and reward-table trainer for Nine Men's Morris
//!
//! Two subcommands:
//! 1. `play` runs a series of games between two agents, optionally writing a
//!    JSON-lines transcript and JSON match statistics
//! 2. `train` runs Q-learning episodes against an opponent agent and saves
//!    the reward table to the data directory

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod config;
mod factory;
mod play;
mod stats;
mod train;
mod transcript;

use crate::config::{Command, Config};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, data_dir = %config.data_dir, "Tracing initialized");

    let result = match &config.command {
        Command::Play(args) => play::run_play(&config, args).map(|_| ()),
        Command::Train(args) => train::run_train(&config, args).map(|_| ()),
    };

    match result {
        Ok(()) => {
            info!("Actor completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Actor failed: {:#}", e);
            Err(e)
        }
    }
}
