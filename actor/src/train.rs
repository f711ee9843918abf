//! `actor train`: Q-learning of a reward table against an opponent agent.

use agents::{LearningParams, QLearner, RewardTable, TrainingSummary};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use tracing::info;

use crate::config::{Config, TrainArgs};
use crate::factory::build_agent;
use crate::stats::write_json;

pub fn run_train(config: &Config, args: &TrainArgs) -> Result<TrainingSummary> {
    let table_path = config.table_path();
    let table = RewardTable::load_or_default(&table_path)
        .with_context(|| format!("Failed to read reward table {}", table_path.display()))?;
    info!(
        path = %table_path.display(),
        entries = table.len(),
        episodes = args.episodes,
        opponent = ?args.opponent,
        "Starting training"
    );

    let params = LearningParams {
        learning_rate: args.learning_rate,
        discount: args.discount,
        initial_value: args.initial_value,
    };

    let mut rng = config.rng();
    let mut opponent = build_agent(args.opponent, config, &mut rng)?;
    let mut learner = QLearner::with_seed(table, params, args.epsilon, rng.gen());

    // Only draw a progress bar when stderr is a TTY
    let progress = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        let pb = ProgressBar::new(args.episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} episodes ({eta}) {msg}")
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut wins = 0u32;
    let result = learner.train(opponent.as_mut(), args.episodes, config.move_cap(), |outcome| {
        if outcome.winner == Some(outcome.learner) {
            wins += 1;
        }
        if let Some(pb) = &progress {
            pb.inc(1);
            pb.set_message(format!("{} wins", wins));
        }
    });
    opponent.release();

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let summary = result?;

    learner
        .table()
        .save(&table_path)
        .with_context(|| format!("Failed to save reward table {}", table_path.display()))?;
    info!(path = %table_path.display(), entries = summary.entries, "Saved reward table");

    if let Some(path) = &args.stats_file {
        let path = config.data_path(path);
        write_json(&path, &summary)?;
        info!(path = %path.display(), "Wrote training summary");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentKind, Command, SearchArgs};
    use tempfile::tempdir;

    fn config(data_dir: &str, args: TrainArgs) -> Config {
        Config {
            log_level: "info".into(),
            data_dir: data_dir.into(),
            max_moves: 40,
            first_turn: "white".into(),
            seed: Some(5),
            search: SearchArgs {
                iterations: 5,
                cp: std::f64::consts::FRAC_1_SQRT_2,
                parallel: false,
                workers: 0,
                max_rollout_depth: 30,
                max_depth: 1,
                mcts_limit: 2,
                fallback_iterations: 5,
                table: "tables/reward.json".into(),
            },
            command: Command::Train(args),
        }
    }

    fn args(episodes: u32) -> TrainArgs {
        TrainArgs {
            episodes,
            opponent: AgentKind::Random,
            epsilon: 0.2,
            learning_rate: 0.1,
            discount: 0.9,
            initial_value: 0.0,
            stats_file: Some("train.json".into()),
        }
    }

    #[test]
    fn test_train_saves_table_and_summary() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path().to_str().unwrap(), args(4));

        let summary = run_train(&cfg, &args(4)).unwrap();
        assert_eq!(summary.episodes, 4);
        assert_eq!(summary.wins + summary.losses + summary.draws, 4);

        let table = RewardTable::load(&cfg.table_path()).unwrap();
        assert_eq!(table.len(), summary.entries);
        assert!(!table.is_empty());
        assert!(dir.path().join("train.json").exists());
    }

    #[test]
    fn test_training_resumes_from_saved_table() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path().to_str().unwrap(), args(2));

        let first = run_train(&cfg, &args(2)).unwrap();
        let second = run_train(&cfg, &args(2)).unwrap();
        assert!(second.entries >= first.entries);
    }
}
