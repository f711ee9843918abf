//! `actor play`: a series of games between two agents.

use agents::{play_game, Agent, MatchStats};
use anyhow::{Context, Result};
use games_morris::SuccessorRecord;
use tracing::{debug, info};

use crate::config::{Config, PlayArgs};
use crate::factory::build_agent;
use crate::stats::write_json;
use crate::transcript::Transcript;

pub fn run_play(config: &Config, args: &PlayArgs) -> Result<MatchStats> {
    let mut rng = config.rng();
    let mut white = build_agent(args.white, config, &mut rng)?;
    let mut black = build_agent(args.black, config, &mut rng)?;

    let result = play_series(config, args, white.as_mut(), black.as_mut(), &mut rng);

    // Worker pools go away on every exit path
    white.release();
    black.release();

    let stats = result?;
    info!(
        white = %stats.white,
        black = %stats.black,
        games = stats.games,
        white_wins = stats.white_wins,
        black_wins = stats.black_wins,
        draws = stats.draws,
        avg_turns = format!("{:.1}", stats.avg_turns),
        "Match complete"
    );

    if let Some(path) = &args.stats_file {
        let path = config.data_path(path);
        write_json(&path, &stats)?;
        info!(path = %path.display(), "Wrote match stats");
    }

    Ok(stats)
}

fn play_series(
    config: &Config,
    args: &PlayArgs,
    white: &mut dyn Agent,
    black: &mut dyn Agent,
    rng: &mut rand_chacha::ChaCha20Rng,
) -> Result<MatchStats> {
    let mut transcript = args
        .transcript
        .as_deref()
        .map(|path| Transcript::create(&config.data_path(path)))
        .transpose()?;
    let mut stats = MatchStats::new(white.name(), black.name());

    for index in 0..args.games {
        let game = config.new_game(rng)?;
        let mut write_error = None;

        let record = play_game(game, white, black, |turn| {
            debug!(
                "{} played {}\n{}",
                turn.color,
                turn.mv,
                turn.after.board()
            );
            let Some(transcript) = transcript.as_mut() else {
                return;
            };
            if write_error.is_none() {
                let line = SuccessorRecord::new(&turn.before, &turn.mv, &turn.after);
                write_error = transcript.write(&line).err();
            }
        })
        .with_context(|| format!("Game {} failed", index + 1))?;

        if let Some(e) = write_error {
            return Err(e);
        }

        info!(
            game = index + 1,
            winner = %record.winner.map_or_else(|| "draw".to_string(), |c| c.to_string()),
            turns = record.turns,
            "Game finished"
        );
        stats.record(&record);
    }

    if let Some(transcript) = transcript {
        let records = transcript.finish()?;
        info!(records, "Transcript written");
    }

    Ok(stats)
}
