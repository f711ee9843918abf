//! Agent-vs-agent games and match statistics.

use std::time::{Duration, Instant};

use games_morris::{Color, MillGame, Move};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::Agent;
use crate::error::AgentError;

/// One decision made during a game.
#[derive(Debug, Clone)]
pub struct Turn {
    pub color: Color,
    pub before: MillGame,
    pub mv: Move,
    pub after: MillGame,
    pub elapsed: Duration,
}

/// Result of a single game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub winner: Option<Color>,
    pub turns: u32,
    /// Time spent deciding, per colour.
    pub decision_time: [Duration; 2],
    /// Decisions made, per colour.
    pub decisions: [u32; 2],
}

impl GameRecord {
    fn mean_decision_time(&self, color: Color) -> Option<Duration> {
        let n = self.decisions[color.index()];
        (n > 0).then(|| self.decision_time[color.index()] / n)
    }
}

/// Play `game` to the end, `white` and `black` alternating as the turn says.
///
/// `on_turn` sees every applied move, e.g. to write a transcript.
pub fn play_game<F>(
    mut game: MillGame,
    white: &mut dyn Agent,
    black: &mut dyn Agent,
    mut on_turn: F,
) -> Result<GameRecord, AgentError>
where
    F: FnMut(&Turn),
{
    let mut decision_time = [Duration::ZERO; 2];
    let mut decisions = [0u32; 2];
    white.new_game();
    black.new_game();

    while !game.is_finished() {
        let color = game.turn();
        let agent: &mut dyn Agent = match color {
            Color::White => &mut *white,
            Color::Black => &mut *black,
        };

        let before = game.clone();
        let start = Instant::now();
        let Some(mv) = agent.choose_and_apply(&mut game)? else {
            break;
        };
        let elapsed = start.elapsed();

        decision_time[color.index()] += elapsed;
        decisions[color.index()] += 1;
        debug!(agent = agent.name(), %color, %mv, "turn");

        on_turn(&Turn {
            color,
            before,
            mv,
            after: game.clone(),
            elapsed,
        });
    }

    Ok(GameRecord {
        winner: game.winner()?,
        turns: game.move_count(),
        decision_time,
        decisions,
    })
}

/// Aggregated results of a series of games between two agents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub white: String,
    pub black: String,
    pub games: u32,
    pub white_wins: u32,
    pub black_wins: u32,
    pub draws: u32,
    pub avg_turns: f64,
    /// Mean over games of the mean decision time, in milliseconds.
    pub mean_time_white_ms: f64,
    pub mean_time_black_ms: f64,
}

impl MatchStats {
    pub fn new(white: &str, black: &str) -> Self {
        Self {
            white: white.to_string(),
            black: black.to_string(),
            ..Self::default()
        }
    }

    /// Fold one finished game into the running averages.
    pub fn record(&mut self, game: &GameRecord) {
        let n = self.games as f64;
        let running = |avg: f64, value: f64| (avg * n + value) / (n + 1.0);
        let millis = |d: Option<Duration>| d.map_or(0.0, |d| d.as_secs_f64() * 1000.0);

        self.avg_turns = running(self.avg_turns, game.turns as f64);
        self.mean_time_white_ms = running(
            self.mean_time_white_ms,
            millis(game.mean_decision_time(Color::White)),
        );
        self.mean_time_black_ms = running(
            self.mean_time_black_ms,
            millis(game.mean_decision_time(Color::Black)),
        );

        self.games += 1;
        match game.winner {
            Some(Color::White) => self.white_wins += 1,
            Some(Color::Black) => self.black_wins += 1,
            None => self.draws += 1,
        }
    }
}

/// Play `games` games with `white` always moving first and a fresh game
/// capped at `max_moves` each time.
pub fn play_match<F>(
    white: &mut dyn Agent,
    black: &mut dyn Agent,
    games: u32,
    max_moves: Option<u32>,
    mut on_game: F,
) -> Result<MatchStats, AgentError>
where
    F: FnMut(u32, &GameRecord),
{
    let mut stats = MatchStats::new(white.name(), black.name());

    for index in 0..games {
        let game = MillGame::new(Color::White).with_max_moves(max_moves);
        let record = play_game(game, white, black, |_| {})?;
        info!(
            game = index + 1,
            winner = %record.winner.map_or_else(|| "draw".to_string(), |c| c.to_string()),
            turns = record.turns,
            "Game finished"
        );
        stats.record(&record);
        on_game(index, &record);
    }

    Ok(stats)
}
