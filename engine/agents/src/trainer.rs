//! Epsilon-greedy Q-learning against a fixed opponent.
//!
//! The learner plays whole games; each of its decisions is updated once the
//! next decision state (or the end of the game) is known:
//!
//! ```text
//! Q(s, a) += lr * (r + discount * max_a' Q(s', a') - Q(s, a))
//! ```
//!
//! `r` is +1 for a win, -1 for a loss and 0 otherwise; `max_a' Q(s', a')`
//! is taken over the legal moves of the learner's next decision state and
//! is 0 when unknown or when the game ended.

use games_morris::{Color, MillGame, Move, State};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::error::AgentError;
use crate::reward_table::{LearningParams, RewardTable};

/// Outcome of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub episodes: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub entries: usize,
}

impl TrainingSummary {
    fn record(&mut self, learner: Color, winner: Option<Color>) {
        self.episodes += 1;
        match winner {
            Some(w) if w == learner => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }
}

/// Per-episode result handed to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    pub episode: u32,
    pub learner: Color,
    pub winner: Option<Color>,
    pub turns: u32,
}

pub struct QLearner {
    table: RewardTable,
    params: LearningParams,
    epsilon: f64,
    rng: ChaCha20Rng,
}

impl QLearner {
    pub fn new(table: RewardTable, params: LearningParams, epsilon: f64) -> Self {
        Self::with_rng(table, params, epsilon, ChaCha20Rng::from_entropy())
    }

    pub fn with_seed(table: RewardTable, params: LearningParams, epsilon: f64, seed: u64) -> Self {
        Self::with_rng(table, params, epsilon, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(table: RewardTable, params: LearningParams, epsilon: f64, rng: ChaCha20Rng) -> Self {
        Self {
            table,
            params,
            epsilon: epsilon.clamp(0.0, 1.0),
            rng,
        }
    }

    pub fn table(&self) -> &RewardTable {
        &self.table
    }

    pub fn into_table(self) -> RewardTable {
        self.table
    }

    /// Explore with probability epsilon, otherwise exploit the table.
    /// Unknown positions are explored.
    fn choose(&mut self, state: &State) -> Option<State> {
        if self.rng.gen::<f64>() >= self.epsilon {
            if let Some((next, _)) = self.table.best_successor(state) {
                return Some(next);
            }
        }
        state.shuffled_successors(&mut self.rng).next()
    }

    fn learn(&mut self, state: &State, mv: &Move, reward: f64, max_next: f64) {
        let value = self.table.update(state, mv, reward, max_next, &self.params);
        debug!(reward, max_next, value, "q update");
    }

    /// Play one game as `learner` against `opponent`, white moving first.
    pub fn play_episode(
        &mut self,
        opponent: &mut dyn Agent,
        learner: Color,
        max_moves: Option<u32>,
    ) -> Result<EpisodeOutcome, AgentError> {
        let mut game = MillGame::new(Color::White).with_max_moves(max_moves);
        let mut previous: Option<(State, Move)> = None;
        opponent.new_game();

        while !game.is_finished() {
            if game.turn() != learner {
                opponent.choose_and_apply(&mut game)?;
                continue;
            }

            let state = State::new(game.clone());
            if let Some((prev_state, prev_mv)) = previous.take() {
                let max_next = self.table.max_value(&state).unwrap_or(0.0);
                self.learn(&prev_state, &prev_mv, 0.0, max_next);
            }

            let Some(next) = self.choose(&state) else {
                break;
            };
            let mv = next.last_move().ok_or(AgentError::MissingMove)?;
            game = next.into_game();
            previous = Some((state, mv));
        }

        let winner = game.winner()?;
        if let Some((prev_state, prev_mv)) = previous {
            let reward = match winner {
                Some(w) if w == learner => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            };
            self.learn(&prev_state, &prev_mv, reward, 0.0);
        }

        Ok(EpisodeOutcome {
            episode: 0,
            learner,
            winner,
            turns: game.move_count(),
        })
    }

    /// Run `episodes` games, alternating the learner's colour, and report
    /// each finished episode to `on_episode`.
    pub fn train<F>(
        &mut self,
        opponent: &mut dyn Agent,
        episodes: u32,
        max_moves: Option<u32>,
        mut on_episode: F,
    ) -> Result<TrainingSummary, AgentError>
    where
        F: FnMut(&EpisodeOutcome),
    {
        let mut summary = TrainingSummary::default();

        for episode in 0..episodes {
            let learner = if episode % 2 == 0 {
                Color::White
            } else {
                Color::Black
            };
            let mut outcome = self.play_episode(opponent, learner, max_moves)?;
            outcome.episode = episode;
            summary.record(learner, outcome.winner);
            on_episode(&outcome);
        }

        summary.entries = self.table.len();
        info!(
            episodes = summary.episodes,
            wins = summary.wins,
            losses = summary.losses,
            draws = summary.draws,
            entries = summary.entries,
            opponent = opponent.name(),
            "Training complete"
        );
        Ok(summary)
    }
}
