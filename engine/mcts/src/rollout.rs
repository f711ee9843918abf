//! Random playouts and the worker pool that replicates them.

use games_morris::{Color, MillGame, State};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::search::SearchError;

/// Play uniformly random moves from `game` until it ends.
///
/// Returns +1 if `perspective` won, -1 if it lost and 0 for a tie. The
/// playout is cut short as a tie after `max_depth` further turns.
pub fn rollout<R: Rng>(
    game: &MillGame,
    perspective: Color,
    max_depth: u32,
    rng: &mut R,
) -> Result<f64, SearchError> {
    let mut game = game.clone();
    let cap = game.move_count().saturating_add(max_depth);
    if game.max_moves().map_or(true, |limit| limit > cap) {
        game.set_max_moves(Some(cap));
    }

    while !game.is_finished() {
        let state = State::new(game);
        match state.shuffled_successors(rng).next() {
            Some(next) => game = next.into_game(),
            None => {
                return Err(SearchError::StalledRollout(format!(
                    "{} has no successor at turn {}",
                    state.game().turn(),
                    state.game().move_count()
                )))
            }
        }
    }

    Ok(match game.winner()? {
        Some(winner) if winner == perspective => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    })
}

/// Runs one rollout per worker for every simulation step.
///
/// Each worker gets its own generator seeded from the caller's, so a seeded
/// search stays reproducible regardless of scheduling.
pub struct RolloutPool {
    pool: Option<rayon::ThreadPool>,
    workers: usize,
}

impl RolloutPool {
    /// Build a pool with `workers` threads. A single worker runs inline.
    pub fn new(workers: usize) -> Result<Self, SearchError> {
        let workers = workers.max(1);
        let pool = if workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("rollout-{i}"))
                .build()
                .map_err(|e| SearchError::WorkerPool(e.to_string()))?;
            debug!(workers, "Rollout pool started");
            Some(pool)
        } else {
            None
        };
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Whether worker threads are still held.
    pub fn is_active(&self) -> bool {
        self.pool.is_some()
    }

    /// Run the replicated rollouts and return `(reward_sum, rollouts)`.
    ///
    /// A released pool falls back to a single inline rollout.
    pub fn simulate(
        &self,
        game: &MillGame,
        perspective: Color,
        max_depth: u32,
        rng: &mut ChaCha20Rng,
    ) -> Result<(f64, u32), SearchError> {
        let Some(pool) = &self.pool else {
            return Ok((rollout(game, perspective, max_depth, rng)?, 1));
        };

        let seeds: Vec<u64> = (0..self.workers).map(|_| rng.gen()).collect();
        let rewards = pool.install(|| {
            seeds
                .into_par_iter()
                .map(|seed| {
                    let mut rng = ChaCha20Rng::seed_from_u64(seed);
                    rollout(game, perspective, max_depth, &mut rng)
                })
                .collect::<Result<Vec<f64>, SearchError>>()
        })?;

        Ok((rewards.iter().sum(), rewards.len() as u32))
    }

    /// Shut the worker threads down. Safe to call more than once.
    pub fn release(&mut self) {
        if self.pool.take().is_some() {
            debug!(workers = self.workers, "Rollout pool released");
        }
    }
}

impl Drop for RolloutPool {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for RolloutPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolloutPool")
            .field("workers", &self.workers)
            .field("active", &self.is_active())
            .finish()
    }
}
