//! Depth-bounded minimax with alpha-beta pruning.
//!
//! Successors are enumerated in canonical order, so a given position and
//! depth always yield the same move.

use games_morris::{Color, MillGame, PreconditionError, State};
use tracing::debug;

use crate::agent::Agent;
use crate::error::AgentError;

/// Score of a won game. A game ends once a side is down to two pieces, so no
/// piece difference can reach it.
pub const WIN_SCORE: i32 = 7;

#[derive(Debug, Clone)]
pub struct MinimaxAgent {
    max_depth: u32,
}

impl MinimaxAgent {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Best successor and its value for the side to move.
    ///
    /// Ties keep the first successor in canonical order.
    pub fn search(&self, game: &MillGame) -> Result<Option<(State, i32)>, PreconditionError> {
        if game.is_finished() {
            return Ok(None);
        }
        let player = game.turn();
        let mut best: Option<(State, i32)> = None;

        for successor in State::new(game.clone()).successors() {
            let alpha = best.as_ref().map_or(i32::MIN, |(_, value)| *value);
            let value = min_value(&successor, player, alpha, i32::MAX, self.max_depth)?;
            if best.as_ref().map_or(true, |(_, best_value)| value > *best_value) {
                best = Some((successor, value));
            }
        }

        Ok(best)
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> &str {
        "minimax"
    }

    fn propose(&mut self, game: &MillGame) -> Result<Option<State>, AgentError> {
        let best = self.search(game)?;
        if let Some((state, value)) = &best {
            debug!(
                depth = self.max_depth,
                value,
                mv = ?state.last_move(),
                "minimax decision"
            );
        }
        Ok(best.map(|(state, _)| state))
    }
}

/// Static value of `game` for `player`.
///
/// Finished games score +/-[`WIN_SCORE`] or 0 for a tie; otherwise the
/// difference in pieces still in play (on the board or yet to be placed).
pub fn evaluate(game: &MillGame, player: Color) -> Result<i32, PreconditionError> {
    if game.is_finished() {
        return Ok(match game.winner()? {
            Some(winner) if winner == player => WIN_SCORE,
            Some(_) => -WIN_SCORE,
            None => 0,
        });
    }
    let own = game.player(player).alive as i32;
    let other = game.player(player.opponent()).alive as i32;
    Ok(own - other)
}

fn max_value(
    state: &State,
    player: Color,
    mut alpha: i32,
    beta: i32,
    depth: u32,
) -> Result<i32, PreconditionError> {
    if depth == 0 || state.is_terminal() {
        return evaluate(state.game(), player);
    }

    let mut value = i32::MIN;
    for successor in state.successors() {
        value = value.max(min_value(&successor, player, alpha, beta, depth - 1)?);
        alpha = alpha.max(value);
        if alpha >= beta {
            break;
        }
    }
    Ok(value)
}

fn min_value(
    state: &State,
    player: Color,
    alpha: i32,
    mut beta: i32,
    depth: u32,
) -> Result<i32, PreconditionError> {
    if depth == 0 || state.is_terminal() {
        return evaluate(state.game(), player);
    }

    let mut value = i32::MAX;
    for successor in state.successors() {
        value = value.min(max_value(&successor, player, alpha, beta, depth - 1)?);
        beta = beta.min(value);
        if alpha >= beta {
            break;
        }
    }
    Ok(value)
}
