//! The common agent contract.

use games_morris::{MillGame, Move, State};

use crate::error::AgentError;

/// Something that picks the next move of a game.
///
/// Implementors only provide [`Agent::propose`]; it must never mutate the
/// game it is given; the caller decides whether to apply the result.
pub trait Agent: Send {
    /// Short name used in logs and match statistics.
    fn name(&self) -> &str;

    /// Choose a successor of `game`. Returns `None` if the game is finished.
    fn propose(&mut self, game: &MillGame) -> Result<Option<State>, AgentError>;

    /// The move this agent would play, without touching `game`.
    fn peek(&mut self, game: &MillGame) -> Result<Option<Move>, AgentError> {
        match self.propose(game)? {
            Some(next) => next.last_move().map(Some).ok_or(AgentError::MissingMove),
            None => Ok(None),
        }
    }

    /// Choose a move and apply it to `game`.
    ///
    /// The move goes through [`MillGame::apply`], so the authoritative game
    /// re-validates it. Returns `None` if the game was already finished.
    fn choose_and_apply(&mut self, game: &mut MillGame) -> Result<Option<Move>, AgentError> {
        let Some(mv) = self.peek(game)? else {
            return Ok(None);
        };
        game.apply(&mv)?;
        Ok(Some(mv))
    }

    /// Called before the first decision of every game.
    fn new_game(&mut self) {}

    /// Free background resources. Idempotent; agents without any ignore it.
    fn release(&mut self) {}
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn propose(&mut self, game: &MillGame) -> Result<Option<State>, AgentError> {
        (**self).propose(game)
    }

    fn peek(&mut self, game: &MillGame) -> Result<Option<Move>, AgentError> {
        (**self).peek(game)
    }

    fn choose_and_apply(&mut self, game: &mut MillGame) -> Result<Option<Move>, AgentError> {
        (**self).choose_and_apply(game)
    }

    fn new_game(&mut self) {
        (**self).new_game()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
