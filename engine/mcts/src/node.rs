//! MCTS tree node representation.
//!
//! Each node wraps the [`State`] reached by one composite action from its
//! parent. Statistics are kept from the point of view of the side that played
//! that action, so a parent always maximises over its children.

use games_morris::{Color, State, Successors};
use rand::Rng;

use crate::search::SearchError;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Game snapshot at this node
    pub state: State,

    /// Side that played into this node (None for root)
    pub mover: Option<Color>,

    /// Number of rollouts that passed through this node
    pub visits: u32,

    /// Sum of rollout rewards from `mover`'s point of view
    pub reward_sum: f64,

    /// Expanded children, in expansion order
    pub children: Vec<NodeId>,

    /// Successors not yet expanded. Created on the first expansion attempt
    /// and dropped once exhausted.
    unexpanded: Option<Successors>,

    exhausted: bool,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(state: State) -> Self {
        Self::new(NodeId::NONE, state, None)
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, state: State, mover: Color) -> Self {
        Self::new(parent, state, Some(mover))
    }

    fn new(parent: NodeId, state: State, mover: Option<Color>) -> Self {
        let exhausted = state.is_terminal();
        Self {
            parent,
            state,
            mover,
            visits: 0,
            reward_sum: 0.0,
            children: Vec::new(),
            unexpanded: None,
            exhausted,
        }
    }

    /// Terminal iff the wrapped game is finished. Terminal nodes never expand.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.exhausted
    }

    /// Pull the next unexpanded successor, shuffling on first use.
    pub(crate) fn next_unexpanded<R: Rng>(&mut self, rng: &mut R) -> Option<State> {
        if self.exhausted {
            return None;
        }
        let successors = self
            .unexpanded
            .get_or_insert_with(|| self.state.shuffled_successors(rng));
        match successors.next() {
            Some(state) => Some(state),
            None => {
                self.exhausted = true;
                self.unexpanded = None;
                None
            }
        }
    }

    /// Mean reward. Undefined before the first visit.
    pub fn avg_reward(&self) -> Result<f64, SearchError> {
        if self.visits == 0 {
            return Err(SearchError::Unvisited);
        }
        Ok(self.reward_sum / self.visits as f64)
    }

    /// UCB1 score used when the parent picks among expanded children.
    ///
    /// `avg + 2 * cp * sqrt(2 * ln(N_parent) / N)`. Undefined at the root.
    pub fn uct(&self, parent_visits: u32, cp: f64) -> Result<f64, SearchError> {
        if self.parent.is_none() {
            return Err(SearchError::RootHasNoUct);
        }
        let avg = self.avg_reward()?;
        let bound = 2.0 * cp * (2.0 * (parent_visits as f64).ln() / self.visits as f64).sqrt();
        Ok(avg + bound)
    }
}
