//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices; a node's parent is an index rather
//! than a back-pointer into the game state.

use games_morris::{Color, State};
use rand::Rng;

use crate::node::{MctsNode, NodeId};
use crate::search::SearchError;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,

    /// Side to move at the root. Rollout rewards are reported from this side.
    perspective: Color,
}

impl MctsTree {
    /// Create a new tree rooted at the given state.
    pub fn new(root_state: State) -> Self {
        let perspective = root_state.game().turn();
        Self {
            nodes: vec![MctsNode::new_root(root_state)],
            root: NodeId(0),
            perspective,
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn perspective(&self) -> Color {
        self.perspective
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expand one more child of `node_id`, if any successor is left.
    ///
    /// The node's successors are shuffled on first use, so repeated calls
    /// expand children in random order without generating them all up front.
    pub fn expand_next<R: Rng>(&mut self, node_id: NodeId, rng: &mut R) -> Option<NodeId> {
        let node = self.get_mut(node_id);
        let mover = node.state.game().turn();
        let state = node.next_unexpanded(rng)?;

        let child_id = self.allocate(MctsNode::new_child(node_id, state, mover));
        self.get_mut(node_id).children.push(child_id);
        Some(child_id)
    }

    /// Select the child of a node with the highest UCT score.
    /// Ties go to the earliest expanded child.
    ///
    /// A child that was expanded but never backed up (its rollout failed)
    /// has no score yet and is returned before any scored sibling.
    pub fn select_child(&self, node_id: NodeId, cp: f64) -> Result<NodeId, SearchError> {
        let node = self.get(node_id);
        if let Some(&unvisited) = node.children.iter().find(|&&id| self.get(id).visits == 0) {
            return Ok(unvisited);
        }

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = self.get(child_id).uct(node.visits, cp)?;
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id).ok_or(SearchError::NoExpandedChildren)
    }

    /// Add `reward_sum` over `visits` rollouts from a leaf up to the root.
    ///
    /// `reward_sum` is expressed from the root player's point of view. Each
    /// node records it from its mover's point of view, which flips the sign
    /// on every ply that the opponent played into.
    pub fn backpropagate(&mut self, leaf_id: NodeId, reward_sum: f64, visits: u32) {
        let perspective = self.perspective;
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visits += visits;
            node.reward_sum += match node.mover {
                Some(mover) if mover != perspective => -reward_sum,
                _ => reward_sum,
            };
            current_id = node.parent;
        }
    }

    /// Root child with the highest mean reward. Ties go to the earliest
    /// expanded child.
    pub fn best_child(&self) -> Result<NodeId, SearchError> {
        let root = self.get(self.root);
        if root.children.is_empty() {
            return Err(SearchError::NoExpandedChildren);
        }

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &root.children {
            let child = self.get(child_id);
            if child.visits == 0 {
                continue;
            }
            let avg = child.avg_reward()?;
            if best.map_or(true, |(_, best_avg)| avg > best_avg) {
                best = Some((child_id, avg));
            }
        }
        best.map(|(id, _)| id).ok_or(SearchError::Unvisited)
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_value: root.avg_reward().unwrap_or(0.0),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|id| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
