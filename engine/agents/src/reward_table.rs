//! Tabular state-action values.
//!
//! Keys are the canonical state fingerprint and the packed move, so the
//! same board situation reached by different move orders shares entries.
//! Missing entries are never materialized by reads.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use games_morris::{Move, State};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TableError;
use crate::persist::write_atomic;

/// Parameters of the temporal-difference update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningParams {
    pub learning_rate: f64,
    pub discount: f64,
    /// Value assumed for an entry that has never been written.
    pub initial_value: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            initial_value: 0.0,
        }
    }
}

/// `{state_fingerprint: {packed_move: value}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardTable {
    entries: HashMap<String, HashMap<u32, f64>>,
}

impl RewardTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored (state, move) entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    /// Number of distinct states with at least one entry.
    pub fn states(&self) -> usize {
        self.entries.len()
    }

    /// Every stored value, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.values().flat_map(|moves| moves.values().copied())
    }

    pub fn get(&self, state: &State, mv: &Move) -> Option<f64> {
        self.get_by_key(&state.fingerprint(), mv.packed())
    }

    pub fn get_by_key(&self, fingerprint: &str, packed: u32) -> Option<f64> {
        self.entries.get(fingerprint)?.get(&packed).copied()
    }

    /// Apply `old + lr * (reward + discount * max_next - old)` and store the
    /// result. Returns the new value.
    pub fn update(
        &mut self,
        state: &State,
        mv: &Move,
        reward: f64,
        max_next: f64,
        params: &LearningParams,
    ) -> f64 {
        let slot = self
            .entries
            .entry(state.fingerprint())
            .or_default()
            .entry(mv.packed())
            .or_insert(params.initial_value);
        let old = *slot;
        *slot = old + params.learning_rate * (reward + params.discount * max_next - old);
        *slot
    }

    /// Highest-valued legal successor of `state` that has an entry.
    ///
    /// Only moves legal from this exact state are considered. Ties keep the
    /// first successor in canonical order.
    pub fn best_successor(&self, state: &State) -> Option<(State, f64)> {
        let moves = self.entries.get(&state.fingerprint())?;
        let mut best: Option<(State, f64)> = None;
        for successor in state.successors() {
            let Some(value) = successor
                .last_move()
                .and_then(|mv| moves.get(&mv.packed()).copied())
            else {
                continue;
            };
            if best.as_ref().map_or(true, |(_, best_value)| value > *best_value) {
                best = Some((successor, value));
            }
        }
        best
    }

    pub fn best_move(&self, state: &State) -> Option<Move> {
        self.best_successor(state)
            .and_then(|(successor, _)| successor.last_move())
    }

    /// Highest stored value among the legal moves of `state`.
    pub fn max_value(&self, state: &State) -> Option<f64> {
        self.best_successor(state).map(|(_, value)| value)
    }

    /// Write the table as JSON (atomic write-then-rename).
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let json = serde_json::to_string(self)?;
        write_atomic(path, json.as_bytes()).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), entries = self.len(), "Saved reward table");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let content = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table: Self = serde_json::from_str(&content)?;
        debug!(path = %path.display(), entries = table.len(), "Loaded reward table");
        Ok(table)
    }

    /// Load `path`, or start empty if it does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, TableError> {
        if !path.exists() {
            info!(path = %path.display(), "No reward table found, starting empty");
            return Ok(Self::new());
        }
        Self::load(path)
    }
}
