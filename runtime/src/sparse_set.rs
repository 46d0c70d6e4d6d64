//! Provides a sparse set of state ids for tracking active states, as an
//! alternative to HashSets.

extern crate alloc;
use alloc::{vec, vec::Vec};

use crate::StateId;

/// A set of [StateId]s with constant-time insert, membership and clear.
///
/// Members iterate in insertion order, which keeps simulations over the same
/// input deterministic.
#[derive(Clone, Default)]
pub struct StateSet {
    dense: Vec<StateId>,
    sparse: Vec<usize>,
}

impl StateSet {
    /// Initializes a new set taking a value representing the number of states
    /// in the automaton it tracks.
    #[must_use]
    pub fn with_capacity(state_cnt: usize) -> Self {
        Self {
            dense: Vec::with_capacity(state_cnt),
            sparse: vec![0; state_cnt],
        }
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the number of states the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.sparse.len()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Inserts a state into the set, returning `true` if it was not already
    /// a member.
    pub fn insert(&mut self, state: StateId) -> bool {
        if self.contains(state) {
            return false;
        }

        let idx = state.as_usize();
        if self.sparse.len() <= idx {
            // double the size.
            self.sparse.resize((idx + 1) * 2, 0);
        }

        self.sparse[idx] = self.dense.len();
        self.dense.push(state);
        true
    }

    /// Returns `true` if the set contains a state.
    pub fn contains(&self, state: StateId) -> bool {
        self.sparse
            .get(state.as_usize())
            .map(|&dense_idx| self.dense.get(dense_idx) == Some(&state))
            // if none, the bounds of the set are exceeded and thus doesn't
            // contain the value.
            .unwrap_or(false)
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.dense.clear();
    }

    /// Iterates over the members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.dense.iter().copied()
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|state| other.contains(state))
    }
}

impl Eq for StateSet {}

impl FromIterator<StateId> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateId>>(iter: T) -> Self {
        let mut set = StateSet::default();
        for state in iter {
            set.insert(state);
        }

        set
    }
}

impl core::fmt::Debug for StateSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.dense.iter()).finish()
    }
}
