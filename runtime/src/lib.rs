//! Provides the automaton model and the set-based simulation used to match
//! input against a nondeterministic finite automaton.
//!
//! # Example
//!
//! ```rust
//! use nfa_runtime::{Condition, NfaBuilder, run};
//!
//! // approximate to `ab*`
//! let mut builder = NfaBuilder::new();
//! let [start, a, b] = [builder.add_state(), builder.add_state(), builder.add_state()];
//!
//! builder.add_transition(start, Condition::Literal('a'), a).unwrap();
//! builder.add_transition(a, Condition::Epsilon, b).unwrap();
//! builder.add_transition(b, Condition::Literal('b'), b).unwrap();
//! builder.set_start(start).unwrap();
//! builder.set_accepting(b).unwrap();
//!
//! let nfa = builder.finalize().unwrap();
//!
//! assert!(run(&nfa, "abbb"));
//! assert!(!run(&nfa, "ba"));
//! ```

pub mod builder;
mod charset;
pub mod simulation;
mod sparse_set;
pub mod text;

use std::fmt::Display;

pub use builder::{BuildError, BuildErrorKind, NfaBuilder};
pub use charset::{CharacterAlphabet, CharacterClass, CharacterSet};
pub use simulation::{find, find_all, run, trace, Path, Simulation, Span};
pub use sparse_set::StateSet;

/// An opaque identifier for a state in an [Nfa].
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for StateId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The predicate guarding a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Traversable without consuming input.
    Epsilon,
    /// Consumes exactly the given character.
    Literal(char),
    /// Consumes any character in the inclusive range.
    Range(std::ops::RangeInclusive<char>),
    /// Consumes any member of a shorthand class.
    Class(CharacterClass),
    /// Consumes any character satisfying the set's membership.
    Set(CharacterSet),
}

impl Condition {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Self::Epsilon)
    }

    /// Returns `true` if consuming `value` may cross this transition. Epsilon
    /// conditions never consume.
    #[inline]
    pub fn matches(&self, value: char) -> bool {
        match self {
            Condition::Epsilon => false,
            Condition::Literal(c) => *c == value,
            Condition::Range(r) => r.contains(&value),
            Condition::Class(class) => class.contains(value),
            Condition::Set(set) => set.contains(value),
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Epsilon => write!(f, "\\e"),
            Condition::Literal(c) => write!(f, "{}", c),
            Condition::Range(r) => write!(f, "{}-{}", r.start(), r.end()),
            Condition::Class(class) => Display::fmt(class, f),
            Condition::Set(set) => Display::fmt(set, f),
        }
    }
}

/// A directed edge to `target`, stored with its source state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    condition: Condition,
    target: StateId,
}

impl Transition {
    #[must_use]
    pub fn new(condition: Condition, target: StateId) -> Self {
        Self { condition, target }
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn target(&self) -> StateId {
        self.target
    }
}

/// An immutable nondeterministic finite automaton.
///
/// Instances are only produced by [NfaBuilder::finalize], which guarantees
/// that every state referenced by a transition, and the start state, exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Nfa {
    start: StateId,
    state_cnt: usize,
    /// Sorted ascending.
    accepting: Vec<StateId>,
    /// The transitions of state `i` are `transitions[offsets[i]..offsets[i + 1]]`.
    /// States past the end of `offsets` have none.
    offsets: Vec<usize>,
    transitions: Vec<Transition>,
}

impl Nfa {
    pub(crate) fn new(
        start: StateId,
        state_cnt: usize,
        accepting: Vec<StateId>,
        offsets: Vec<usize>,
        transitions: Vec<Transition>,
    ) -> Self {
        Self {
            start,
            state_cnt,
            accepting,
            offsets,
            transitions,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state_count(&self) -> usize {
        self.state_cnt
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Iterates over every state id in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        (0..self.state_cnt as u32).map(StateId::from)
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.binary_search(&state).is_ok()
    }

    /// Iterates over the accepting states in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter().copied()
    }

    /// Returns the ordered outgoing transitions of a state.
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        let idx = state.as_usize();
        match (self.offsets.get(idx), self.offsets.get(idx + 1)) {
            (Some(&lower), Some(&upper)) => &self.transitions[lower..upper],
            _ => &[],
        }
    }

    /// Returns `true` if any member of `states` is accepting.
    pub fn any_accepting(&self, states: &StateSet) -> bool {
        states.iter().any(|state| self.is_accepting(state))
    }

    /// Returns the smallest superset of `states` closed under epsilon
    /// transitions.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nfa_runtime::{Condition, NfaBuilder, StateSet};
    ///
    /// let mut builder = NfaBuilder::new();
    /// let [a, b] = [builder.add_state(), builder.add_state()];
    /// // an epsilon cycle.
    /// builder.add_transition(a, Condition::Epsilon, b).unwrap();
    /// builder.add_transition(b, Condition::Epsilon, a).unwrap();
    /// builder.set_start(a).unwrap();
    /// let nfa = builder.finalize().unwrap();
    ///
    /// let closure = nfa.epsilon_closure(&[a].into_iter().collect());
    /// assert_eq!([a, b].into_iter().collect::<StateSet>(), closure);
    /// ```
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.state_count());
        let mut stack = Vec::with_capacity(self.state_count());
        for state in states.iter() {
            self.insert_closure(state, &mut closure, &mut stack, |_| {});
        }

        closure
    }

    /// Inserts `state` and everything epsilon-reachable from it into
    /// `closure`, calling `on_insert` for each newly inserted state. Members
    /// already in `closure` act as the visited marker and are not expanded
    /// again, so epsilon cycles terminate.
    pub(crate) fn insert_closure<F>(
        &self,
        state: StateId,
        closure: &mut StateSet,
        stack: &mut Vec<StateId>,
        mut on_insert: F,
    ) where
        F: FnMut(StateId),
    {
        if !closure.insert(state) {
            return;
        }
        on_insert(state);
        stack.push(state);

        while let Some(state) = stack.pop() {
            for transition in self.transitions(state) {
                if transition.condition.is_epsilon() && closure.insert(transition.target) {
                    on_insert(transition.target);
                    stack.push(transition.target);
                }
            }
        }
    }

    /// Returns the states reachable from `states` by consuming exactly
    /// `value`. The result is not epsilon-closed.
    pub fn step(&self, states: &StateSet, value: char) -> StateSet {
        let mut next = StateSet::with_capacity(self.state_count());
        for state in states.iter() {
            for transition in self.transitions(state) {
                if transition.condition.matches(value) {
                    next.insert(transition.target);
                }
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(states: &[u32]) -> StateSet {
        states.iter().copied().map(StateId::from).collect()
    }

    /// Hand-built `(a*)*`, the two stars forming an epsilon cycle.
    fn nested_star() -> Nfa {
        let mut builder = NfaBuilder::new();
        let states = builder.add_states(6);
        let [outer_start, inner_start, a_start, a_exit, inner_exit, outer_exit] = [
            states[0], states[1], states[2], states[3], states[4], states[5],
        ];

        let edges = [
            (a_start, Condition::Literal('a'), a_exit),
            (inner_start, Condition::Epsilon, a_start),
            (inner_start, Condition::Epsilon, inner_exit),
            (a_exit, Condition::Epsilon, a_start),
            (a_exit, Condition::Epsilon, inner_exit),
            (outer_start, Condition::Epsilon, inner_start),
            (outer_start, Condition::Epsilon, outer_exit),
            (inner_exit, Condition::Epsilon, inner_start),
            (inner_exit, Condition::Epsilon, outer_exit),
        ];

        for (from, condition, to) in edges {
            builder.add_transition(from, condition, to).unwrap();
        }
        builder.set_start(outer_start).unwrap();
        builder.set_accepting(outer_exit).unwrap();
        builder.finalize().unwrap()
    }

    #[test]
    fn should_terminate_closure_over_epsilon_cycles() {
        let nfa = nested_star();
        let closure = nfa.epsilon_closure(&set_of(&[0]));

        assert_eq!(set_of(&[0, 1, 2, 4, 5]), closure);
    }

    #[test]
    fn should_compute_idempotent_closure() {
        let nfa = nested_star();

        for state in nfa.states() {
            let once = nfa.epsilon_closure(&[state].into_iter().collect());
            let twice = nfa.epsilon_closure(&once);
            assert_eq!((state, &once), (state, &twice));
        }
    }

    #[test]
    fn should_step_only_over_matching_conditions() {
        let nfa = nested_star();
        let closure = nfa.epsilon_closure(&set_of(&[0]));

        assert_eq!(set_of(&[3]), nfa.step(&closure, 'a'));
        assert!(nfa.step(&closure, 'b').is_empty());
    }

    #[test]
    fn should_evaluate_conditions_by_predicate() {
        let input_output = [
            (Condition::Epsilon, 'a', false),
            (Condition::Literal('a'), 'a', true),
            (Condition::Literal('a'), 'b', false),
            (Condition::Range('a'..='c'), 'b', true),
            (Condition::Range('a'..='c'), 'd', false),
            (Condition::Class(CharacterClass::Digit), '5', true),
            (Condition::Class(CharacterClass::NotDigit), '5', false),
            (
                Condition::Set(CharacterSet::exclusive(CharacterAlphabet::Explicit(vec![
                    'x', 'y',
                ]))),
                'z',
                true,
            ),
        ];

        for (test_id, (condition, input, expected)) in input_output.into_iter().enumerate() {
            assert_eq!((test_id, expected), (test_id, condition.matches(input)))
        }
    }

    #[test]
    fn should_be_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Nfa>();
    }

    #[test]
    fn should_format_conditions_as_written() {
        let negated_word = CharacterSet::exclusive(CharacterAlphabet::Union(vec![
            CharacterAlphabet::Class(CharacterClass::Word),
            CharacterAlphabet::Explicit(vec!['-']),
        ]));

        let input_output = [
            (Condition::Epsilon, "\\e"),
            (Condition::Literal('a'), "a"),
            (Condition::Range('0'..='9'), "0-9"),
            (Condition::Class(CharacterClass::NotDigit), "\\D"),
            (Condition::Set(negated_word), "[^\\w\\-]"),
        ];

        for (test_id, (condition, expected)) in input_output.into_iter().enumerate() {
            assert_eq!((test_id, expected), (test_id, condition.to_string().as_str()))
        }
    }
}
