//! Executes an [Nfa] against character input by tracking the set of all
//! simultaneously active states, rather than backtracking per branch. Every
//! entry point runs in `O(input length × automaton size)`.
//!
//! Offsets are counted in chars, not bytes.

use std::collections::hash_map::{Entry, HashMap};
use std::collections::VecDeque;
use std::fmt::Display;

use crate::{Condition, Nfa, StateId, StateSet};

/// A half-open range of char offsets, `[start, end)`, covered by a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The working memory of a simulation over one automaton.
///
/// A `Simulation` may be reused across many inputs. Each instance is owned by
/// a single caller, while the automaton itself is only ever borrowed
/// immutably, so independent simulations over one [Nfa] may run in parallel.
pub struct Simulation<'a> {
    nfa: &'a Nfa,
    current: StateSet,
    next: StateSet,
    /// The earliest input offset from which each active state is reached.
    starts: Vec<usize>,
    next_starts: Vec<usize>,
    stack: Vec<StateId>,
}

impl<'a> Simulation<'a> {
    #[must_use]
    pub fn new(nfa: &'a Nfa) -> Self {
        let state_cnt = nfa.state_count();

        Self {
            nfa,
            current: StateSet::with_capacity(state_cnt),
            next: StateSet::with_capacity(state_cnt),
            starts: vec![0; state_cnt],
            next_starts: vec![0; state_cnt],
            stack: Vec::with_capacity(state_cnt),
        }
    }

    /// The active-state set left by the most recent run.
    pub fn active_states(&self) -> &StateSet {
        &self.current
    }

    fn reset(&mut self) {
        self.current.clear();
        self.next.clear();
    }

    /// Starts a new thread at `offset` by adding the epsilon closure of the
    /// start state. States that are already active keep their earlier start.
    fn seed(&mut self, offset: usize) {
        let nfa = self.nfa;
        let Self {
            current,
            starts,
            stack,
            ..
        } = self;

        nfa.insert_closure(nfa.start(), current, stack, |state| {
            starts[state.as_usize()] = offset
        });
    }

    /// Consumes `value` from every active state whose thread started at or
    /// before `cutoff`, replacing the active set with the epsilon-closed
    /// result.
    ///
    /// Active states are visited in the order they were inserted, which is
    /// ordered by start offset, so the first insertion of any state carries
    /// the earliest start that reaches it.
    fn advance(&mut self, value: char, cutoff: usize) {
        let nfa = self.nfa;
        let Self {
            current,
            next,
            starts,
            next_starts,
            stack,
            ..
        } = self;

        next.clear();
        for state in current.iter() {
            let start = starts[state.as_usize()];
            if start > cutoff {
                continue;
            }

            for transition in nfa.transitions(state) {
                if transition.condition().matches(value) {
                    nfa.insert_closure(transition.target(), next, stack, |reached| {
                        next_starts[reached.as_usize()] = start
                    });
                }
            }
        }

        std::mem::swap(current, next);
        std::mem::swap(starts, next_starts);
    }

    /// Returns `true` if the whole of `input` is accepted.
    ///
    /// The scan stops at the first offset where no state remains active and
    /// reports rejection without reading the rest of the input.
    pub fn is_match(&mut self, input: &str) -> bool {
        self.reset();
        self.seed(0);

        for value in input.chars() {
            if self.current.is_empty() {
                return false;
            }
            self.advance(value, usize::MAX);
        }

        self.nfa.any_accepting(&self.current)
    }

    /// The best match ending at `offset` among the active states: the one
    /// with the earliest start.
    fn accepted_span(&self, offset: usize) -> Option<Span> {
        self.current
            .iter()
            .filter(|&state| self.nfa.is_accepting(state))
            .map(|state| self.starts[state.as_usize()])
            .min()
            .map(|start| Span::new(start, offset))
    }

    /// Finds the leftmost-longest match starting at or after `from`.
    fn find_at(&mut self, input: &[char], from: usize) -> Option<Span> {
        self.reset();
        let mut found: Option<Span> = None;

        for offset in from..=input.len() {
            // once a match is known, later starts can never be leftmost.
            if found.is_none() {
                self.seed(offset);
            }

            if let Some(span) = self.accepted_span(offset) {
                if found.map_or(true, |best| span.start <= best.start) {
                    found = Some(span);
                }
            }

            match input.get(offset) {
                Some(&value) if found.is_none() || !self.current.is_empty() => {
                    let cutoff = found.map_or(usize::MAX, |best| best.start);
                    self.advance(value, cutoff);
                }
                _ => break,
            }
        }

        found
    }

    /// Returns the leftmost-longest span of `input` accepted by the
    /// automaton, if any.
    pub fn find(&mut self, input: &str) -> Option<Span> {
        let input: Vec<char> = input.chars().collect();
        self.find_at(&input, 0)
    }

    /// Returns every successive non-overlapping leftmost-longest match. An
    /// empty match directly after the end of the previous match is skipped.
    pub fn find_all(&mut self, input: &str) -> Vec<Span> {
        let input: Vec<char> = input.chars().collect();
        let mut spans = vec![];
        let mut last_end = None;
        let mut cursor = 0;

        while cursor <= input.len() {
            let span = match self.find_at(&input, cursor) {
                Some(span) => span,
                None => break,
            };

            if span.is_empty() {
                cursor = span.end + 1;
                if last_end == Some(span.start) {
                    continue;
                }
            } else {
                cursor = span.end;
            }

            last_end = Some(span.end);
            spans.push(span);
        }

        spans
    }
}

/// Returns `true` if `nfa` accepts the whole of `input`.
///
/// # Example
///
/// ```rust
/// use nfa_runtime::{Condition, NfaBuilder, run};
///
/// // approximate to `a|b`
/// let mut builder = NfaBuilder::new();
/// let [start, exit] = [builder.add_state(), builder.add_state()];
/// builder.add_transition(start, Condition::Literal('a'), exit).unwrap();
/// builder.add_transition(start, Condition::Literal('b'), exit).unwrap();
/// builder.set_start(start).unwrap();
/// builder.set_accepting(exit).unwrap();
/// let nfa = builder.finalize().unwrap();
///
/// assert!(run(&nfa, "a"));
/// assert!(run(&nfa, "b"));
/// assert!(!run(&nfa, "c"));
/// assert!(!run(&nfa, ""));
/// ```
pub fn run(nfa: &Nfa, input: &str) -> bool {
    Simulation::new(nfa).is_match(input)
}

/// Returns the leftmost-longest span of `input` accepted by `nfa`.
pub fn find(nfa: &Nfa, input: &str) -> Option<Span> {
    Simulation::new(nfa).find(input)
}

/// Returns every non-overlapping leftmost-longest span of `input` accepted
/// by `nfa`.
pub fn find_all(nfa: &Nfa, input: &str) -> Vec<Span> {
    Simulation::new(nfa).find_all(input)
}

/// A witness that an input is accepted: the states visited from the start
/// state to an accepting state, and the symbol consumed by each hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    states: Vec<StateId>,
    consumed: Vec<Option<char>>,
}

impl Path {
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// The symbol consumed by each hop, `None` marking an epsilon hop.
    pub fn consumed(&self) -> &[Option<char>] {
        &self.consumed
    }
}

impl Display for Path {
    /// Formats as `s0 c0 s1 c1 ... sn`, with an empty token for epsilon hops.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (state, consumed) in self.states.iter().zip(self.consumed.iter()) {
            match consumed {
                Some(c) => write!(f, "{} {} ", state, c)?,
                None => write!(f, "{}  ", state)?,
            }
        }

        match self.states.last() {
            Some(last) => write!(f, "{}", last),
            None => Ok(()),
        }
    }
}

/// A state paired with the number of chars consumed on reaching it.
type Configuration = (StateId, usize);

/// Returns a path accepting the whole of `input`, if one exists.
///
/// Configurations are explored breadth-first, each at most once, so the
/// search terminates on epsilon cycles and the returned path takes the
/// fewest transitions. Between equally short paths, earlier transitions of a
/// state are preferred.
pub fn trace(nfa: &Nfa, input: &str) -> Option<Path> {
    let input: Vec<char> = input.chars().collect();
    let origin = (nfa.start(), 0);

    let mut parents: HashMap<Configuration, Option<(Configuration, Option<char>)>> =
        HashMap::new();
    parents.insert(origin, None);
    let mut queue = VecDeque::from([origin]);

    while let Some((state, offset)) = queue.pop_front() {
        if offset == input.len() && nfa.is_accepting(state) {
            log::trace!(
                "accepting path found after visiting {} configurations",
                parents.len()
            );
            return Some(path_to(&parents, (state, offset)));
        }

        let next_value = input.get(offset).copied();
        for transition in nfa.transitions(state) {
            let (successor, consumed) = match (transition.condition(), next_value) {
                (Condition::Epsilon, _) => ((transition.target(), offset), None),
                (condition, Some(value)) if condition.matches(value) => {
                    ((transition.target(), offset + 1), Some(value))
                }
                _ => continue,
            };

            if let Entry::Vacant(entry) = parents.entry(successor) {
                entry.insert(Some(((state, offset), consumed)));
                queue.push_back(successor);
            }
        }
    }

    log::trace!(
        "no accepting path after visiting {} configurations",
        parents.len()
    );
    None
}

fn path_to(
    parents: &HashMap<Configuration, Option<(Configuration, Option<char>)>>,
    end: Configuration,
) -> Path {
    let mut states = vec![end.0];
    let mut consumed = vec![];
    let mut current = end;

    while let Some(Some((parent, symbol))) = parents.get(&current) {
        states.push(parent.0);
        consumed.push(*symbol);
        current = *parent;
    }

    states.reverse();
    consumed.reverse();
    Path { states, consumed }
}
