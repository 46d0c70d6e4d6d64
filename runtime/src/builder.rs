//! The mutable construction phase of an [Nfa].

use crate::{Condition, Nfa, StateId, Transition};

/// Represents all error types that may occur while assembling an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// A state was referenced that was never added to the builder.
    StateUndefined,
    /// The builder was finalized without designating a start state.
    StartUndefined,
    /// More states were requested than a [StateId] can address.
    StateLimitExceeded,
}

/// A builder error, including the error kind and any optional enriching data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    /// The type of triggered error.
    kind: BuildErrorKind,
    /// Additional error data.
    data: Option<String>,
}

impl BuildError {
    /// Instantiates a new error.
    pub fn new(kind: BuildErrorKind) -> Self {
        Self { kind, data: None }
    }

    /// Associates additional data with the error, returning the modified error.
    pub fn with_data(mut self, data: String) -> Self {
        self.with_data_mut(data);
        self
    }

    /// Associates additional data with the error.
    pub fn with_data_mut(&mut self, data: String) {
        self.data = Some(data);
    }

    pub fn kind(&self) -> &BuildErrorKind {
        &self.kind
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (data, padding) = if let Some(data) = &self.data {
            (data.as_str(), " ")
        } else {
            ("", "")
        };
        match &self.kind {
            BuildErrorKind::StateUndefined => write!(f, "undefined state{}{}", padding, data),
            BuildErrorKind::StartUndefined => write!(f, "no start state defined"),
            BuildErrorKind::StateLimitExceeded => {
                write!(f, "state limit exceeded{}{}", padding, data)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Accumulates states and transitions, then finalizes into an immutable
/// [Nfa].
///
/// States are only counted, so declaring many states is cheap until
/// transitions reference them.
#[derive(Debug, Default)]
pub struct NfaBuilder {
    start: Option<StateId>,
    state_cnt: usize,
    accepting: Vec<StateId>,
    /// Transitions paired with their source, in insertion order.
    transitions: Vec<(StateId, Transition)>,
}

impl NfaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_count(&self) -> usize {
        self.state_cnt
    }

    /// Adds a new non-accepting state, returning its id.
    ///
    /// # Panics
    ///
    /// When the `u32` id space is exhausted. Use [NfaBuilder::try_add_states]
    /// for a fallible alternative.
    pub fn add_state(&mut self) -> StateId {
        let id = u32::try_from(self.state_cnt).expect("state id space exhausted");
        self.state_cnt += 1;

        StateId::from(id)
    }

    /// Adds `cnt` states, returning their ids in order.
    pub fn try_add_states(
        &mut self,
        cnt: usize,
    ) -> Result<impl Iterator<Item = StateId>, BuildError> {
        let upper = self
            .state_cnt
            .checked_add(cnt)
            .filter(|&upper| upper <= u32::MAX as usize)
            .ok_or_else(|| {
                BuildError::new(BuildErrorKind::StateLimitExceeded).with_data(cnt.to_string())
            })?;

        let first = self.state_cnt as u32;
        self.state_cnt = upper;

        Ok((first..upper as u32).map(StateId::from))
    }

    /// Adds `cnt` states, returning their ids in order.
    ///
    /// # Panics
    ///
    /// When the `u32` id space is exhausted.
    pub fn add_states(&mut self, cnt: usize) -> Vec<StateId> {
        (0..cnt).map(|_| self.add_state()).collect()
    }

    fn ensure_defined(&self, state: StateId) -> Result<(), BuildError> {
        if state.as_usize() < self.state_cnt {
            Ok(())
        } else {
            Err(BuildError::new(BuildErrorKind::StateUndefined).with_data(state.to_string()))
        }
    }

    /// Appends a transition to the ordered transitions of `from`.
    pub fn add_transition(
        &mut self,
        from: StateId,
        condition: Condition,
        to: StateId,
    ) -> Result<(), BuildError> {
        self.ensure_defined(from)?;
        self.ensure_defined(to)?;

        self.transitions.push((from, Transition::new(condition, to)));
        Ok(())
    }

    pub fn set_accepting(&mut self, state: StateId) -> Result<(), BuildError> {
        self.ensure_defined(state)?;
        self.accepting.push(state);
        Ok(())
    }

    pub fn set_start(&mut self, state: StateId) -> Result<(), BuildError> {
        self.ensure_defined(state)?;
        self.start = Some(state);
        Ok(())
    }

    /// Consumes the builder, producing an immutable automaton.
    ///
    /// Fails with [BuildErrorKind::StateLimitExceeded] when the transition
    /// index for the highest source state cannot be allocated.
    pub fn finalize(self) -> Result<Nfa, BuildError> {
        let start = self
            .start
            .ok_or_else(|| BuildError::new(BuildErrorKind::StartUndefined))?;

        let mut accepting = self.accepting;
        accepting.sort_unstable();
        accepting.dedup();

        // stable, so each source keeps its insertion order.
        let mut sourced = self.transitions;
        sourced.sort_by_key(|(src, _)| *src);

        let offsets_len = sourced.last().map_or(0, |(src, _)| src.as_usize() + 2);
        let mut offsets = Vec::new();
        offsets.try_reserve_exact(offsets_len).map_err(|_| {
            BuildError::new(BuildErrorKind::StateLimitExceeded).with_data(offsets_len.to_string())
        })?;

        let mut transitions = Vec::with_capacity(sourced.len());
        for (idx, (src, transition)) in sourced.into_iter().enumerate() {
            while offsets.len() <= src.as_usize() {
                offsets.push(idx);
            }
            transitions.push(transition);
        }
        if !transitions.is_empty() {
            offsets.push(transitions.len());
        }

        Ok(Nfa::new(
            start,
            self.state_cnt,
            accepting,
            offsets,
            transitions,
        ))
    }
}
