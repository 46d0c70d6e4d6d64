//! Provides utilities for writing an automaton in the line-oriented text
//! representation read by [nfa_runtime::text::FromText].

use nfa_runtime::text::{TextError, TextErrorKind};
use nfa_runtime::{Condition, Nfa, StateId};

/// Attempts to write a value in its text representation.
///
/// # Example
/// ```
/// use nfa_compiler::{build, ToText};
/// use nfa_runtime::{run, text::FromText, Nfa};
///
/// let nfa = build("a|bc").unwrap();
/// let text = nfa.to_text().unwrap();
/// let reread = Nfa::from_text(&text).unwrap();
///
/// assert!(run(&reread, "bc"));
/// assert!(!run(&reread, "ab"));
/// ```
pub trait ToText {
    fn to_text(&self) -> Result<String, TextError>;
}

impl ToText for Nfa {
    /// The text representation always starts at state `0`, so the start
    /// state trades ids with state `0` when they differ.
    fn to_text(&self) -> Result<String, TextError> {
        let start = self.start();
        let renumber = |state: StateId| {
            if state == start {
                StateId::from(0)
            } else if state.as_u32() == 0 {
                start
            } else {
                state
            }
        };

        let mut final_states: Vec<_> = self.accepting_states().map(renumber).collect();
        final_states.sort();
        let final_states = final_states
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        let mut lines = vec![
            "type: nfa".to_string(),
            format!("states: {}", self.state_count()),
            format!("final: {}", final_states),
            "rules:".to_string(),
        ];

        // renumbered sources are emitted in ascending order.
        let mut sources: Vec<_> = self.states().collect();
        sources.sort_by_key(|&state| renumber(state));

        for src in sources {
            let transitions = self.transitions(src);

            // consecutive transitions to the same target share a line.
            let mut idx = 0;
            while let Some(first) = transitions.get(idx) {
                let run_len = transitions[idx..]
                    .iter()
                    .take_while(|t| t.target() == first.target())
                    .count();

                let tokens = transitions[idx..idx + run_len]
                    .iter()
                    .map(|t| condition_token(t.condition()))
                    .collect::<Result<Vec<_>, _>>()?;

                lines.push(format!(
                    "{}->{} {}",
                    renumber(src),
                    renumber(first.target()),
                    tokens.join(" ")
                ));
                idx += run_len;
            }
        }

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}

fn condition_token(condition: &Condition) -> Result<String, TextError> {
    let unrepresentable =
        || TextError::new(TextErrorKind::Unrepresentable).with_data(condition.to_string());

    match condition {
        Condition::Literal(c) if is_line_break(*c) => Err(unrepresentable()),
        Condition::Range(r) if [*r.start(), *r.end()].into_iter().any(is_unwritable_bound) => {
            Err(unrepresentable())
        }
        Condition::Set(_) => Err(unrepresentable()),
        Condition::Epsilon | Condition::Literal(_) | Condition::Range(_) | Condition::Class(_) => {
            Ok(condition.to_string())
        }
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Range bounds are split on spaces and lines when read back.
fn is_unwritable_bound(c: char) -> bool {
    c == ' ' || is_line_break(c)
}
