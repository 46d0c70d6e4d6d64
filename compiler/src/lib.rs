//! Provides for the parsing and compilation of a pattern into its
//! corresponding nondeterministic finite automaton.
//!
//! # Example
//!
//! ```rust
//! // Parsing and compilation of a pattern into an automaton is accomplished
//! // by the `build` function, or by `parse` and `compile` individually.
//! use nfa_compiler::build;
//!
//! // Evaluating input against an automaton is accomplished via the functions
//! // exposed in the `nfa_runtime` crate.
//! use nfa_runtime::{find, run, Span};
//!
//! let nfa = build("l+o").expect("failed to parse or compile");
//!
//! // `run` requires the pattern to span the entire input.
//! assert!(run(&nfa, "llo"));
//! assert!(!run(&nfa, "hello"));
//!
//! // `find` reports the leftmost, then longest, matching span as a
//! // non-inclusive range of character offsets.
//! assert_eq!(Some(Span::new(2, 5)), find(&nfa, "hello world"));
//! ```

pub mod ast;
pub mod compiler;
pub mod parser;
pub mod text;

pub use compiler::compile;
pub use parser::{parse, PatternError, PatternErrorKind};
pub use text::ToText;

use nfa_runtime::Nfa;

/// Parses and compiles a pattern in one step.
pub fn build(pattern: &str) -> Result<Nfa, PatternError> {
    let input: Vec<(usize, char)> = pattern.chars().enumerate().collect();
    let regex = parse(&input)?;

    compile(regex).map_err(|err| {
        PatternError::new(PatternErrorKind::Construction, 0).with_data(err.to_string())
    })
}
