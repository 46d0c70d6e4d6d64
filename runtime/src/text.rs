//! Provides utilities for reading the line-oriented text representation of
//! an automaton.
//!
//! ```text
//! type: nfa
//! states: 3
//! final: 2
//! rules:
//! 0->1 a b-d \d
//! 1->2 \e
//! input: abc
//! ```
//!
//! The start state is always `0`. Each rule line lists one or more
//! space-separated transition tokens from `SRC` to `DST`: a single character
//! literal, a range `x-y`, an epsilon `\e`, or a class `\d`, `\w`, `\s`,
//! `\D`, `\W`, `\S` or `\.`. A literal space is written as a space token.

use crate::{BuildError, CharacterClass, Condition, Nfa, NfaBuilder, StateId};

/// Attempts to read a value from its text representation.
///
/// # Example
/// ```
/// use nfa_runtime::{run, Nfa, text::FromText};
///
/// let text = "type: nfa\nstates: 2\nfinal: 1\nrules:\n0->1 a-c\n1->1 \\d\n";
/// let nfa = Nfa::from_text(text).unwrap();
///
/// assert!(run(&nfa, "b42"));
/// assert!(!run(&nfa, "x"));
/// ```
pub trait FromText: Sized {
    fn from_text(text: &str) -> Result<Self, TextError>;
}

/// Represents all error types that may _expectedly_ occur while reading or
/// writing the text representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextErrorKind {
    /// A directive appeared before the `type:` line.
    MissingType,
    /// The document declares a type other than `nfa`.
    UnsupportedType,
    /// `final:` or `rules:` appeared before `states:`, or no states were
    /// declared at all.
    StatesUndeclared,
    /// `states:` was declared more than once.
    DuplicateStates,
    /// The state count or a state id is not a valid unsigned integer.
    InvalidInteger,
    /// A rule line lacks the `SRC->DST ` prefix.
    MalformedRule,
    /// A transition token could not be interpreted.
    InvalidToken,
    /// An escaped class is not one of `\d \w \s \D \W \S \.`.
    UnknownClass,
    /// A line outside of a `rules:` block is not a directive.
    UnexpectedLine,
    /// The automaton is inconsistent, i.e. a rule references an undeclared
    /// state.
    InvalidAutomaton,
    /// A transition condition has no text representation.
    Unrepresentable,
}

/// A text error, including the error kind, the 1-based line it occurred on
/// and any optional enriching data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextError {
    /// The type of triggered error.
    kind: TextErrorKind,
    line: Option<usize>,
    /// Additional error data.
    data: Option<String>,
}

impl TextError {
    /// Instantiates a new error.
    pub fn new(kind: TextErrorKind) -> Self {
        Self {
            kind,
            line: None,
            data: None,
        }
    }

    /// Associates additional data with the error, returning the modified error.
    pub fn with_data(mut self, data: String) -> Self {
        self.data = Some(data);
        self
    }

    /// Associates a line number with the error, returning the modified error.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn kind(&self) -> &TextErrorKind {
        &self.kind
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }

        let msg = match &self.kind {
            TextErrorKind::MissingType => "expected a `type:` directive first",
            TextErrorKind::UnsupportedType => "unsupported automaton type",
            TextErrorKind::StatesUndeclared => "`states:` must be declared first",
            TextErrorKind::DuplicateStates => "`states:` declared more than once",
            TextErrorKind::InvalidInteger => "invalid integer",
            TextErrorKind::MalformedRule => "expected a rule of the form `SRC->DST TOKENS`",
            TextErrorKind::InvalidToken => "invalid transition token",
            TextErrorKind::UnknownClass => "unknown character class",
            TextErrorKind::UnexpectedLine => "unexpected line",
            TextErrorKind::InvalidAutomaton => "invalid automaton",
            TextErrorKind::Unrepresentable => "condition has no text representation",
        };

        match &self.data {
            Some(data) => write!(f, "{}: {}", msg, data),
            None => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TextError {}

impl From<BuildError> for TextError {
    fn from(err: BuildError) -> Self {
        TextError::new(TextErrorKind::InvalidAutomaton).with_data(err.to_string())
    }
}

/// An automaton document, optionally carrying the input to run it against.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub automaton: Nfa,
    pub input: Option<String>,
}

impl FromText for Document {
    fn from_text(text: &str) -> Result<Self, TextError> {
        let mut doc_type: Option<&str> = None;
        let mut builder: Option<NfaBuilder> = None;
        let mut input = None;
        let mut reading_rules = false;

        for (line_idx, line) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            if line.is_empty() {
                continue;
            }

            if let Some(declared) = line.strip_prefix("type:") {
                doc_type = Some(declared.trim());
                continue;
            }

            match doc_type {
                Some("nfa") => (),
                Some(other) => {
                    return Err(TextError::new(TextErrorKind::UnsupportedType)
                        .with_data(other.to_string())
                        .at_line(line_no))
                }
                None => return Err(TextError::new(TextErrorKind::MissingType).at_line(line_no)),
            }

            if let Some(cnt) = line.strip_prefix("states:") {
                if builder.is_some() {
                    return Err(TextError::new(TextErrorKind::DuplicateStates).at_line(line_no));
                }

                let cnt = parse_integer(cnt.trim()).map_err(|e| e.at_line(line_no))?;
                let mut new_builder = NfaBuilder::new();
                let _ = new_builder
                    .try_add_states(cnt as usize)
                    .map_err(|e| TextError::from(e).at_line(line_no))?;
                builder = Some(new_builder);
            } else if let Some(states) = line.strip_prefix("final:") {
                let builder = builder.as_mut().ok_or_else(|| {
                    TextError::new(TextErrorKind::StatesUndeclared).at_line(line_no)
                })?;

                for state in states.split(' ').filter(|s| !s.is_empty()) {
                    let state = parse_integer(state).map_err(|e| e.at_line(line_no))?;
                    builder
                        .set_accepting(StateId::from(state))
                        .map_err(|e| TextError::from(e).at_line(line_no))?;
                }
                reading_rules = false;
            } else if line.starts_with("rules:") {
                if builder.is_none() {
                    return Err(TextError::new(TextErrorKind::StatesUndeclared).at_line(line_no));
                }
                reading_rules = true;
            } else if let Some(rest) = line.strip_prefix("input:") {
                input = Some(rest.strip_prefix(' ').unwrap_or(rest).to_string());
                reading_rules = false;
            } else if reading_rules {
                // rules can only be read after `states:` has been seen.
                if let Some(builder) = builder.as_mut() {
                    add_rule(builder, line).map_err(|e| e.at_line(line_no))?;
                }
            } else {
                return Err(TextError::new(TextErrorKind::UnexpectedLine)
                    .with_data(line.to_string())
                    .at_line(line_no));
            }
        }

        let mut builder = match (doc_type, builder) {
            (_, Some(builder)) => builder,
            (None, None) => return Err(TextError::new(TextErrorKind::MissingType)),
            (Some(_), None) => return Err(TextError::new(TextErrorKind::StatesUndeclared)),
        };
        builder.set_start(StateId::from(0))?;
        let automaton = builder.finalize()?;

        log::debug!(
            "read automaton with {} states and {} transitions",
            automaton.state_count(),
            automaton.transition_count()
        );

        Ok(Document { automaton, input })
    }
}

impl FromText for Nfa {
    fn from_text(text: &str) -> Result<Self, TextError> {
        Document::from_text(text).map(|doc| doc.automaton)
    }
}

fn parse_integer(src: &str) -> Result<u32, TextError> {
    src.parse::<u32>()
        .map_err(|_| TextError::new(TextErrorKind::InvalidInteger).with_data(src.to_string()))
}

/// Parses a `SRC->DST TOKENS` line, appending its transitions in order.
fn add_rule(builder: &mut NfaBuilder, line: &str) -> Result<(), TextError> {
    let malformed = || TextError::new(TextErrorKind::MalformedRule).with_data(line.to_string());

    let arrow_pos = line.find("->").ok_or_else(malformed)?;
    let space_pos = line.find(' ').ok_or_else(malformed)?;
    if arrow_pos > space_pos {
        return Err(malformed());
    }

    let src = parse_integer(&line[..arrow_pos])?;
    let dst = parse_integer(&line[arrow_pos + 2..space_pos])?;

    for condition in rule_tokens(&line[space_pos + 1..])? {
        builder.add_transition(StateId::from(src), condition, StateId::from(dst))?;
    }

    Ok(())
}

/// Splits the token list of a rule into conditions.
fn rule_tokens(content: &str) -> Result<Vec<Condition>, TextError> {
    let chars: Vec<char> = content.chars().collect();
    let mut rest = &chars[..];
    let mut conditions = vec![];

    while !rest.is_empty() {
        let token_len = match rest.iter().position(|&c| c == ' ') {
            None => rest.len(),
            // a leading space is itself the literal being transitioned on.
            Some(0) => 1,
            Some(pos) => pos,
        };
        let token = &rest[..token_len];
        let invalid_token =
            || TextError::new(TextErrorKind::InvalidToken).with_data(token.iter().collect());

        let condition = match token {
            &[lower, '-', upper] if lower <= upper => Condition::Range(lower..=upper),
            &[_, '-', _] => return Err(invalid_token()),
            &['\\', 'e'] => Condition::Epsilon,
            &['\\', escape] => CharacterClass::from_escape(escape)
                .map(Condition::Class)
                .ok_or_else(|| {
                    TextError::new(TextErrorKind::UnknownClass).with_data(format!("\\{}", escape))
                })?,
            &[c] if rest.get(1).map_or(true, |&next| next == ' ') => Condition::Literal(c),
            _ => return Err(invalid_token()),
        };

        conditions.push(condition);
        rest = rest.get(token_len + 1..).unwrap_or(&[]);
    }

    Ok(conditions)
}
