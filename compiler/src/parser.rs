use parcel::parsers::character::expect_character;
use parcel::prelude::v1::*;

use super::ast;

/// Represents all classes of malformed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternErrorKind {
    /// A `)` without a matching `(`.
    UnbalancedGroup,
    /// A `(` that is never closed.
    UnclosedGroup,
    /// An alternation branch or group with nothing in it.
    EmptyAlternative,
    /// A quantifier with no operand to repeat.
    DanglingQuantifier,
    /// A `\` followed by a character with no escaped meaning.
    UnknownEscape,
    /// An empty, unclosed or reversed `[...]` group.
    InvalidCharacterGroup,
    /// Any remaining input that does not form a pattern.
    InvalidPattern,
    /// The pattern parsed but no automaton could be assembled from it.
    Construction,
}

/// A pattern error, including the character offset it was detected at and
/// any optional enriching data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    kind: PatternErrorKind,
    position: usize,
    data: Option<String>,
}

impl PatternError {
    pub fn new(kind: PatternErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            data: None,
        }
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

    pub fn kind(&self) -> &PatternErrorKind {
        &self.kind
    }

    /// The character offset, zero-based, at which the error was detected.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match &self.kind {
            PatternErrorKind::UnbalancedGroup => "unbalanced group terminator",
            PatternErrorKind::UnclosedGroup => "unclosed group",
            PatternErrorKind::EmptyAlternative => "empty alternative",
            PatternErrorKind::DanglingQuantifier => "quantifier without operand",
            PatternErrorKind::UnknownEscape => "unknown escape sequence",
            PatternErrorKind::InvalidCharacterGroup => "invalid character group",
            PatternErrorKind::InvalidPattern => "invalid pattern",
            PatternErrorKind::Construction => "unable to construct automaton",
        };

        match &self.data {
            Some(data) => write!(f, "{} at position {}: {}", msg, self.position, data),
            None => write!(f, "{} at position {}", msg, self.position),
        }
    }
}

impl std::error::Error for PatternError {}

/// Parses an enumerated pattern into its [ast::Regex] representation.
///
/// An empty input parses to a pattern matching only the empty string.
pub fn parse(input: &[(usize, char)]) -> Result<ast::Regex, PatternError> {
    if input.is_empty() {
        return Ok(ast::Regex::empty_string());
    }
    validate(input)?;

    let end_of_input = end_position(input);
    regex()
        .parse(input)
        .map_err(|err| {
            PatternError::new(PatternErrorKind::InvalidPattern, 0)
                .with_data(format!("unspecified parse error occured: {}", err))
        })
        .and_then(|ms| match ms {
            MatchStatus::Match {
                inner, remainder, ..
            } if remainder.is_empty() => Ok(inner),
            MatchStatus::Match { remainder, .. } | MatchStatus::NoMatch(remainder) => {
                let position = remainder
                    .first()
                    .map(|&(pos, _)| pos)
                    .unwrap_or(end_of_input);
                Err(PatternError::new(PatternErrorKind::InvalidPattern, position))
            }
        })
}

fn end_position(input: &[(usize, char)]) -> usize {
    input.last().map(|&(pos, _)| pos + 1).unwrap_or(0)
}

// Validation

/// The class of the last significant token seen by [validate].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preceding {
    Start,
    GroupOpen,
    Alternation(usize),
    Quantifier,
    Operand,
}

/// Scans the pattern for structural errors, reporting the first one with
/// its position. Input that passes is accepted in full by [regex].
fn validate(input: &[(usize, char)]) -> Result<(), PatternError> {
    let mut open_groups = vec![];
    let mut preceding = Preceding::Start;
    let mut idx = 0;

    while let Some(&(pos, c)) = input.get(idx) {
        idx += 1;

        preceding = match c {
            '\\' => match input.get(idx) {
                Some(&(_, escaped)) if is_escapable(escaped) => {
                    idx += 1;
                    Preceding::Operand
                }
                _ => return Err(PatternError::new(PatternErrorKind::UnknownEscape, pos)),
            },
            '(' => {
                open_groups.push(pos);
                Preceding::GroupOpen
            }
            ')' => {
                if open_groups.pop().is_none() {
                    return Err(PatternError::new(PatternErrorKind::UnbalancedGroup, pos));
                }

                match preceding {
                    Preceding::GroupOpen => {
                        return Err(PatternError::new(PatternErrorKind::EmptyAlternative, pos))
                    }
                    Preceding::Alternation(alternation_pos) => {
                        return Err(PatternError::new(
                            PatternErrorKind::EmptyAlternative,
                            alternation_pos,
                        ))
                    }
                    _ => Preceding::Operand,
                }
            }
            '|' => match preceding {
                Preceding::Start | Preceding::GroupOpen | Preceding::Alternation(_) => {
                    return Err(PatternError::new(PatternErrorKind::EmptyAlternative, pos))
                }
                _ => Preceding::Alternation(pos),
            },
            '*' | '+' | '?' => match preceding {
                Preceding::Operand => Preceding::Quantifier,
                _ => return Err(PatternError::new(PatternErrorKind::DanglingQuantifier, pos)),
            },
            '[' => {
                idx = validate_character_group(input, idx, pos)?;
                Preceding::Operand
            }
            _ => Preceding::Operand,
        };
    }

    if let Preceding::Alternation(pos) = preceding {
        return Err(PatternError::new(PatternErrorKind::EmptyAlternative, pos));
    }

    match open_groups.first() {
        Some(&pos) => Err(PatternError::new(PatternErrorKind::UnclosedGroup, pos)),
        None => Ok(()),
    }
}

/// Validates a character group whose `[` sits at `open_pos`, starting at
/// the index following it. Returns the index following the closing `]`.
fn validate_character_group(
    input: &[(usize, char)],
    mut idx: usize,
    open_pos: usize,
) -> Result<usize, PatternError> {
    if let Some(&(_, '^')) = input.get(idx) {
        idx += 1;
    }

    let mut items = 0;
    loop {
        let member_pos = match input.get(idx) {
            None => {
                return Err(
                    PatternError::new(PatternErrorKind::InvalidCharacterGroup, open_pos)
                        .with_data("unclosed character group".to_string()),
                )
            }
            Some(&(_, ']')) if items > 0 => return Ok(idx + 1),
            Some(&(_, ']')) => {
                return Err(
                    PatternError::new(PatternErrorKind::InvalidCharacterGroup, open_pos)
                        .with_data("empty character group".to_string()),
                )
            }
            Some(&(pos, _)) => pos,
        };

        let (lower, next) = group_member(input, idx)?;
        idx = next;
        items += 1;

        // a range requires a character, not a class, on both ends.
        let range_upper = match (lower, input.get(idx), input.get(idx + 1)) {
            (Some(lower), Some(&(_, '-')), Some(&(_, upper))) if upper != ']' => {
                match group_member(input, idx + 1)? {
                    (Some(upper), next) => Some((lower, upper, next)),
                    (None, _) => None,
                }
            }
            _ => None,
        };

        if let Some((lower, upper, next)) = range_upper {
            if lower > upper {
                return Err(
                    PatternError::new(PatternErrorKind::InvalidCharacterGroup, member_pos)
                        .with_data(format!("reversed range {}-{}", lower, upper)),
                );
            }
            idx = next;
        }
    }
}

/// Reads one group member at `idx`, returning its character, or `None` for
/// a shorthand class, and the index following it.
fn group_member(
    input: &[(usize, char)],
    idx: usize,
) -> Result<(Option<char>, usize), PatternError> {
    match input.get(idx) {
        Some(&(pos, '\\')) => match input.get(idx + 1) {
            Some(&(_, c)) if ast::CharacterClass::from_escape(c).is_some() => Ok((None, idx + 2)),
            Some(&(_, c)) => char_to_escaped_equivalent(c)
                .map(|escaped| (Some(escaped), idx + 2))
                .ok_or_else(|| PatternError::new(PatternErrorKind::UnknownEscape, pos)),
            None => Err(PatternError::new(PatternErrorKind::UnknownEscape, pos)),
        },
        Some(&(_, c)) => Ok((Some(c), idx + 1)),
        None => Err(PatternError::new(
            PatternErrorKind::InvalidCharacterGroup,
            end_position(input),
        )),
    }
}

fn is_escapable(c: char) -> bool {
    char_to_escaped_equivalent(c).is_some() || ast::CharacterClass::from_escape(c).is_some()
}

fn is_metacharacter(c: char) -> bool {
    ['(', ')', '|', '*', '+', '?', '['].contains(&c)
}

// Grammar

fn regex<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Regex> {
    expression().map(ast::Regex)
}

// Expression

fn expression<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Expression> {
    parcel::join(
        subexpression(),
        parcel::zero_or_more(parcel::right(parcel::join(
            expect_character('|'),
            subexpression(),
        ))),
    )
    .map(|(head, tail)| vec![head].into_iter().chain(tail).collect())
    .map(ast::Expression)
}

fn subexpression<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::SubExpression> {
    parcel::one_or_more(subexpression_item()).map(ast::SubExpression)
}

fn subexpression_item<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::SubExpressionItem>
{
    parcel::or(group().map(Into::into), || r#match().map(Into::into))
}

// Group

fn group<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Group> {
    expect_character('(')
        .and_then(|_| {
            parcel::join(
                expression(),
                parcel::right(parcel::join(
                    expect_character(')'),
                    parcel::optional(quantifier()),
                )),
            )
        })
        .map(|(expression, quantifier)| match quantifier {
            Some(quantifier) => ast::Group::WithQuantifier {
                expression,
                quantifier,
            },
            None => ast::Group::WithoutQuantifier { expression },
        })
}

// Matchers

fn r#match<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Match> {
    parcel::join(match_item(), parcel::optional(quantifier())).map(|(match_item, quantifier)| {
        match quantifier {
            Some(quantifier) => ast::Match::WithQuantifier {
                item: match_item,
                quantifier,
            },
            None => ast::Match::WithoutQuantifier { item: match_item },
        }
    })
}

fn match_item<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::MatchItem> {
    parcel::or(match_character_class().map(Into::into), || {
        parcel::or(match_any_character(), || match_character().map(Into::into))
    })
}

fn match_any_character<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::MatchItem> {
    expect_character('.').map(|_| ast::MatchItem::MatchAnyCharacter)
}

fn match_character_class<'a>(
) -> impl parcel::Parser<'a, &'a [(usize, char)], ast::MatchCharacterClass> {
    parcel::or(character_group().map(Into::into), || {
        character_class().map(Into::into)
    })
}

fn match_character<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::MatchCharacter> {
    parcel::or(escaped_character(), || {
        unescaped_character().predicate(|c| !is_metacharacter(*c))
    })
    .map(ast::Char)
    .map(ast::MatchCharacter)
}

// Character Classes

fn character_group<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterGroup> {
    parcel::join(
        parcel::right(parcel::join(
            expect_character('['),
            parcel::optional(expect_character('^')).map(|negation| negation.is_some()),
        )),
        parcel::left(parcel::join(
            parcel::one_or_more(character_group_item()),
            expect_character(']'),
        )),
    )
    .map(|(negation, character_group_items)| match negation {
        true => ast::CharacterGroup::NegatedItems(character_group_items),
        false => ast::CharacterGroup::Items(character_group_items),
    })
}

fn character_group_item<'a>(
) -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterGroupItem> {
    parcel::or(character_class().map(Into::into), || {
        parcel::or(character_range().map(Into::into), || {
            group_char().map(Into::into)
        })
    })
}

fn character_class<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterClass> {
    use ast::CharacterClass;

    parcel::or(character_class_escape('w', CharacterClass::AnyWord), || {
        parcel::or(character_class_escape('W', CharacterClass::AnyWordInverted), || {
            parcel::or(character_class_escape('d', CharacterClass::AnyDecimalDigit), || {
                parcel::or(
                    character_class_escape('D', CharacterClass::AnyDecimalDigitInverted),
                    || {
                        parcel::or(character_class_escape('s', CharacterClass::AnyWhitespace), || {
                            character_class_escape('S', CharacterClass::AnyWhitespaceInverted)
                        })
                    },
                )
            })
        })
    })
}

fn character_class_escape<'a>(
    escape: char,
    class: ast::CharacterClass,
) -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterClass> {
    move |input: &'a [(usize, char)]| match input.get(0..2) {
        Some(&[(escape_pos, '\\'), (class_pos, next)]) if next == escape => Ok(MatchStatus::Match {
            span: escape_pos..class_pos + 1,
            remainder: &input[2..],
            inner: class,
        }),
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

fn character_range<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterRange> {
    parcel::join(
        group_char(),
        parcel::right(parcel::join(expect_character('-'), group_char())),
    )
    .map(|(lower_bound, upper_bound)| ast::CharacterRange::new(lower_bound, upper_bound))
    .predicate(|range| range.is_ordered())
}

// Quantifiers

fn quantifier<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Quantifier> {
    parcel::or(
        expect_character('*').map(|_| ast::Quantifier::ZeroOrMore),
        || {
            parcel::or(
                expect_character('+').map(|_| ast::Quantifier::OneOrMore),
                || expect_character('?').map(|_| ast::Quantifier::ZeroOrOne),
            )
        },
    )
}

// Terminals

/// A character inside a `[...]` group, where only `]` and `\` are special.
fn group_char<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::Char> {
    parcel::or(escaped_character(), || {
        unescaped_character().predicate(|c| *c != ']')
    })
    .map(ast::Char)
}

fn escaped_character<'a>() -> impl Parser<'a, &'a [(usize, char)], char> {
    move |input: &'a [(usize, char)]| match input.get(0..2) {
        Some(&[(escape_pos, '\\'), (to_escape_pos, to_escape)]) => {
            match char_to_escaped_equivalent(to_escape) {
                Some(escaped_char) => Ok(MatchStatus::Match {
                    span: escape_pos..to_escape_pos + 1,
                    remainder: &input[2..],
                    inner: escaped_char,
                }),
                None => Ok(MatchStatus::NoMatch(input)),
            }
        }
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

fn unescaped_character<'a>() -> impl Parser<'a, &'a [(usize, char)], char> {
    move |input: &'a [(usize, char)]| match input.first() {
        Some(&(next_pos, next)) if next != '\\' => Ok(MatchStatus::Match {
            span: next_pos..next_pos + 1,
            remainder: &input[1..],
            inner: next,
        }),
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

fn char_to_escaped_equivalent(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' | '.' | '*' | '+' | '?' | '|' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$'
        | '-' | '/' | '\'' | '\"' => Some(c),
        _ => None,
    }
}
