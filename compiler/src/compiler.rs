//! Provides methods and types to facilitate the compilation of a parsed
//! pattern ast into a nondeterministic finite automaton, by Thompson's
//! construction.
//!
//! # Example
//!
//! ```
//! use nfa_compiler::ast::*;
//! use nfa_compiler::compile;
//! use nfa_runtime::run;
//!
//! // approximate to `ab`
//! let regex_ast = Regex(Expression(vec![SubExpression(vec![
//!     SubExpressionItem::Match(Match::WithoutQuantifier {
//!         item: MatchItem::MatchCharacter(MatchCharacter(Char('a'))),
//!      }),
//!      SubExpressionItem::Match(Match::WithoutQuantifier {
//!          item: MatchItem::MatchCharacter(MatchCharacter(Char('b'))),
//!     }),
//! ])]));
//!
//! let nfa = compile(regex_ast).unwrap();
//!
//! assert_eq!(4, nfa.state_count());
//! assert!(run(&nfa, "ab"));
//! assert!(!run(&nfa, "a"));
//! ```

use super::ast;
use nfa_runtime::*;

/// A partially assembled automaton with a single entry state and the set
/// of states that are still missing outgoing edges to whatever follows.
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    start: StateId,
    exits: Vec<StateId>,
}

/// Compiles a parsed pattern into an [Nfa] whose accepting states are the
/// exits of the outermost fragment.
pub fn compile(regex_ast: ast::Regex) -> Result<Nfa, BuildError> {
    let mut builder = NfaBuilder::new();
    let ast::Regex(expr) = regex_ast;

    let fragment = expression(&mut builder, expr)?;
    builder.set_start(fragment.start)?;
    for exit in fragment.exits {
        builder.set_accepting(exit)?;
    }

    let nfa = builder.finalize()?;
    log::debug!(
        "compiled automaton with {} states and {} transitions",
        nfa.state_count(),
        nfa.transition_count()
    );

    Ok(nfa)
}

fn expression(builder: &mut NfaBuilder, expr: ast::Expression) -> Result<Fragment, BuildError> {
    let ast::Expression(subexprs) = expr;

    let mut branches = Vec::with_capacity(subexprs.len());
    for subexpr in subexprs {
        branches.push(subexpression(builder, subexpr)?);
    }

    // a lone branch needs no dispatching state.
    match <[Fragment; 1]>::try_from(branches) {
        Ok([branch]) => Ok(branch),
        Err(branches) => alternation(builder, branches),
    }
}

fn subexpression(
    builder: &mut NfaBuilder,
    subexpr: ast::SubExpression,
) -> Result<Fragment, BuildError> {
    let ast::SubExpression(items) = subexpr;

    let mut fragment = None;
    for item in items {
        let next = match item {
            ast::SubExpressionItem::Match(m) => r#match(builder, m)?,
            ast::SubExpressionItem::Group(g) => group(builder, g)?,
        };

        fragment = match fragment {
            Some(prev) => Some(concatenation(builder, prev, next)?),
            None => Some(next),
        };
    }

    match fragment {
        Some(fragment) => Ok(fragment),
        None => Ok(empty(builder)),
    }
}

fn group(builder: &mut NfaBuilder, g: ast::Group) -> Result<Fragment, BuildError> {
    match g {
        ast::Group::WithoutQuantifier { expression: expr } => expression(builder, expr),
        ast::Group::WithQuantifier {
            expression: expr,
            quantifier,
        } => {
            let fragment = expression(builder, expr)?;
            quantified(builder, fragment, quantifier)
        }
    }
}

fn r#match(builder: &mut NfaBuilder, m: ast::Match) -> Result<Fragment, BuildError> {
    match m {
        ast::Match::WithoutQuantifier { item } => match_item(builder, item),
        ast::Match::WithQuantifier { item, quantifier } => {
            let fragment = match_item(builder, item)?;
            quantified(builder, fragment, quantifier)
        }
    }
}

fn match_item(builder: &mut NfaBuilder, item: ast::MatchItem) -> Result<Fragment, BuildError> {
    match item {
        ast::MatchItem::MatchAnyCharacter => literal(
            builder,
            Condition::Class(CharacterClass::AnyExceptNewline),
        ),
        ast::MatchItem::MatchCharacter(ast::MatchCharacter(ast::Char(c))) => {
            literal(builder, Condition::Literal(c))
        }
        ast::MatchItem::MatchCharacterClass(ast::MatchCharacterClass::CharacterClass(cc)) => {
            literal(builder, Condition::Class(character_class(cc)))
        }
        ast::MatchItem::MatchCharacterClass(ast::MatchCharacterClass::CharacterGroup(cg)) => {
            character_group(builder, cg)
        }
    }
}

fn quantified(
    builder: &mut NfaBuilder,
    fragment: Fragment,
    quantifier: ast::Quantifier,
) -> Result<Fragment, BuildError> {
    match quantifier {
        ast::Quantifier::ZeroOrMore => star(builder, fragment),
        ast::Quantifier::OneOrMore => plus(builder, fragment),
        ast::Quantifier::ZeroOrOne => optional(builder, fragment),
    }
}

// fragments

/// A single state that is both the entry and the exit, matching only the
/// empty string.
fn empty(builder: &mut NfaBuilder) -> Fragment {
    let state = builder.add_state();

    Fragment {
        start: state,
        exits: vec![state],
    }
}

/// Two states joined by one consuming transition.
fn literal(builder: &mut NfaBuilder, condition: Condition) -> Result<Fragment, BuildError> {
    let (start, exit) = (builder.add_state(), builder.add_state());
    builder.add_transition(start, condition, exit)?;

    Ok(Fragment {
        start,
        exits: vec![exit],
    })
}

fn concatenation(
    builder: &mut NfaBuilder,
    first: Fragment,
    second: Fragment,
) -> Result<Fragment, BuildError> {
    for exit in first.exits {
        builder.add_transition(exit, Condition::Epsilon, second.start)?;
    }

    Ok(Fragment {
        start: first.start,
        exits: second.exits,
    })
}

/// A new entry state with an epsilon edge to each branch. With no branches
/// the fragment has no exits and accepts nothing.
fn alternation(builder: &mut NfaBuilder, branches: Vec<Fragment>) -> Result<Fragment, BuildError> {
    let start = builder.add_state();
    let mut exits = vec![];

    for branch in branches {
        builder.add_transition(start, Condition::Epsilon, branch.start)?;
        exits.extend(branch.exits);
    }

    Ok(Fragment { start, exits })
}

fn star(builder: &mut NfaBuilder, inner: Fragment) -> Result<Fragment, BuildError> {
    let (start, exit) = (builder.add_state(), builder.add_state());

    builder.add_transition(start, Condition::Epsilon, inner.start)?;
    builder.add_transition(start, Condition::Epsilon, exit)?;
    for inner_exit in inner.exits {
        builder.add_transition(inner_exit, Condition::Epsilon, inner.start)?;
        builder.add_transition(inner_exit, Condition::Epsilon, exit)?;
    }

    Ok(Fragment {
        start,
        exits: vec![exit],
    })
}

/// Loops the fragment's exits back to its entry rather than following it
/// with a starred copy, keeping the automaton linear in the pattern.
fn plus(builder: &mut NfaBuilder, inner: Fragment) -> Result<Fragment, BuildError> {
    let exit = builder.add_state();

    for inner_exit in inner.exits {
        builder.add_transition(inner_exit, Condition::Epsilon, inner.start)?;
        builder.add_transition(inner_exit, Condition::Epsilon, exit)?;
    }

    Ok(Fragment {
        start: inner.start,
        exits: vec![exit],
    })
}

fn optional(builder: &mut NfaBuilder, inner: Fragment) -> Result<Fragment, BuildError> {
    let bypass = empty(builder);
    alternation(builder, vec![inner, bypass])
}

// character classes

/// One consuming transition per item of an inclusive group. A negated group
/// can't be expressed as a union of edges, so it becomes a single
/// exclusive set.
fn character_group(
    builder: &mut NfaBuilder,
    cg: ast::CharacterGroup,
) -> Result<Fragment, BuildError> {
    match cg {
        ast::CharacterGroup::Items(items) => {
            let (start, exit) = (builder.add_state(), builder.add_state());
            for item in items {
                builder.add_transition(start, character_group_item_to_condition(item), exit)?;
            }

            Ok(Fragment {
                start,
                exits: vec![exit],
            })
        }
        ast::CharacterGroup::NegatedItems(items) => {
            let alphabet = CharacterAlphabet::Union(
                items
                    .into_iter()
                    .map(character_group_item_to_alphabet)
                    .collect(),
            );

            literal(builder, Condition::Set(CharacterSet::exclusive(alphabet)))
        }
    }
}

fn character_group_item_to_condition(cgi: ast::CharacterGroupItem) -> Condition {
    use ast::Char;

    match cgi {
        ast::CharacterGroupItem::CharacterClass(cc) => Condition::Class(character_class(cc)),
        ast::CharacterGroupItem::CharacterRange(Char(lower), Char(upper)) => {
            Condition::Range(lower..=upper)
        }
        ast::CharacterGroupItem::Char(Char(c)) => Condition::Literal(c),
    }
}

fn character_group_item_to_alphabet(cgi: ast::CharacterGroupItem) -> CharacterAlphabet {
    use ast::Char;

    match cgi {
        ast::CharacterGroupItem::CharacterClass(cc) => {
            CharacterAlphabet::Class(character_class(cc))
        }
        ast::CharacterGroupItem::CharacterRange(Char(lower), Char(upper)) => {
            CharacterAlphabet::Range(lower..=upper)
        }
        ast::CharacterGroupItem::Char(Char(c)) => CharacterAlphabet::Explicit(vec![c]),
    }
}

fn character_class(cc: ast::CharacterClass) -> CharacterClass {
    match cc {
        ast::CharacterClass::AnyWord => CharacterClass::Word,
        ast::CharacterClass::AnyWordInverted => CharacterClass::NotWord,
        ast::CharacterClass::AnyDecimalDigit => CharacterClass::Digit,
        ast::CharacterClass::AnyDecimalDigitInverted => CharacterClass::NotDigit,
        ast::CharacterClass::AnyWhitespace => CharacterClass::Whitespace,
        ast::CharacterClass::AnyWhitespaceInverted => CharacterClass::NotWhitespace,
    }
}
