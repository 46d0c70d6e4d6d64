//! The parsed form of a pattern.
//!
//! A pattern is an alternation of concatenations. Either level may be
//! empty: an [Expression] with no branches matches nothing, a
//! [SubExpression] with no items matches only the empty string.

#[derive(Debug, Clone, PartialEq)]
pub struct Regex(pub Expression);

impl Regex {
    /// A pattern that matches no input, not even the empty string.
    pub fn empty_set() -> Self {
        Self(Expression(vec![]))
    }

    /// A pattern that matches only the empty string.
    pub fn empty_string() -> Self {
        Self(Expression(vec![SubExpression(vec![])]))
    }
}

// Expression

/// An alternation of its branches.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression(pub Vec<SubExpression>);

/// A concatenation of its items.
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression(pub Vec<SubExpressionItem>);

#[derive(Debug, Clone, PartialEq)]
pub enum SubExpressionItem {
    Match(Match),
    Group(Group),
}

impl From<Match> for SubExpressionItem {
    fn from(src: Match) -> Self {
        Self::Match(src)
    }
}

impl From<Group> for SubExpressionItem {
    fn from(src: Group) -> Self {
        Self::Group(src)
    }
}

// Group

#[derive(Debug, Clone, PartialEq)]
pub enum Group {
    WithQuantifier {
        expression: Expression,
        quantifier: Quantifier,
    },
    WithoutQuantifier {
        expression: Expression,
    },
}

// Matchers

#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    WithQuantifier {
        item: MatchItem,
        quantifier: Quantifier,
    },
    WithoutQuantifier {
        item: MatchItem,
    },
}

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone, PartialEq)]
pub enum MatchItem {
    MatchAnyCharacter,
    MatchCharacterClass(MatchCharacterClass),
    MatchCharacter(MatchCharacter),
}

impl From<MatchCharacterClass> for MatchItem {
    fn from(src: MatchCharacterClass) -> Self {
        Self::MatchCharacterClass(src)
    }
}

impl From<MatchCharacter> for MatchItem {
    fn from(src: MatchCharacter) -> Self {
        Self::MatchCharacter(src)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchCharacterClass {
    CharacterGroup(CharacterGroup),
    CharacterClass(CharacterClass),
}

impl From<CharacterGroup> for MatchCharacterClass {
    fn from(src: CharacterGroup) -> Self {
        Self::CharacterGroup(src)
    }
}

impl From<CharacterClass> for MatchCharacterClass {
    fn from(src: CharacterClass) -> Self {
        Self::CharacterClass(src)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCharacter(pub Char);

// Character Classes

#[derive(Debug, Clone, PartialEq)]
pub enum CharacterGroup {
    NegatedItems(Vec<CharacterGroupItem>),
    Items(Vec<CharacterGroupItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CharacterGroupItem {
    CharacterClass(CharacterClass),
    CharacterRange(Char, Char),
    Char(Char),
}

impl From<CharacterClass> for CharacterGroupItem {
    fn from(src: CharacterClass) -> Self {
        Self::CharacterClass(src)
    }
}

impl From<CharacterRange> for CharacterGroupItem {
    fn from(src: CharacterRange) -> Self {
        let CharacterRange {
            lower_bound,
            upper_bound,
        } = src;

        Self::CharacterRange(lower_bound, upper_bound)
    }
}

impl From<Char> for CharacterGroupItem {
    fn from(src: Char) -> Self {
        Self::Char(src)
    }
}

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterClass {
    AnyWord,
    AnyWordInverted,
    AnyDecimalDigit,
    AnyDecimalDigitInverted,
    AnyWhitespace,
    AnyWhitespaceInverted,
}

impl CharacterClass {
    /// Looks up a class by the character following its escape.
    pub fn from_escape(c: char) -> Option<Self> {
        match c {
            'w' => Some(Self::AnyWord),
            'W' => Some(Self::AnyWordInverted),
            'd' => Some(Self::AnyDecimalDigit),
            'D' => Some(Self::AnyDecimalDigitInverted),
            's' => Some(Self::AnyWhitespace),
            'S' => Some(Self::AnyWhitespaceInverted),
            _ => None,
        }
    }
}

pub struct CharacterRange {
    lower_bound: Char,
    upper_bound: Char,
}

impl CharacterRange {
    pub fn new(lower_bound: Char, upper_bound: Char) -> Self {
        Self {
            lower_bound,
            upper_bound,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.lower_bound.as_char() <= self.upper_bound.as_char()
    }
}

// Quantifiers

/// Represents all variants of quantifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Represents a quantifier representing a match of zero or more of the
    /// preceeding field. Represented by the `*` quantifier.
    ZeroOrMore,
    /// Represents a quantifier representing a match of one or more of the
    /// preceeding field. Represented by the `+` quantifier.
    OneOrMore,
    /// Represents an optional quantifier representing a match of zero or one
    /// field. Represented by the `?` quantifier.
    ZeroOrOne,
}

// Terminals

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Char(pub char);

impl Char {
    pub fn as_char(&self) -> char {
        self.0
    }
}
