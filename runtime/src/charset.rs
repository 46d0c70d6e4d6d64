//! Character predicates evaluated by transitions.

use std::fmt::Display;

/// Represents a type that can be used as a comparative character set.
trait CharacterRangeSetVerifiable {
    fn in_set(&self, value: char) -> bool;

    fn not_in_set(&self, value: char) -> bool {
        !self.in_set(value)
    }
}

impl CharacterRangeSetVerifiable for std::ops::RangeInclusive<char> {
    fn in_set(&self, value: char) -> bool {
        self.contains(&value)
    }
}

impl CharacterRangeSetVerifiable for char {
    fn in_set(&self, value: char) -> bool {
        *self == value
    }
}

impl<CRSV: CharacterRangeSetVerifiable> CharacterRangeSetVerifiable for Vec<CRSV> {
    fn in_set(&self, value: char) -> bool {
        self.iter().any(|r| r.in_set(value))
    }
}

/// The escaped shorthand classes, i.e. `\d`, `\w`, `\s`, their complements
/// and the any-character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    /// `\d`, an ASCII decimal digit.
    Digit,
    /// `\D`
    NotDigit,
    /// `\w`, an ASCII letter, digit or underscore.
    Word,
    /// `\W`
    NotWord,
    /// `\s`, one of ` `, `\t`, `\n`, `\r`, `\x0b` or `\x0c`.
    Whitespace,
    /// `\S`
    NotWhitespace,
    /// Any character other than `\r` and `\n`.
    AnyExceptNewline,
}

impl CharacterClass {
    /// Looks up a class by the character following its escape, i.e. `d` for
    /// `\d`. `.` maps to [CharacterClass::AnyExceptNewline].
    pub fn from_escape(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Digit),
            'D' => Some(Self::NotDigit),
            'w' => Some(Self::Word),
            'W' => Some(Self::NotWord),
            's' => Some(Self::Whitespace),
            'S' => Some(Self::NotWhitespace),
            '.' => Some(Self::AnyExceptNewline),
            _ => None,
        }
    }

    /// The character written after the escape for this class.
    pub fn escape(&self) -> char {
        match self {
            Self::Digit => 'd',
            Self::NotDigit => 'D',
            Self::Word => 'w',
            Self::NotWord => 'W',
            Self::Whitespace => 's',
            Self::NotWhitespace => 'S',
            Self::AnyExceptNewline => '.',
        }
    }

    /// Returns `true` if the class contains `value`.
    pub fn contains(&self, value: char) -> bool {
        self.in_set(value)
    }
}

impl CharacterRangeSetVerifiable for CharacterClass {
    fn in_set(&self, value: char) -> bool {
        let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
        // unlike `char::is_ascii_whitespace`, includes the vertical tab.
        let is_space = |c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c');

        match self {
            Self::Digit => value.is_ascii_digit(),
            Self::NotDigit => !value.is_ascii_digit(),
            Self::Word => is_word(value),
            Self::NotWord => !is_word(value),
            Self::Whitespace => is_space(value),
            Self::NotWhitespace => !is_space(value),
            Self::AnyExceptNewline => value != '\n' && value != '\r',
        }
    }
}

impl Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\\{}", self.escape())
    }
}

/// Represents a runtime dispatchable set of characters.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterAlphabet {
    /// Represents a range of values i.e. `0-9`, `a-z`, `A-Z`, etc...
    Range(std::ops::RangeInclusive<char>),
    /// Represents an explicitly defined set of values. i.e. `[abz]`, `[127]`
    Explicit(Vec<char>),
    /// Represents a shorthand class, i.e. `\d`.
    Class(CharacterClass),
    /// Any member of the contained alphabets, i.e. `[a-z\d_]`.
    Union(Vec<CharacterAlphabet>),
}

impl CharacterRangeSetVerifiable for CharacterAlphabet {
    fn in_set(&self, value: char) -> bool {
        match self {
            CharacterAlphabet::Range(r) => r.in_set(value),
            CharacterAlphabet::Explicit(v) => v.in_set(value),
            CharacterAlphabet::Class(class) => class.in_set(value),
            CharacterAlphabet::Union(alphabets) => alphabets.iter().any(|a| a.in_set(value)),
        }
    }
}

/// Denotes whether a given set is inclusive or exclusive to a match.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SetMembership {
    /// States that a set is inclusive of a value, i.e. the value is a member of
    /// the set.
    Inclusive,
    /// States that a set is exclusive of a value, i.e. the value is not a
    /// member of the set.
    Exclusive,
}

/// Representing a runtime-dispatchable set of characters by associating a sets
/// membership to a character alphabet.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSet {
    membership: SetMembership,
    set: CharacterAlphabet,
}

impl CharacterSet {
    pub fn inclusive(set: CharacterAlphabet) -> Self {
        Self {
            membership: SetMembership::Inclusive,
            set,
        }
    }

    pub fn exclusive(set: CharacterAlphabet) -> Self {
        Self {
            membership: SetMembership::Exclusive,
            set,
        }
    }

    /// Returns `true` if `value` satisfies the set's membership.
    pub fn contains(&self, value: char) -> bool {
        self.in_set(value)
    }
}

impl CharacterRangeSetVerifiable for CharacterSet {
    fn in_set(&self, value: char) -> bool {
        match &self.membership {
            SetMembership::Inclusive => self.set.in_set(value),
            SetMembership::Exclusive => self.set.not_in_set(value),
        }
    }
}

impl Display for CharacterAlphabet {
    /// Formats the members as they would appear between a group's brackets.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CharacterAlphabet::Range(r) => {
                write!(f, "{}-{}", GroupMember(*r.start()), GroupMember(*r.end()))
            }
            CharacterAlphabet::Explicit(chars) => chars
                .iter()
                .try_for_each(|&c| write!(f, "{}", GroupMember(c))),
            CharacterAlphabet::Class(class) => Display::fmt(class, f),
            CharacterAlphabet::Union(alphabets) => {
                alphabets.iter().try_for_each(|a| Display::fmt(a, f))
            }
        }
    }
}

impl Display for CharacterSet {
    /// Formats as a bracketed group, i.e. `[a-c\d]` or `[^a-c\d]`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.membership {
            SetMembership::Inclusive => write!(f, "[{}]", self.set),
            SetMembership::Exclusive => write!(f, "[^{}]", self.set),
        }
    }
}

/// A single character as written inside a group.
struct GroupMember(char);

impl Display for GroupMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            '\n' => write!(f, "\\n"),
            '\t' => write!(f, "\\t"),
            '\r' => write!(f, "\\r"),
            c @ ('\\' | ']' | '[' | '^' | '-') => write!(f, "\\{}", c),
            c => write!(f, "{}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_match_shorthand_classes() {
        let input_output = [
            (CharacterClass::Digit, "0189", "a _"),
            (CharacterClass::NotDigit, "a _", "0189"),
            (CharacterClass::Word, "aZ0_", " -."),
            (CharacterClass::NotWord, " -.", "aZ0_"),
            (CharacterClass::Whitespace, " \t\n\r\x0b\x0c", "a0"),
            (CharacterClass::NotWhitespace, "a0", " \t\n\r\x0b\x0c"),
            (CharacterClass::AnyExceptNewline, "a \t.", "\r\n"),
        ];

        for (test_id, (class, members, non_members)) in input_output.into_iter().enumerate() {
            assert!(
                members.chars().all(|c| class.contains(c)),
                "{}: {:?}",
                test_id,
                class
            );
            assert!(
                non_members.chars().all(|c| !class.contains(c)),
                "{}: {:?}",
                test_id,
                class
            );
        }
    }

    #[test]
    fn should_round_trip_class_escapes() {
        for c in ['d', 'D', 'w', 'W', 's', 'S', '.'] {
            assert_eq!(Some(c), CharacterClass::from_escape(c).map(|cc| cc.escape()));
        }

        assert_eq!(None, CharacterClass::from_escape('q'));
    }

    #[test]
    fn should_respect_set_membership() {
        let alphabet = CharacterAlphabet::Union(vec![
            CharacterAlphabet::Range('a'..='c'),
            CharacterAlphabet::Class(CharacterClass::Digit),
        ]);

        let inclusive = CharacterSet::inclusive(alphabet.clone());
        let exclusive = CharacterSet::exclusive(alphabet);

        assert!(inclusive.contains('b') && inclusive.contains('7'));
        assert!(!inclusive.contains('z'));
        assert!(!exclusive.contains('b') && !exclusive.contains('7'));
        assert!(exclusive.contains('z'));
    }

    #[test]
    fn should_format_sets_as_groups() {
        let alphabet = CharacterAlphabet::Union(vec![
            CharacterAlphabet::Range('a'..='c'),
            CharacterAlphabet::Class(CharacterClass::Digit),
            CharacterAlphabet::Explicit(vec!['_', '-', ']', '\n']),
        ]);

        assert_eq!(
            "[a-c\\d_\\-\\]\\n]",
            CharacterSet::inclusive(alphabet.clone()).to_string()
        );
        assert_eq!(
            "[^a-c\\d_\\-\\]\\n]",
            CharacterSet::exclusive(alphabet).to_string()
        );
    }
}
