use nfa_compiler::{build, ToText};
use nfa_runtime::text::{Document, FromText, TextErrorKind};
use nfa_runtime::*;

/// Binary strings ending in `01`, with an epsilon cycle between states 0
/// and 3.
const ENDS_IN_ZERO_ONE: &str = "type: nfa
states: 4
final: 2
rules:
0->0 0 1
0->1 0
1->2 1
0->3 \\e
3->0 \\e

input: 1101
";

#[test]
fn should_trace_path_for_document_input() {
    let doc = Document::from_text(ENDS_IN_ZERO_ONE).unwrap();
    let input = doc.input.as_deref().unwrap();

    assert!(run(&doc.automaton, input));
    assert_eq!(
        "0 1 0 1 0 0 1 1 2",
        trace(&doc.automaton, input).unwrap().to_string()
    );
    assert!(trace(&doc.automaton, "1100").is_none());
}

#[test]
fn should_run_documents_against_inputs() {
    let input_output = [
        (ENDS_IN_ZERO_ONE, "01", true),
        (ENDS_IN_ZERO_ONE, "0110", false),
        (
            "type: nfa\nstates: 2\nfinal: 1\nrules:\n0->1 \\w\n1->1 \\w \\s\n",
            "ab c",
            true,
        ),
        (
            "type: nfa\nstates: 2\nfinal: 1\nrules:\n0->1 \\D\n",
            "7",
            false,
        ),
        ("type: nfa\nstates: 3\nfinal: 2\nrules:\n0->1  \n1->2 \\.\n", " x", true),
        ("type: nfa\nstates: 3\nfinal: 2\nrules:\n0->1  \n1->2 \\.\n", " \n", false),
        ("type: nfa\nstates: 1\nfinal: 0\n", "", true),
        ("type: nfa\nstates: 1\nfinal:\n", "", false),
    ];

    for (test_id, (text, input, expected)) in input_output.into_iter().enumerate() {
        let nfa = Nfa::from_text(text).unwrap();
        assert_eq!((test_id, expected), (test_id, run(&nfa, input)));
    }
}

#[test]
fn should_reread_compiled_patterns_with_equal_language() {
    let patterns = ["(ab)+", "a|b", "[a-c]x*", "\\d\\s\\w", ". ."];
    let inputs = ["ab", "abab", "", "b", "axx", "cx", "1 _", "2\t9", "a b", "a\nb"];

    for pattern in patterns {
        let nfa = build(pattern).unwrap();
        let text = nfa.to_text().unwrap();
        let reread = Nfa::from_text(&text).unwrap();

        for input in inputs {
            assert_eq!(
                (pattern, input, run(&nfa, input)),
                (pattern, input, run(&reread, input))
            );
        }
    }
}

#[test]
fn should_reject_malformed_documents() {
    let input_output = [
        ("states: 1\n", TextErrorKind::MissingType, Some(1)),
        ("type: dfa\nstates: 1\n", TextErrorKind::UnsupportedType, Some(2)),
        ("type: nfa\nfinal: 0\n", TextErrorKind::StatesUndeclared, Some(2)),
        (
            "type: nfa\nstates: 1\nstates: 1\n",
            TextErrorKind::DuplicateStates,
            Some(3),
        ),
        ("type: nfa\nstates: x\n", TextErrorKind::InvalidInteger, Some(2)),
        (
            "type: nfa\nstates: 2\nrules:\n0->1 c-a\n",
            TextErrorKind::InvalidToken,
            Some(4),
        ),
        (
            "type: nfa\nstates: 2\nrules:\n0->1 \\q\n",
            TextErrorKind::UnknownClass,
            Some(4),
        ),
        (
            "type: nfa\nstates: 2\nrules:\n0->5 a\n",
            TextErrorKind::InvalidAutomaton,
            Some(4),
        ),
        ("type: nfa\nstates: 2\nhello\n", TextErrorKind::UnexpectedLine, Some(3)),
    ];

    for (test_id, (text, kind, line)) in input_output.into_iter().enumerate() {
        let res = Nfa::from_text(text).map_err(|e| (e.kind().clone(), e.line()));
        assert_eq!((test_id, Err((kind, line))), (test_id, res));
    }
}
