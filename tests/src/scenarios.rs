use std::sync::Arc;

use nfa_compiler::{ast, build, compile, PatternErrorKind};
use nfa_runtime::*;

#[test]
fn should_full_match_scenarios() {
    let input_output = [
        ("ab", "ab", true),
        ("ab", "a", false),
        ("a|b", "a", true),
        ("a|b", "b", true),
        ("a|b", "c", false),
        ("a*", "", true),
        ("a*", "aaaa", true),
        ("a*", "ab", false),
        ("(ab)+", "ababab", true),
        ("(ab)+", "aba", false),
        ("(ab)+", "", false),
    ];

    for (test_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
        let nfa = build(pattern).unwrap();
        assert_eq!((test_id, expected), (test_id, run(&nfa, input)))
    }
}

#[test]
fn should_search_for_leftmost_longest_span() {
    let input_output = [
        ("b", "aabaa", Some(Span::new(2, 3))),
        ("a+", "baaab", Some(Span::new(1, 4))),
        ("abcd|c", "xabcx", Some(Span::new(3, 4))),
        ("ab|abcd", "abcd", Some(Span::new(0, 4))),
        ("\\d+", "room 101, floor 3", Some(Span::new(5, 8))),
        ("a*", "bbb", Some(Span::new(0, 0))),
        ("z", "aabaa", None),
    ];

    for (test_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
        let nfa = build(pattern).unwrap();
        assert_eq!((test_id, expected), (test_id, find(&nfa, input)))
    }
}

#[test]
fn should_find_all_non_overlapping_spans() {
    let nfa = build("\\d+").unwrap();

    assert_eq!(
        vec![Span::new(5, 8), Span::new(16, 17)],
        find_all(&nfa, "room 101, floor 3")
    );
}

#[test]
fn should_accept_only_empty_input_for_empty_pattern() {
    let nfa = build("").unwrap();

    assert_eq!(1, nfa.state_count());
    assert_eq!(0, nfa.transition_count());
    assert!(nfa.is_accepting(nfa.start()));
    assert!(run(&nfa, ""));

    for input in ["a", " ", "ab"] {
        assert_eq!((input, false), (input, run(&nfa, input)));
    }
}

#[test]
fn should_reject_everything_for_empty_set() {
    let nfa = compile(ast::Regex::empty_set()).unwrap();

    for input in ["", "a", "ab"] {
        assert_eq!((input, false), (input, run(&nfa, input)));
        assert_eq!((input, None), (input, find(&nfa, input)));
    }
}

#[test]
fn should_treat_unmatched_symbols_as_rejection() {
    let nfa = build("[a-c]+").unwrap();

    assert!(!run(&nfa, "ab\u{1F600}"));
    assert!(run(&nfa, "abc"));
}

#[test]
fn should_terminate_and_stay_idempotent_on_nested_stars() {
    let nfa = build("(a*)*").unwrap();

    for state in nfa.states() {
        let once = nfa.epsilon_closure(&[state].into_iter().collect());
        let twice = nfa.epsilon_closure(&once);
        assert_eq!((state, &once), (state, &twice));
    }

    assert!(run(&nfa, ""));
    assert!(run(&nfa, "aaa"));
    assert!(!run(&nfa, "ab"));
}

#[test]
fn should_produce_identical_results_on_repeated_runs() {
    let patterns = ["(a|b)*abb", "a?a?a?aaa", "[^x]+y", "(ab)+"];
    let inputs = ["aababb", "aaa", "zzy", "abab", "xy", ""];

    for pattern in patterns {
        let nfa = build(pattern).unwrap();
        let mut simulation = Simulation::new(&nfa);

        for input in inputs {
            let expected = (run(&nfa, input), find(&nfa, input));
            for _ in 0..3 {
                assert_eq!(
                    (pattern, input, expected),
                    (pattern, input, (run(&nfa, input), find(&nfa, input)))
                );
                assert_eq!(
                    (pattern, input, expected),
                    (
                        pattern,
                        input,
                        (simulation.is_match(input), simulation.find(input))
                    )
                );
            }
        }
    }
}

#[test]
fn should_match_from_many_threads_over_one_automaton() {
    let nfa = Arc::new(build("(a|b)*abb").unwrap());

    let handles: Vec<_> = ["abb", "aabb", "babb", "ab", "abba"]
        .into_iter()
        .map(|input| {
            let nfa = Arc::clone(&nfa);
            std::thread::spawn(move || (input, run(&nfa, input)))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(
        vec![
            ("abb", true),
            ("aabb", true),
            ("babb", true),
            ("ab", false),
            ("abba", false)
        ],
        results
    );
}

#[test]
fn should_reject_malformed_patterns_without_an_automaton() {
    let input_output = [
        ("a(b", PatternErrorKind::UnclosedGroup, 1),
        ("a)b", PatternErrorKind::UnbalancedGroup, 1),
        ("ab|", PatternErrorKind::EmptyAlternative, 2),
        ("+", PatternErrorKind::DanglingQuantifier, 0),
        ("\\p", PatternErrorKind::UnknownEscape, 0),
        ("[b-a]", PatternErrorKind::InvalidCharacterGroup, 1),
    ];

    for (test_id, (pattern, kind, position)) in input_output.into_iter().enumerate() {
        let res = build(pattern).map_err(|e| (e.kind().clone(), e.position()));
        assert_eq!((test_id, Err((kind, position))), (test_id, res));
    }
}

#[test]
fn should_trace_accepting_path_through_compiled_automaton() {
    let nfa = build("ab").unwrap();
    let path = trace(&nfa, "ab").unwrap();

    assert_eq!(&[Some('a'), None, Some('b')], path.consumed());
    assert_eq!("0 a 1  2 b 3", path.to_string());
    assert!(trace(&nfa, "a").is_none());
}
