use nfa_compiler::build;
use nfa_runtime::{run, Nfa};

/// Operands chosen to cover literals, alternation, every quantifier and the
/// empty string.
const OPERANDS: [&str; 6] = ["a", "b*", "a|c", "(ab)+", "c?", "b?a*"];

/// Every string over `{a, b, c}` of length 0 through 5.
fn all_inputs() -> Vec<String> {
    let mut inputs = vec![String::new()];
    let mut previous = vec![String::new()];

    for _ in 0..5 {
        previous = previous
            .iter()
            .flat_map(|prefix| ['a', 'b', 'c'].map(|c| format!("{}{}", prefix, c)))
            .collect();
        inputs.extend(previous.iter().cloned());
    }

    inputs
}

fn assert_same_language(left: (&str, &Nfa), right: (&str, &Nfa), inputs: &[String]) {
    let ((left_pattern, left_nfa), (right_pattern, right_nfa)) = (left, right);

    for input in inputs {
        assert_eq!(
            (left_pattern, input.as_str(), run(left_nfa, input)),
            (left_pattern, input.as_str(), run(right_nfa, input)),
            "diverges from {}",
            right_pattern
        );
    }
}

#[test]
fn should_generate_every_short_input() {
    // 1 + 3 + 9 + 27 + 81 + 243
    assert_eq!(364, all_inputs().len());
}

#[test]
fn should_concatenate_associatively() {
    let inputs = all_inputs();

    for a in OPERANDS {
        for b in OPERANDS {
            for c in OPERANDS {
                let right_nested = format!("({})(({})({}))", a, b, c);
                let left_nested = format!("(({})({}))({})", a, b, c);
                let (right_nfa, left_nfa) =
                    (build(&right_nested).unwrap(), build(&left_nested).unwrap());

                assert_same_language(
                    (&right_nested, &right_nfa),
                    (&left_nested, &left_nfa),
                    &inputs,
                );
            }
        }
    }
}

#[test]
fn should_treat_nested_stars_as_single_star() {
    let inputs = all_inputs();

    for a in OPERANDS {
        let single = format!("({})*", a);
        let nested = format!("(({})*)*", a);
        let (single_nfa, nested_nfa) = (build(&single).unwrap(), build(&nested).unwrap());

        assert_same_language((&single, &single_nfa), (&nested, &nested_nfa), &inputs);
    }
}

#[test]
fn should_define_plus_and_optional_by_their_expansions() {
    let inputs = all_inputs();

    for a in OPERANDS {
        let (operand, plus, expanded_plus, optional) = (
            build(a).unwrap(),
            format!("({})+", a),
            format!("({})({})*", a, a),
            format!("({})?", a),
        );
        let (plus_nfa, expanded_plus_nfa, optional_nfa) = (
            build(&plus).unwrap(),
            build(&expanded_plus).unwrap(),
            build(&optional).unwrap(),
        );

        assert_same_language(
            (&plus, &plus_nfa),
            (&expanded_plus, &expanded_plus_nfa),
            &inputs,
        );

        for input in &inputs {
            let expected = input.is_empty() || run(&operand, input);
            assert_eq!(
                (optional.as_str(), input.as_str(), expected),
                (optional.as_str(), input.as_str(), run(&optional_nfa, input))
            );
        }
    }
}

#[test]
fn should_stay_within_linear_construction_bound() {
    let patterns = [
        "a",
        "ab|cd|ef",
        "(a*)*",
        "((a|b)+c?)*",
        "a?a?a?a?aaaa",
        "[a-z0-9_]+@[a-z]+\\.(com|org)",
        "[^\\s]*\\d+.",
        "(((((a)))))",
        "(a|b|c|d|e|f|g)+",
        "",
    ];

    for pattern in patterns {
        let nfa = build(pattern).unwrap();
        let len = pattern.chars().count();

        assert!(
            nfa.state_count() <= 2 * len + 1,
            "{} has {} states",
            pattern,
            nfa.state_count()
        );
        assert!(
            nfa.transition_count() <= 4 * len + 1,
            "{} has {} transitions",
            pattern,
            nfa.transition_count()
        );
    }
}
