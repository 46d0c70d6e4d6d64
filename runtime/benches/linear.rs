use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nfa_runtime::*;

/// Assembles `(a?){n}a{n}`, which forces a backtracking matcher through
/// every combination of the optional prefixes on an input of `n` `a`s.
fn optional_prefix_automaton(n: usize) -> Nfa {
    let mut builder = NfaBuilder::new();
    let states = builder.add_states(2 * n + 1);

    for (idx, window) in states.windows(2).enumerate() {
        let (from, to) = (window[0], window[1]);
        builder
            .add_transition(from, Condition::Literal('a'), to)
            .unwrap();
        if idx < n {
            builder.add_transition(from, Condition::Epsilon, to).unwrap();
        }
    }

    builder.set_start(states[0]).unwrap();
    builder.set_accepting(states[2 * n]).unwrap();
    builder.finalize().unwrap()
}

fn pad_input_to_length_with(suffix: &str, pad_str: &str, len: usize) -> String {
    let suffix_len = suffix.chars().count();

    if suffix_len > len {
        "".to_string()
    } else {
        pad_str
            .chars()
            .cycle()
            .take(len - suffix_len)
            .chain(suffix.chars())
            .collect()
    }
}

pub fn pathological_pattern_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("optional prefix pattern comparison");

    (1..8)
        .map(|exponent| 2usize.pow(exponent))
        .for_each(|n| {
            let nfa = optional_prefix_automaton(n);
            let input = "a".repeat(n);

            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(
                BenchmarkId::new("pattern and input of size", n),
                &input,
                |b, input| b.iter(|| assert!(run(&nfa, input))),
            );
        })
}

pub fn linear_input_size_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("exponential input length comparison");
    let nfa = optional_prefix_automaton(4);
    let pad = "xy";

    (4..14)
        .map(|exponent| 2usize.pow(exponent))
        .map(|input_len| (pad_input_to_length_with("aaaa", pad, input_len), input_len))
        .for_each(|(input, sample_size)| {
            group.throughput(Throughput::Elements(sample_size as u64));
            group.bench_with_input(
                BenchmarkId::new("input length of size", sample_size),
                &(input, sample_size),
                |b, (input, input_size)| {
                    let expected = Span::new(*input_size - 4, *input_size);

                    b.iter(|| assert_eq!(Some(expected), find(&nfa, input)))
                },
            );
        })
}

criterion_group!(
    benches,
    pathological_pattern_comparison,
    linear_input_size_comparison
);
criterion_main!(benches);
