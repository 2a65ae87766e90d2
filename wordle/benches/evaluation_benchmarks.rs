use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use wordle::{evaluate, is_winning};

/// Benchmark evaluating a guess that shares no letters with the secret
fn bench_evaluate_disjoint(c: &mut Criterion) {
    c.bench_function("evaluate_disjoint", |b| {
        b.iter(|| evaluate("abcde", "fghij"));
    });
}

/// Benchmark evaluating an exact match
fn bench_evaluate_exact_match(c: &mut Criterion) {
    c.bench_function("evaluate_exact_match", |b| {
        b.iter(|| evaluate("crane", "crane"));
    });
}

/// Benchmark the worst case for the second pass: every guess letter
/// occurs somewhere in the secret but never in place
fn bench_evaluate_all_misplaced(c: &mut Criterion) {
    c.bench_function("evaluate_all_misplaced", |b| {
        b.iter(|| evaluate("abcde", "eabcd"));
    });
}

/// Benchmark evaluation across word lengths
fn bench_evaluate_by_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_by_length");

    for length in [5, 10, 20, 40].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{length}_chars")),
            length,
            |b, &length| {
                let secret: String = (0..length)
                    .map(|i| char::from(b'a' + (i % 26) as u8))
                    .collect();
                let guess: String = (0..length)
                    .map(|i| char::from(b'a' + ((i + 1) % 26) as u8))
                    .collect();
                b.iter(|| evaluate(&secret, &guess));
            },
        );
    }

    group.finish();
}

/// Benchmark a full six-guess game worth of evaluations
fn bench_evaluate_full_game(c: &mut Criterion) {
    let guesses = ["slate", "grain", "bread", "crowd", "track", "crane"];

    c.bench_function("evaluate_full_game", |b| {
        b.iter(|| {
            guesses
                .iter()
                .map(|guess| {
                    let statuses = evaluate("crane", guess);
                    is_winning(&statuses)
                })
                .collect::<Vec<_>>()
        });
    });
}

criterion_group!(
    evaluation,
    bench_evaluate_disjoint,
    bench_evaluate_exact_match,
    bench_evaluate_all_misplaced,
    bench_evaluate_by_length,
    bench_evaluate_full_game,
);

criterion_main!(evaluation);
