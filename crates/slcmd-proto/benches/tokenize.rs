//! Benchmarks for message tokenizing and invocation extraction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slcmd_proto::{tokenize, Invocation, InvocationStyle};

/// Short command with no arguments
const SIMPLE_MESSAGE: &str = "!ping";

/// Command with a quoted argument
const QUOTED_MESSAGE: &str = r#"!ban "John Doe" 10 "spamming links in #general""#;

/// Long free-text argument list
const LONG_MESSAGE: &str = "!echo the quick brown fox jumps over the lazy dog and keeps running until the end of the line";

fn benchmark_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tokenize");

    group.bench_function("simple", |b| b.iter(|| tokenize(black_box(SIMPLE_MESSAGE))));
    group.bench_function("quoted", |b| b.iter(|| tokenize(black_box(QUOTED_MESSAGE))));
    group.bench_function("long", |b| b.iter(|| tokenize(black_box(LONG_MESSAGE))));

    group.finish();
}

fn benchmark_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("Extract");

    group.bench_function("attached", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(QUOTED_MESSAGE));
            black_box(Invocation::extract(tokens, "!", InvocationStyle::Attached))
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_tokenize, benchmark_extract);
criterion_main!(benches);
