//! Benchmarks for line tokenization.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glint_profile::ProfileRegistry;
use glint_tokenizer::{ContinuationState, LineCache, tokenize};

const RUST_SAMPLE: &str = r#"/// Doc comment for the function.
pub fn render(items: &[Item], width: usize) -> Result<String, Error> {
    let mut out = String::with_capacity(width * 0x10);
    for (i, item) in items.iter().enumerate() {
        /* inline block comment */
        if item.weight >= 1_000.5e-3 && !item.hidden {
            out.push_str(&format!("{}: {:>8}\n", i, item.name));
        }
    }
    Ok(out)
}
"#;

/// Repeats the sample until it has roughly `lines` lines.
fn generate_source(lines: usize) -> Vec<String> {
    RUST_SAMPLE
        .lines()
        .cycle()
        .take(lines)
        .map(String::from)
        .collect()
}

/// Benchmarks tokenizing whole documents, threading state between lines.
fn bench_tokenize_document(c: &mut Criterion) {
    let registry = ProfileRegistry::builtin().unwrap();
    let rust = registry.get("rust").unwrap();
    let mut group = c.benchmark_group("tokenize_document");

    for size in [100, 1000, 10000].iter() {
        let lines = generate_source(*size);

        group.bench_with_input(BenchmarkId::new("rust", size), &lines, |b, lines| {
            b.iter(|| {
                let mut state = ContinuationState::None;
                let mut count = 0;
                for line in lines {
                    let (tokens, next) = tokenize(&rust, black_box(line), state);
                    count += tokens.len();
                    state = next;
                }
                black_box(count)
            })
        });
    }

    group.finish();
}

/// Benchmarks a single long line.
fn bench_long_line(c: &mut Criterion) {
    let registry = ProfileRegistry::builtin().unwrap();
    let rust = registry.get("rust").unwrap();
    let line = "let value = compute(alpha, beta) + 42; ".repeat(500);

    c.bench_function("long_line", |b| {
        b.iter(|| black_box(tokenize(&rust, black_box(&line), ContinuationState::None)))
    });
}

/// Benchmarks cache refresh after a single-line edit.
fn bench_cache_refresh(c: &mut Criterion) {
    let registry = ProfileRegistry::builtin().unwrap();
    let rust = registry.get("rust").unwrap();
    let text = generate_source(10000).join("\n");

    let mut group = c.benchmark_group("cache_refresh");

    group.bench_function("one_edit", |b| {
        b.iter_with_setup(
            || {
                let mut cache = LineCache::new(rust.clone());
                cache.set_text(&text);
                cache.refresh();
                cache.replace_lines(5000..5001, ["    let edited = 1;"]);
                cache
            },
            |mut cache| black_box(cache.refresh()),
        )
    });

    group.bench_function("open_comment", |b| {
        b.iter_with_setup(
            || {
                let mut cache = LineCache::new(rust.clone());
                cache.set_text(&text);
                cache.refresh();
                cache.replace_lines(5000..5001, ["/* opened"]);
                cache
            },
            |mut cache| black_box(cache.refresh()),
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tokenize_document,
    bench_long_line,
    bench_cache_refresh,
);

criterion_main!(benches);
