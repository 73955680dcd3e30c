use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tcg_core::{NormalizedRecord, PipelineConfig};
use tcg_dedup::{analyze, filter_duplicates};

const AREAS: &[&str] = &["login", "profile", "invoice", "report", "search"];
const ACTIONS: &[&str] = &["create", "update", "delete", "verify", "export"];

fn batch(size: usize) -> Vec<NormalizedRecord> {
    (0..size)
        .map(|i| {
            let area = AREAS[i % AREAS.len()];
            let action = ACTIONS[(i / AREAS.len()) % ACTIONS.len()];
            NormalizedRecord::new(format!("TC_{}", i + 1), format!("{action} {area} record number {i}"))
                .with_module("Bench", area)
                .with_steps(format!(
                    "1. Open the {area} page\n2. {action} the selected entry {i}\n3. Confirm result {}",
                    i * 7
                ))
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let config = PipelineConfig::default();
    let existing = batch(50);
    let new = batch(50);

    c.bench_function("filter_50_against_50", |b| {
        b.iter(|| filter_duplicates(black_box(new.clone()), black_box(&existing), &config));
    });

    c.bench_function("analyze_100", |b| {
        let corpus: Vec<_> = existing.iter().chain(new.iter()).cloned().collect();
        b.iter(|| analyze(black_box(&corpus), &config));
    });
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
