//! Criterion benchmarks for one driver iteration (two half-steps, drain,
//! profile) on the host backend.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pfield_bench::{model_context, DiscardSink};
use pfield_engine::EvolutionDriver;
use pfield_models::ModelKind;

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");
    for kind in ModelKind::ALL {
        for size in [64usize, 128] {
            let mut ctx = model_context(kind, size).unwrap();
            let mut driver = EvolutionDriver::new(&mut ctx);
            let mut sink = DiscardSink;
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &size, |b, _| {
                b.iter(|| black_box(driver.step(&mut sink).unwrap()));
            });
        }
    }
    group.finish();
}

fn bench_context_setup(c: &mut Criterion) {
    c.bench_function("initialize_kobayashi_aniso_128", |b| {
        b.iter(|| black_box(model_context(ModelKind::KobayashiAniso, 128).unwrap()));
    });
}

criterion_group!(benches, bench_iteration, bench_context_setup);
criterion_main!(benches);
