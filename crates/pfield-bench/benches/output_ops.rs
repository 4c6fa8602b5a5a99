//! Criterion benchmarks for snapshot formatting.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use pfield_core::Grid;
use pfield_output::{csv, vtk};

fn ramp(size: usize) -> Grid {
    let data = (0..size * size).map(|i| (i as f32 * 0.001).sin()).collect();
    Grid::from_vec(size, data).unwrap()
}

fn bench_csv(c: &mut Criterion) {
    let grid = ramp(256);
    c.bench_function("csv_256", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(256 * 256 * 10);
            csv::write_csv(&mut out, black_box(&grid)).unwrap();
            out
        });
    });
}

fn bench_vtk(c: &mut Criterion) {
    let grid = ramp(256);
    c.bench_function("vtk_256", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(256 * 256 * 14);
            vtk::write_vtk(&mut out, "PHASE", black_box(&grid), 0.03).unwrap();
            out
        });
    });
}

criterion_group!(benches, bench_csv, bench_vtk);
criterion_main!(benches);
