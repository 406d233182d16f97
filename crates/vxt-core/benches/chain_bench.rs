//! Criterion benchmarks for the VxT filter chain
//!
//! Run with: cargo bench -p vxt-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use vxt_core::{ChainSettings, ChainSnapshot, MonoChain, SnapshotCell, Slope, design_chain};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn steep_settings() -> ChainSettings {
    ChainSettings {
        low_cut_freq: 80.0,
        low_cut_slope: Slope::Db48,
        high_cut_freq: 12000.0,
        high_cut_slope: Slope::Db48,
        peak_freq: 2500.0,
        peak_gain_db: 4.0,
        peak_q: 1.5,
    }
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("MonoChain");
    let settings = steep_settings();

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process_in_place", block_size),
            &block_size,
            |b, _| {
                let coefficients = design_chain(&settings, SAMPLE_RATE).unwrap();
                let mut chain = MonoChain::new();
                chain.apply(&coefficients, &settings);
                let mut buffer = input.clone();
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    chain.process_in_place(black_box(&mut buffer));
                });
            },
        );

        // Full per-block cost: design, apply, publish, process.
        group.bench_with_input(
            BenchmarkId::new("update_and_process", block_size),
            &block_size,
            |b, _| {
                let mut chain = MonoChain::new();
                let cell = SnapshotCell::new();
                let mut buffer = input.clone();
                b.iter(|| {
                    let coefficients = design_chain(black_box(&settings), SAMPLE_RATE).unwrap();
                    chain.apply(&coefficients, &settings);
                    cell.publish(&chain.snapshot(SAMPLE_RATE, &settings));
                    buffer.copy_from_slice(&input);
                    chain.process_in_place(&mut buffer);
                });
            },
        );
    }

    group.finish();
}

fn bench_design(c: &mut Criterion) {
    let settings = steep_settings();
    c.bench_function("design_chain", |b| {
        b.iter(|| black_box(design_chain(black_box(&settings), SAMPLE_RATE)));
    });
}

fn bench_response(c: &mut Criterion) {
    let snapshot = ChainSnapshot::design(&steep_settings(), SAMPLE_RATE).unwrap();
    let cell = SnapshotCell::new();
    cell.publish(&snapshot);

    let mut group = c.benchmark_group("Response");
    group.bench_function("curve_800_points", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..800 {
                let x = i as f32 / 800.0;
                let freq = 20.0 * 1000.0f32.powf(x);
                sum += snapshot.magnitude_db_at(freq);
            }
            black_box(sum)
        });
    });
    group.bench_function("snapshot_read", |b| {
        b.iter(|| black_box(cell.read()));
    });
    group.finish();
}

criterion_group!(benches, bench_chain, bench_design, bench_response);
criterion_main!(benches);
