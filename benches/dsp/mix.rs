//! Benchmarks for dry/wet blending.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::dsp::mix;

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let dry: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let wet: Vec<f32> = (0..size).map(|i| (i as f32 * 0.15).cos()).collect();

        let mut buffer = wet.clone();
        group.bench_with_input(BenchmarkId::new("apply_dry_wet", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&wet);
                mix::apply_dry_wet(black_box(&dry), black_box(&mut buffer), black_box(0.3));
            })
        });

        group.bench_with_input(BenchmarkId::new("blend_per_sample", size), &size, |b, _| {
            b.iter(|| {
                dry.iter()
                    .zip(&wet)
                    .map(|(&d, &w)| mix::blend_dry_wet(d, w, black_box(0.3)))
                    .sum::<f32>()
            })
        });
    }

    group.finish();
}
