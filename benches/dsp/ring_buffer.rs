//! Benchmarks for fractional ring-buffer reads.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::dsp::interpolate::Interpolation;
use saavy_fx::dsp::RingBuffer;

use crate::BLOCK_SIZES;

pub fn bench_ring_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ring_buffer");

    let mut line = RingBuffer::<f32>::new(4_096);
    for i in 0..4_096 {
        line.write((i as f32 * 0.01).sin());
    }

    for &size in BLOCK_SIZES {
        // Slowly moving read head, the chorus access pattern
        let delays: Vec<f32> = (0..size)
            .map(|i| 480.0 + 40.0 * (i as f32 / size as f32 * 6.28).sin())
            .collect();

        for (name, interpolation) in [
            ("none", Interpolation::None),
            ("linear", Interpolation::Linear),
            ("hermite", Interpolation::Hermite),
            ("lagrange", Interpolation::Lagrange),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &delay in &delays {
                        sum += line.read_interpolated(black_box(delay), interpolation);
                    }
                    sum
                })
            });
        }

        group.bench_with_input(BenchmarkId::new("write", size), &size, |b, _| {
            b.iter(|| {
                for &delay in &delays {
                    line.write(black_box(delay));
                }
            })
        });
    }

    group.finish();
}
