//! Benchmarks for coefficient design and biquad processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::dsp::filter::{Biquad, FilterDesigner, FilterShape, OnePole};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut designer = FilterDesigner::new(SAMPLE_RATE);
        designer.set_parameters(1_000.0, SAMPLE_RATE, 0.707, 0.0);

        for shape in [FilterShape::LowPass2, FilterShape::BandPass, FilterShape::AllPass1] {
            let coefficients = designer.design(shape).unwrap_or_default();
            let mut biquad = Biquad::new(coefficients);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("{shape:?}").to_lowercase(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        biquad.render(black_box(&mut buffer));
                    })
                },
            );
        }

        // Auto-filter path: redesign before every sample
        let mut biquad = Biquad::default();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("redesign_per_sample", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for (i, sample) in buffer.iter_mut().enumerate() {
                    designer.set_parameters(500.0 + i as f32, SAMPLE_RATE, 4.0, 0.0);
                    if let Ok(coefficients) = designer.design(FilterShape::LowPass2) {
                        biquad.set_coefficients(coefficients);
                    }
                    *sample = biquad.process(*sample);
                }
            })
        });

        let mut damper = OnePole::new();
        damper.set_cutoff(6_000.0, SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("one_pole", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for sample in buffer.iter_mut() {
                    *sample = damper.process(black_box(*sample));
                }
            })
        });
    }

    group.finish();
}
