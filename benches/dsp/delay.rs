//! Benchmarks for comb, all-pass and pitch-shifting delays.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::dsp::allpass::{AllPassDelay, AllPassForm};
use saavy_fx::dsp::delay::FeedbackDelay;
use saavy_fx::dsp::interpolate::Interpolation;
use saavy_fx::dsp::pitch_shift::PitchShifter;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Delay times in samples at 48kHz
    let delay_times: &[usize] = &[
        480,    // 10ms
        4_800,  // 100ms
        48_000, // 1 second
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &delay_samples in delay_times {
            let delay_ms = delay_samples as f32 / 48.0;
            let mut comb = FeedbackDelay::new(delay_samples + 8);
            comb.set_damping_cutoff(6_000.0, SAMPLE_RATE);
            group.bench_with_input(
                BenchmarkId::new(format!("comb_{}ms", delay_ms as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &sample in &input {
                            sum += comb.process(black_box(sample), delay_samples as f32, 0.6, 0.5);
                        }
                        sum
                    })
                },
            );
        }

        // Fractional delay through the cheapest interpolator
        let mut comb = FeedbackDelay::new(1_024).with_interpolation(Interpolation::Linear);
        group.bench_with_input(BenchmarkId::new("comb_fractional_linear", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += comb.process(black_box(sample), 480.37, 0.6, 0.5);
                }
                sum
            })
        });

        for (name, form) in [("schroeder", AllPassForm::Schroeder), ("gerzon", AllPassForm::Gerzon)] {
            let mut allpass = AllPassDelay::new(512, form);
            group.bench_with_input(BenchmarkId::new(format!("allpass_{name}"), size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        sum += allpass.process(black_box(sample), 229.0, 0.7);
                    }
                    sum
                })
            });
        }

        // 50ms window, an octave up
        let mut shifter = PitchShifter::new(2_400);
        group.bench_with_input(BenchmarkId::new("pitch_shift_octave", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += shifter.process(black_box(sample), 2.0, SAMPLE_RATE);
                }
                sum
            })
        });
    }

    group.finish();
}
