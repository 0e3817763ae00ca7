//! Benchmarks for complete effects and chains.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::graph::{
    AutoFilterEffect, ChorusEffect, EchoEffect, EffectExt, HostEffect, ReverbEffect,
};
use saavy_fx::ProcessConfig;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn stereo_input(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect()
}

/// Run one block the way a host does: refill, then process in place.
fn run_block(effect: &mut dyn HostEffect, input: &[f32], left: &mut [f32], right: &mut [f32], values: &[f32]) {
    left.copy_from_slice(input);
    right.copy_from_slice(input);
    let mut channels = [left, right];
    effect.process_values(black_box(&mut channels), black_box(values));
}

fn bench_set(c: &mut Criterion, group_name: &str, effects: Vec<(&str, Box<dyn HostEffect>)>) {
    let mut group = c.benchmark_group(group_name);

    for (name, mut effect) in effects {
        let values: Vec<f32> = effect.ranges().iter().map(|range| range.default).collect();

        for &size in BLOCK_SIZES {
            if effect
                .configure(&ProcessConfig::new(SAMPLE_RATE, size, 2))
                .is_err()
            {
                continue;
            }
            let input = stereo_input(size);
            let mut left = vec![0.0f32; size];
            let mut right = vec![0.0f32; size];

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| run_block(effect.as_mut(), &input, &mut left, &mut right, &values))
            });
        }
    }

    group.finish();
}

pub fn bench_effects(c: &mut Criterion) {
    bench_set(
        c,
        "scenarios/effects",
        vec![
            ("echo", EchoEffect::new().boxed()),
            ("chorus", ChorusEffect::new().boxed()),
            ("auto_filter", AutoFilterEffect::new().boxed()),
            ("reverb_plate", ReverbEffect::new().boxed()),
        ],
    );
}

pub fn bench_chains(c: &mut Criterion) {
    bench_set(
        c,
        "scenarios/chains",
        vec![
            ("dub", AutoFilterEffect::new().chain(EchoEffect::new()).boxed()),
            ("wash", ChorusEffect::new().chain(ReverbEffect::new()).boxed()),
            (
                "full",
                AutoFilterEffect::new()
                    .chain(ChorusEffect::new())
                    .chain(EchoEffect::new())
                    .chain(ReverbEffect::new())
                    .boxed(),
            ),
        ],
    );
}
