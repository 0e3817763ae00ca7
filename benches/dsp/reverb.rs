//! Benchmarks for the feedback delay network and reverb topologies.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fx::dsp::fdn::{DampingPlacement, FeedbackDelayNetwork, InputRouting, OUTPUT_WEIGHTS};
use saavy_fx::dsp::reverb::{Reverb, TopologyKind};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        // Short burst followed by a quiet tail
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0)
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();

        let mut network = FeedbackDelayNetwork::new(
            [631, 863, 1_117, 1_433],
            InputRouting::AllLines,
            DampingPlacement::Feedback,
            OUTPUT_WEIGHTS[0],
        );
        network.set_damping_cutoff(6_000.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("fdn", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += network.process(black_box(sample), 0.8);
                }
                sum
            })
        });

        for kind in TopologyKind::ALL {
            let topology = kind.topology();
            let mut reverb = Reverb::new(topology, SAMPLE_RATE, 0, 250.0);
            reverb.set_damping_cutoff(6_000.0);
            group.bench_with_input(
                BenchmarkId::new(topology.name, size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &sample in &input {
                            sum += reverb.process(black_box(sample), 480.0, 0.8);
                        }
                        sum
                    })
                },
            );
        }
    }

    group.finish();
}
