//! Reverb topologies built around the feedback delay network.
//!
//! Each topology is a recipe, not a type. One engine reads it at
//! construction time and allocates exactly what that recipe needs.
//!
//! ```text
//! input → [pre-delay] → [all-pass diffusers] ─┬──────────────→ (+) → [FDN] → wet
//!                                             └→ [pitch ×2] → × amount ┘
//! ```
//!
//! | topology | tap range   | input lines | diffusers | shimmer | damping  |
//! | -------- | ----------- | ----------- | --------- | ------- | -------- |
//! | plate    | 13 - 30 ms  | all four    | 4         | no      | feedback |
//! | hall     | 44 - 72 ms  | first pair  | 2         | no      | feedback |
//! | shimmer  | 59 - 89 ms  | all four    | 2         | octave  | output   |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ms_to_samples;
use crate::dsp::allpass::{AllPassDelay, AllPassForm};
use crate::dsp::fdn::{
    distinct_primes, DampingPlacement, FeedbackDelayNetwork, InputRouting, LINES, OUTPUT_WEIGHTS,
};
use crate::dsp::interpolate::{self, Interpolation};
use crate::dsp::pitch_shift::PitchShifter;
use crate::dsp::ring_buffer::{RingBuffer, INTERPOLATION_HEADROOM};

/// Extra samples added to every tap per channel index, for stereo spread.
pub const CHANNEL_SPREAD_SAMPLES: usize = 23;

/// Pitch stage that feeds the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shimmer {
    pub ratio: f32,
    pub window_ms: f32,
    pub amount: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topology {
    pub name: &'static str,
    pub tap_ms: [f32; LINES],
    pub routing: InputRouting,
    pub diffuser_ms: &'static [f32],
    pub diffuser_gain: f32,
    pub shimmer: Option<Shimmer>,
    pub damping: DampingPlacement,
}

impl Topology {
    /// Short, dense taps behind a long diffuser chain.
    pub const PLATE: Topology = Topology {
        name: "plate",
        tap_ms: [13.1, 17.9, 23.3, 29.9],
        routing: InputRouting::AllLines,
        diffuser_ms: &[4.77, 3.59, 12.73, 9.31],
        diffuser_gain: 0.7,
        shimmer: None,
        damping: DampingPlacement::Feedback,
    };

    /// Long taps, sparse early build-up.
    pub const HALL: Topology = Topology {
        name: "hall",
        tap_ms: [43.7, 53.3, 61.1, 71.9],
        routing: InputRouting::FirstPair,
        diffuser_ms: &[5.0, 1.7],
        diffuser_gain: 0.6,
        shimmer: None,
        damping: DampingPlacement::Feedback,
    };

    /// Hall-sized network fed an octave-up copy of its input.
    pub const SHIMMER: Topology = Topology {
        name: "shimmer",
        tap_ms: [59.3, 67.1, 79.7, 89.3],
        routing: InputRouting::AllLines,
        diffuser_ms: &[4.77, 3.59],
        diffuser_gain: 0.65,
        shimmer: Some(Shimmer {
            ratio: 2.0,
            window_ms: 50.0,
            amount: 0.5,
        }),
        damping: DampingPlacement::Output,
    };

    /// Tap lengths in samples for `channel`, snapped to distinct primes.
    pub fn tap_lengths(&self, sample_rate: f32, channel: usize) -> [usize; LINES] {
        let spread = channel * CHANNEL_SPREAD_SAMPLES;
        distinct_primes(
            self.tap_ms
                .map(|ms| ms_to_samples(ms, sample_rate).round() as usize + spread),
        )
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopologyKind {
    #[default]
    Plate,
    Hall,
    Shimmer,
}

impl TopologyKind {
    pub const ALL: [TopologyKind; 3] = [TopologyKind::Plate, TopologyKind::Hall, TopologyKind::Shimmer];

    pub fn topology(self) -> &'static Topology {
        match self {
            TopologyKind::Plate => &Topology::PLATE,
            TopologyKind::Hall => &Topology::HALL,
            TopologyKind::Shimmer => &Topology::SHIMMER,
        }
    }

    /// Nearest kind for a continuous host value (0, 1, 2).
    pub fn from_index(value: f32) -> Self {
        match value.round() as i32 {
            i32::MIN..=0 => TopologyKind::Plate,
            1 => TopologyKind::Hall,
            _ => TopologyKind::Shimmer,
        }
    }
}

/// Single-channel reverb engine.
#[derive(Debug, Clone)]
pub struct Reverb {
    topology: Topology,
    sample_rate: f32,
    pre_delay: RingBuffer<f32>,
    diffusers: Vec<(AllPassDelay, f32)>,
    shifter: Option<(PitchShifter, Shimmer)>,
    network: FeedbackDelayNetwork,
}

impl Reverb {
    pub fn new(topology: &Topology, sample_rate: f32, channel: usize, max_pre_delay_ms: f32) -> Self {
        let pre_delay_len = ms_to_samples(max_pre_delay_ms.max(0.0), sample_rate).ceil() as usize;

        let diffusers = topology
            .diffuser_ms
            .iter()
            .map(|&ms| {
                let delay = ms_to_samples(ms, sample_rate).max(1.0);
                (AllPassDelay::new(delay.ceil() as usize, AllPassForm::Gerzon), delay)
            })
            .collect();

        let shifter = topology.shimmer.map(|shimmer| {
            let window = ms_to_samples(shimmer.window_ms, sample_rate) as usize;
            (PitchShifter::new(window), shimmer)
        });

        let network = FeedbackDelayNetwork::new(
            topology.tap_lengths(sample_rate, channel),
            topology.routing,
            topology.damping,
            OUTPUT_WEIGHTS[channel % LINES],
        );

        Self {
            topology: *topology,
            sample_rate,
            pre_delay: RingBuffer::new(pre_delay_len + INTERPOLATION_HEADROOM),
            diffusers,
            shifter,
            network,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn network(&self) -> &FeedbackDelayNetwork {
        &self.network
    }

    /// Longest pre-delay this engine can honour, in samples.
    pub fn max_pre_delay(&self) -> f32 {
        self.pre_delay.max_fractional_delay()
    }

    pub fn set_damping_cutoff(&mut self, cutoff_hz: f32) {
        self.network.set_damping_cutoff(cutoff_hz, self.sample_rate);
    }

    /// One sample in, one wet sample out.
    #[inline]
    pub fn process(&mut self, input: f32, pre_delay: f32, decay: f32) -> f32 {
        // Below one sample the newest neighbour is the input itself
        let mut signal = if pre_delay <= 0.0 {
            input
        } else if pre_delay < 1.0 {
            interpolate::linear(input, self.pre_delay.read(1), pre_delay)
        } else {
            self.pre_delay
                .read_interpolated(pre_delay.min(self.max_pre_delay()), Interpolation::Linear)
        };
        self.pre_delay.write(input);

        for (diffuser, delay) in &mut self.diffusers {
            signal = diffuser.process(signal, *delay, self.topology.diffuser_gain);
        }

        if let Some((shifter, shimmer)) = &mut self.shifter {
            signal += shimmer.amount * shifter.process(signal, shimmer.ratio, self.sample_rate);
        }

        self.network.process(signal, decay)
    }

    pub fn reset(&mut self) {
        self.pre_delay.reset();
        for (diffuser, _) in &mut self.diffusers {
            diffuser.reset();
        }
        if let Some((shifter, _)) = &mut self.shifter {
            shifter.reset();
        }
        self.network.reset();
    }
}
