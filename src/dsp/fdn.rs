//! Four-line feedback delay network.

/*
Feedback Delay Network
======================

Four delay lines feed back into each other through an orthogonal mixing
matrix. Orthogonal means energy-preserving: whatever leaves the lines
returns to them at the same total level, so the only losses are the ones
we add on purpose (decay and damping).

    input ─→ [route] ─→(+)─→ [line 0] ─┐
                        (+)─→ [line 1] ─┤
                        (+)─→ [line 2] ─┼─→ [ rotate ] ─→ [damp] ─→ × decay ─┐
                        (+)─→ [line 3] ─┘         │                          │
                         ▲                        └──→ weighted sum ─→ wet   │
                         └───────────────────────────────────────────────────┘

Per sample:

    1. read every line at its full length
    2. mix the four taps through the rotation matrix
    3. damp the mixed feedback (or leave it for the output stage)
    4. scale by decay and add the routed input
    5. write back
    6. wet = the taps weighted by this channel's output vector

Mixing
------

Two layers of 2×2 rotations by θ = π/4:

    layer 1: (0,1) and (2,3)
    layer 2: (0,2) and (1,3)

which is the 4×4 Hadamard matrix scaled by 1/2. Each rotation costs four
multiplies, so the whole mix is sixteen.

Lengths
-------

Line lengths are snapped to distinct primes. Coprime lengths push the
moments where echoes from different lines coincide far apart, which keeps
the tail from ringing metallically.

Stability
---------

With decay < 1 every trip around the loop loses energy. At decay == 1 and
no damping the network is lossless and rings for ever. That is the
"infinite" setting: decay is clamped to exactly 1.0, damping is bypassed
and the input is muted so the held tail cannot build up without bound.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::OnePole;
use crate::dsp::ring_buffer::RingBuffer;

pub const LINES: usize = 4;

/// cos(π/4) == sin(π/4)
const ROTATION: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Orthogonal output vectors; channel `n` listens through row `n % 4`.
pub const OUTPUT_WEIGHTS: [[f32; LINES]; LINES] = [
    [0.5, -0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5, 0.5],
];

/// Which lines receive the input.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputRouting {
    #[default]
    AllLines,
    /// Lines 0 and 1 only; the other pair fills through the mix.
    FirstPair,
}

impl InputRouting {
    /// Unit-energy input gains.
    pub fn gains(self) -> [f32; LINES] {
        match self {
            InputRouting::AllLines => [0.5; LINES],
            InputRouting::FirstPair => [ROTATION, ROTATION, 0.0, 0.0],
        }
    }
}

/// Where the high-frequency absorption sits.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DampingPlacement {
    /// Inside the loop; the tail darkens as it decays.
    #[default]
    Feedback,
    /// After the network; the tail keeps its colour while it decays.
    Output,
}

#[inline]
fn rotate(a: f32, b: f32) -> (f32, f32) {
    (ROTATION * (a - b), ROTATION * (a + b))
}

/// Nested π/4 rotations (Hadamard / 2).
#[inline]
pub fn mix(taps: [f32; LINES]) -> [f32; LINES] {
    let (a, b) = rotate(taps[0], taps[1]);
    let (c, d) = rotate(taps[2], taps[3]);
    let (w, y) = rotate(a, c);
    let (x, z) = rotate(b, d);
    [w, x, y, z]
}

pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

/// Snap each length up to a prime, bumping duplicates so all four differ.
pub fn distinct_primes(lengths: [usize; LINES]) -> [usize; LINES] {
    let mut out = [0; LINES];
    for (i, &length) in lengths.iter().enumerate() {
        let mut prime = next_prime(length);
        while out[..i].contains(&prime) {
            prime = next_prime(prime + 1);
        }
        out[i] = prime;
    }
    out
}

#[derive(Debug, Clone)]
pub struct FeedbackDelayNetwork {
    lines: [RingBuffer<f32>; LINES],
    lengths: [usize; LINES],
    dampers: [OnePole; LINES],
    output_damper: OnePole,
    state: [f32; LINES],
    input_gains: [f32; LINES],
    output_weights: [f32; LINES],
    placement: DampingPlacement,
}

impl FeedbackDelayNetwork {
    /// `lengths` are used as given; run them through `distinct_primes` first
    /// for a smooth tail.
    pub fn new(
        lengths: [usize; LINES],
        routing: InputRouting,
        placement: DampingPlacement,
        output_weights: [f32; LINES],
    ) -> Self {
        let lengths = lengths.map(|length| length.max(1));
        Self {
            lines: lengths.map(|length| RingBuffer::new(length + 1)),
            lengths,
            dampers: Default::default(),
            output_damper: OnePole::new(),
            state: [0.0; LINES],
            input_gains: routing.gains(),
            output_weights,
            placement,
        }
    }

    pub fn lengths(&self) -> [usize; LINES] {
        self.lengths
    }

    pub fn longest(&self) -> usize {
        self.lengths.iter().copied().max().unwrap_or(1)
    }

    /// The mixed, damped, decayed feedback written on the last step.
    pub fn state(&self) -> [f32; LINES] {
        self.state
    }

    pub fn set_damping(&mut self, damping: f32) {
        for damper in &mut self.dampers {
            damper.set_damping(damping);
        }
        self.output_damper.set_damping(damping);
    }

    pub fn set_damping_cutoff(&mut self, cutoff_hz: f32, sample_rate: f32) {
        for damper in &mut self.dampers {
            damper.set_cutoff(cutoff_hz, sample_rate);
        }
        self.output_damper.set_cutoff(cutoff_hz, sample_rate);
    }

    /// One sample in, one wet sample out. `decay >= 1.0` selects the
    /// infinite hold.
    #[inline]
    pub fn process(&mut self, input: f32, decay: f32) -> f32 {
        let infinite = decay >= 1.0;
        let decay = decay.clamp(0.0, 1.0);
        let input = if infinite { 0.0 } else { input };

        let mut taps = [0.0; LINES];
        for (tap, (line, &length)) in taps.iter_mut().zip(self.lines.iter().zip(&self.lengths)) {
            *tap = line.read(length);
        }

        let mut feedback = mix(taps);
        if self.placement == DampingPlacement::Feedback && !infinite {
            for (sample, damper) in feedback.iter_mut().zip(&mut self.dampers) {
                *sample = damper.process(*sample);
            }
        }

        for i in 0..LINES {
            self.state[i] = feedback[i] * decay;
            self.lines[i].write(self.state[i] + input * self.input_gains[i]);
        }

        let wet: f32 = taps
            .iter()
            .zip(&self.output_weights)
            .map(|(tap, weight)| tap * weight)
            .sum();

        match self.placement {
            DampingPlacement::Output => self.output_damper.process(wet),
            DampingPlacement::Feedback => wet,
        }
    }

    /// Sum of squares of every sample still travelling through the lines.
    pub fn stored_energy(&self) -> f32 {
        self.lines
            .iter()
            .zip(&self.lengths)
            .map(|(line, &length)| (1..=length).map(|d| line.read(d).powi(2)).sum::<f32>())
            .sum()
    }

    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.reset();
        }
        for damper in &mut self.dampers {
            damper.reset();
        }
        self.output_damper.reset();
        self.state = [0.0; LINES];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(placement: DampingPlacement) -> FeedbackDelayNetwork {
        FeedbackDelayNetwork::new(
            distinct_primes([149, 211, 263, 293]),
            InputRouting::AllLines,
            placement,
            OUTPUT_WEIGHTS[0],
        )
    }

    #[test]
    fn test_primes() {
        assert!(is_prime(2) && is_prime(3) && is_prime(1_087));
        assert!(!is_prime(0) && !is_prime(1) && !is_prime(91));
        assert_eq!(next_prime(90), 97);
        assert_eq!(next_prime(97), 97);
        assert_eq!(distinct_primes([100, 100, 102, 14]), [101, 103, 107, 17]);
    }

    #[test]
    fn test_mix_is_orthogonal() {
        let basis = [
            mix([1.0, 0.0, 0.0, 0.0]),
            mix([0.0, 1.0, 0.0, 0.0]),
            mix([0.0, 0.0, 1.0, 0.0]),
            mix([0.0, 0.0, 0.0, 1.0]),
        ];
        for i in 0..LINES {
            for j in 0..LINES {
                let dot: f32 = basis[i].iter().zip(&basis[j]).map(|(a, b)| a * b).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-6, "columns {i},{j}: {dot}");
            }
        }
        // Every entry has magnitude 1/2
        assert!(basis.iter().flatten().all(|v| (v.abs() - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_output_weights_are_orthonormal() {
        for i in 0..LINES {
            for j in 0..LINES {
                let dot: f32 = OUTPUT_WEIGHTS[i]
                    .iter()
                    .zip(&OUTPUT_WEIGHTS[j])
                    .map(|(a, b)| a * b)
                    .sum();
                assert!((dot - if i == j { 1.0 } else { 0.0 }).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_lossless_at_unity_decay() {
        let mut fdn = network(DampingPlacement::Feedback);
        fdn.set_damping(0.5);
        for n in 0..64 {
            fdn.process(if n % 3 == 0 { 1.0 } else { -0.5 }, 0.7);
        }
        let before = fdn.stored_energy();
        assert!(before > 0.0);

        // Infinite mode: damping bypassed, input muted
        for _ in 0..10_000 {
            fdn.process(1.0, 1.05);
        }
        let after = fdn.stored_energy();
        assert!((after - before).abs() / before < 1e-3, "{before} -> {after}");
    }

    #[test]
    fn test_energy_decays_below_unity() {
        let mut fdn = network(DampingPlacement::Feedback);
        fdn.process(1.0, 0.8);
        let mut previous = fdn.stored_energy();
        for _ in 0..8 {
            for _ in 0..fdn.longest() {
                fdn.process(0.0, 0.8);
            }
            let energy = fdn.stored_energy();
            assert!(energy < previous);
            previous = energy;
        }
    }

    #[test]
    fn test_impulse_reaches_output_after_shortest_line() {
        let mut fdn = network(DampingPlacement::Output);
        let shortest = fdn.lengths().into_iter().min().unwrap_or(1);
        let out: Vec<f32> = (0..=shortest)
            .map(|n| fdn.process(if n == 0 { 1.0 } else { 0.0 }, 0.5))
            .collect();
        assert!(out[..shortest].iter().all(|&s| s == 0.0));
        assert!(out[shortest].abs() > 0.1);
    }

    #[test]
    fn test_feedback_damping_darkens_tail() {
        let mut bright = network(DampingPlacement::Feedback);
        let mut dark = network(DampingPlacement::Feedback);
        dark.set_damping(0.7);

        bright.process(1.0, 0.9);
        dark.process(1.0, 0.9);
        for _ in 0..2_000 {
            bright.process(0.0, 0.9);
            dark.process(0.0, 0.9);
        }
        assert!(dark.stored_energy() < bright.stored_energy());
    }

    #[test]
    fn test_reset_clears_network() {
        let mut fdn = network(DampingPlacement::Feedback);
        for _ in 0..500 {
            fdn.process(0.3, 0.9);
        }
        fdn.reset();
        assert_eq!(fdn.stored_energy(), 0.0);
        assert_eq!(fdn.state(), [0.0; LINES]);
    }
}
