//! Feedback (comb) delay line with wet/dry mixing.
//!
//! ```text
//! input ──┬──(+)──→ [ delay D ] ──┬──→ × mix ──┐
//!         │   ▲                   │            ▼
//!         │   └── × fb ◄─ damp ◄──┘           (+) ──→ output
//!         └────────────── × (1 - mix) ─────────┘
//! ```
//!
//! Per sample: `wet = read(D)`, `write(dry + damp(wet) * fb)`,
//! `out = wet * mix + dry * (1 - mix)`. With damping at 0 the feedback path
//! is untouched, so an impulse produces echoes at `D, 2D, 3D…` of height
//! `fb^k`. Feedback must stay below 1.0 for the echoes to die away.

use crate::dsp::filter::OnePole;
use crate::dsp::interpolate::Interpolation;
use crate::dsp::ring_buffer::{RingBuffer, INTERPOLATION_HEADROOM};

#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    line: RingBuffer<f32>,
    damping: OnePole,
    interpolation: Interpolation,
}

impl FeedbackDelay {
    /// Allocate for delays up to `max_delay` samples.
    pub fn new(max_delay: usize) -> Self {
        Self {
            line: RingBuffer::new(max_delay + INTERPOLATION_HEADROOM),
            damping: OnePole::new(),
            interpolation: Interpolation::Hermite,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn max_delay(&self) -> f32 {
        self.line.max_fractional_delay()
    }

    /// Darken the repeats. 0.0 leaves the feedback path flat.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping.set_damping(damping);
    }

    /// Darken the repeats above `cutoff_hz`.
    pub fn set_damping_cutoff(&mut self, cutoff_hz: f32, sample_rate: f32) {
        self.damping.set_cutoff(cutoff_hz, sample_rate);
    }

    #[inline]
    pub fn process(&mut self, input: f32, delay: f32, feedback: f32, mix: f32) -> f32 {
        let wet = self
            .line
            .read_interpolated(delay.max(1.0), self.interpolation);
        let recirculated = self.damping.process(wet) * feedback;
        self.line.write(input + recirculated);
        wet * mix + input * (1.0 - mix)
    }

    pub fn reset(&mut self) {
        self.line.reset();
        self.damping.reset();
    }
}
