//! All-pass diffuser built on a ring buffer.
//!
//! ```text
//!           ┌──────────── × -g ─────────────┐
//!           │                               ▼
//! input ──(+)──→ [ delay D ] ──┬── × k ──→ (+) ──→ output
//!          ▲                   │
//!          └────── × g ────────┘
//! ```
//!
//! The delayed sample is read before the new one is written, so an impulse
//! reappears exactly `D` samples later. `k` is 1 for the Schroeder form and
//! `1 - g²` for the Gerzon form. The Gerzon scaling makes the magnitude
//! response exactly flat; the Schroeder form is brighter on transients.
//!
//! Gains must stay in `[0, 1)`. Nothing checks this on the audio path.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::interpolate::Interpolation;
use crate::dsp::ring_buffer::{RingBuffer, INTERPOLATION_HEADROOM};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllPassForm {
    #[default]
    Schroeder,
    Gerzon,
}

#[derive(Debug, Clone)]
pub struct AllPassDelay {
    line: RingBuffer<f32>,
    form: AllPassForm,
    interpolation: Interpolation,
}

impl AllPassDelay {
    /// Allocate for delays up to `max_delay` samples.
    pub fn new(max_delay: usize, form: AllPassForm) -> Self {
        Self {
            line: RingBuffer::new(max_delay + INTERPOLATION_HEADROOM),
            form,
            interpolation: Interpolation::Hermite,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn form(&self) -> AllPassForm {
        self.form
    }

    pub fn set_form(&mut self, form: AllPassForm) {
        self.form = form;
    }

    pub fn max_delay(&self) -> f32 {
        self.line.max_fractional_delay()
    }

    /// Push one sample through with a delay of `delay` samples (>= 1).
    #[inline]
    pub fn process(&mut self, input: f32, delay: f32, gain: f32) -> f32 {
        let delayed = self
            .line
            .read_interpolated(delay.max(1.0), self.interpolation);
        self.line.write(input + delayed * gain);

        let feed_forward = input * -gain;
        match self.form {
            AllPassForm::Schroeder => delayed + feed_forward,
            AllPassForm::Gerzon => delayed * (1.0 - gain * gain) + feed_forward,
        }
    }

    pub fn reset(&mut self) {
        self.line.reset();
    }
}
