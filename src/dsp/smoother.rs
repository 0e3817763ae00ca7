//! One-pole parameter smoothing.

/*
Parameter Smoothing
===================

Host automation arrives as a step: the mix knob was 0.2 last block and is
0.8 now. Jumping straight to the new value puts a discontinuity into the
audio (a click), and for delay time it makes the read head leap (a glitch).

A one-pole low-pass turns the step into an exponential ramp:

    z = target * b + z * a        with  a = exp(-2π / (time_ms * 0.001 * fs))
                                        b = 1 - a

The smoothing time is the time constant of that ramp scaled by 2π, so the
value is within 0.2% of its target after one `time_ms` and numerically
settled well before five.

Snapping
--------

The plain one-pole never quite arrives; it creeps toward the target for
ever. `SmootherMode::Snapping` watches the per-sample change and, once it
drops below `b * 0.001`, jumps straight to the target. Downstream code can
then treat the parameter as settled.
*/

use crate::{Error, Result, TWO_PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmootherMode {
    #[default]
    Exponential,
    Snapping,
}

#[derive(Debug, Clone)]
pub struct ParamSmoother {
    a: f32,
    b: f32,
    z: f32,
    z_prev: f32,
    mode: SmootherMode,
    time_ms: f32,
    sample_rate: f32,
}

impl ParamSmoother {
    /// A pass-through smoother (`a = 0`) until configured.
    pub fn new(mode: SmootherMode) -> Self {
        Self {
            a: 0.0,
            b: 1.0,
            z: 0.0,
            z_prev: 0.0,
            mode,
            time_ms: 0.0,
            sample_rate: 0.0,
        }
    }

    /// Build and configure in one go.
    pub fn with_time(time_ms: f32, sample_rate: f32, mode: SmootherMode) -> Result<Self> {
        let mut smoother = Self::new(mode);
        smoother.configure(time_ms, sample_rate)?;
        Ok(smoother)
    }

    /// Recompute the pole. Keeps the current value so a reconfigure does
    /// not restart the ramp from zero.
    pub fn configure(&mut self, time_ms: f32, sample_rate: f32) -> Result<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        if !time_ms.is_finite() || time_ms <= 0.0 {
            return Err(Error::InvalidSmoothingTime(time_ms));
        }

        self.a = (-TWO_PI / (time_ms * 0.001 * sample_rate)).exp();
        self.b = 1.0 - self.a;
        self.time_ms = time_ms;
        self.sample_rate = sample_rate;
        Ok(())
    }

    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        self.z_prev = self.z;
        self.z = target * self.b + self.z * self.a;

        if self.mode == SmootherMode::Snapping && (self.z - self.z_prev).abs() < self.b * 0.001 {
            self.z = target;
        }
        self.z
    }

    /// Jump to `value` with no ramp, e.g. when preparing with the host's
    /// current parameter value.
    pub fn reset(&mut self, value: f32) {
        self.z = value;
        self.z_prev = value;
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.z
    }

    pub fn time_ms(&self) -> f32 {
        self.time_ms
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl Default for ParamSmoother {
    fn default() -> Self {
        Self::new(SmootherMode::Exponential)
    }
}
