use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ms_to_samples, ParamRange, ProcessConfig};
use crate::dsp::interpolate::Interpolation;
use crate::dsp::mix::blend_dry_wet;
use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::dsp::pitch_shift::MIN_TAP_DELAY;
use crate::dsp::ring_buffer::{RingBuffer, INTERPOLATION_HEADROOM};
use crate::dsp::smoother::{ParamSmoother, SmootherMode};
use crate::graph::node::{Effect, ParamSet, SMOOTHING_MS};
use crate::Result;

/*
Chorus Effect
=============

Chorus thickens a sound by mixing the dry signal with a slightly delayed,
pitch-modulated copy. The modulation creates subtle detuning that makes
one voice sound like several playing together.

How It Works
------------

1. Input signal passes through unchanged (dry)
2. A copy is sent through a short delay (~10-20 ms)
3. An LFO sweeps the delay time, and the moving read head bends pitch
4. Dry and wet signals are mixed together

The read head sits between samples almost all the time, so the delay line
is read through the Hermite interpolator. Odd channels run their LFO half
a cycle behind even ones, which spreads a stereo chorus across the field.

Parameters
----------

Rate (0.05 - 5.0 Hz):
  LFO speed. Classic chorus: 0.5-1.5 Hz

Depth (0.1 - 10.0 ms):
  How far the delay swings either side of the centre.

Delay (5 - 30 ms):
  Centre delay. Too short: comb filtering. Too long: slapback.

Mix (0.0 - 1.0):
  Dry/wet blend. 0.3-0.5 is typical.

Shape (0 = sine, 1 = triangle):
  LFO waveform.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusParams {
    pub rate_hz: f32,
    pub depth_ms: f32,
    pub delay_ms: f32,
    pub mix: f32,
    pub shape: Waveform,
}

impl ChorusParams {
    pub const RANGES: &'static [ParamRange] = &[
        ParamRange::new("rate_hz", 0.05, 5.0, 0.8),
        ParamRange::new("depth_ms", 0.1, 10.0, 2.0),
        ParamRange::new("delay_ms", 5.0, 30.0, 15.0),
        ParamRange::new("mix", 0.0, 1.0, 0.5),
        ParamRange::new("shape", 0.0, 1.0, 0.0),
    ];

    /// Longest delay the LFO can reach.
    pub const MAX_DELAY_MS: f32 = 40.0;
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self::from_values(&[])
    }
}

impl ParamSet for ChorusParams {
    const LEN: usize = Self::RANGES.len();

    fn range(index: usize) -> Option<ParamRange> {
        Self::RANGES.get(index).copied()
    }

    fn from_values(values: &[f32]) -> Self {
        let r = Self::RANGES;
        Self {
            rate_hz: r[0].pick(values, 0),
            depth_ms: r[1].pick(values, 1),
            delay_ms: r[2].pick(values, 2),
            mix: r[3].pick(values, 3),
            shape: if r[4].pick(values, 4) >= 0.5 {
                Waveform::Triangle
            } else {
                Waveform::Sine
            },
        }
    }

    fn to_values(&self) -> Vec<f32> {
        let shape = if self.shape == Waveform::Triangle { 1.0 } else { 0.0 };
        vec![self.rate_hz, self.depth_ms, self.delay_ms, self.mix, shape]
    }
}

#[derive(Debug, Clone)]
struct ChorusChannel {
    line: RingBuffer<f32>,
    lfo: Oscillator,
    phase_offset: f32,
    depth: ParamSmoother,
    delay: ParamSmoother,
    mix: ParamSmoother,
}

#[derive(Debug, Clone, Default)]
pub struct ChorusEffect {
    channels: Vec<ChorusChannel>,
    sample_rate: f32,
    needs_snap: bool,
}

impl ChorusEffect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for ChorusEffect {
    type Params = ChorusParams;

    fn prepare(&mut self, config: &ProcessConfig) -> Result<()> {
        config.validate()?;
        let sample_rate = config.sample_rate;
        let max_delay = ms_to_samples(ChorusParams::MAX_DELAY_MS, sample_rate).ceil() as usize;
        let smoother = || ParamSmoother::with_time(SMOOTHING_MS, sample_rate, SmootherMode::Snapping);

        self.channels = (0..config.channels)
            .map(|channel| -> Result<ChorusChannel> {
                Ok(ChorusChannel {
                    line: RingBuffer::new(max_delay + INTERPOLATION_HEADROOM),
                    lfo: Oscillator::new(),
                    phase_offset: if channel % 2 == 1 { std::f32::consts::PI } else { 0.0 },
                    depth: smoother()?,
                    delay: smoother()?,
                    mix: smoother()?,
                })
            })
            .collect::<Result<_>>()?;
        self.sample_rate = sample_rate;
        self.needs_snap = true;

        debug!("chorus prepared: {} channels, {max_delay} sample lines", config.channels);
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]], params: &ChorusParams) {
        let sample_rate = self.sample_rate;
        let depth_target = ms_to_samples(params.depth_ms, sample_rate);
        let delay_target = ms_to_samples(params.delay_ms, sample_rate);

        for (state, buffer) in self.channels.iter_mut().zip(channels.iter_mut()) {
            if self.needs_snap {
                state.depth.reset(depth_target);
                state.delay.reset(delay_target);
                state.mix.reset(params.mix);
            }

            let ceiling = state.line.max_fractional_delay();
            for sample in buffer.iter_mut() {
                let depth = state.depth.process(depth_target);
                let centre = state.delay.process(delay_target);
                let mix = state.mix.process(params.mix);
                let lfo = state
                    .lfo
                    .process(params.rate_hz, sample_rate, params.shape, state.phase_offset);

                let delay = (centre + lfo * depth).clamp(MIN_TAP_DELAY, ceiling);
                let wet = state.line.read_interpolated(delay, Interpolation::Hermite);
                state.line.write(*sample);
                *sample = blend_dry_wet(*sample, wet, mix);
            }
        }
        self.needs_snap = false;
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            state.line.reset();
            state.lfo.reset(0.0);
        }
        self.needs_snap = true;
    }

    fn tail_samples(&self, params: &ChorusParams) -> Option<usize> {
        Some(ms_to_samples(params.delay_ms + params.depth_ms, self.sample_rate).ceil() as usize)
    }
}
