use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ms_to_samples, ParamRange, ProcessConfig};
use crate::dsp::delay::FeedbackDelay;
use crate::dsp::smoother::{ParamSmoother, SmootherMode};
use crate::graph::node::{decay_tail, Effect, ParamSet, SMOOTHING_MS};
use crate::Result;

/*
Echo
====

A feedback delay per channel with a darkening filter in the loop, so each
repeat is a little duller than the one before, like tape or a bucket
brigade.

Parameters
----------

Time (1 - 2000 ms):
  Gap between repeats. Smoothed, so sweeping it bends pitch rather than
  clicking (the read head glides through a fractional delay).

Feedback (0.0 - 0.95):
  Level of each repeat relative to the last. Capped below 1.0 so the
  repeats always die away.

Damping (200 - 20000 Hz):
  Cutoff of the one-pole filter on the feedback path.

Mix (0.0 - 1.0):
  Dry/wet blend.

    input ──┬──(+)──→ [ delay ] ──┬──→ × mix ──┐
            │   ▲                 │            ▼
            │   └─ × fb ◄ [lpf] ◄─┘           (+) ──→ output
            └──────────── × (1 - mix) ─────────┘
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoParams {
    pub time_ms: f32,
    pub feedback: f32,
    pub damping_hz: f32,
    pub mix: f32,
}

impl EchoParams {
    pub const RANGES: &'static [ParamRange] = &[
        ParamRange::new("time_ms", 1.0, 2_000.0, 350.0),
        ParamRange::new("feedback", 0.0, 0.95, 0.4),
        ParamRange::new("damping_hz", 200.0, 20_000.0, 8_000.0),
        ParamRange::new("mix", 0.0, 1.0, 0.35),
    ];

    pub const MAX_TIME_MS: f32 = 2_000.0;
}

impl Default for EchoParams {
    fn default() -> Self {
        Self::from_values(&[])
    }
}

impl ParamSet for EchoParams {
    const LEN: usize = Self::RANGES.len();

    fn range(index: usize) -> Option<ParamRange> {
        Self::RANGES.get(index).copied()
    }

    fn from_values(values: &[f32]) -> Self {
        let r = Self::RANGES;
        Self {
            time_ms: r[0].pick(values, 0),
            feedback: r[1].pick(values, 1),
            damping_hz: r[2].pick(values, 2),
            mix: r[3].pick(values, 3),
        }
    }

    fn to_values(&self) -> Vec<f32> {
        vec![self.time_ms, self.feedback, self.damping_hz, self.mix]
    }
}

#[derive(Debug, Clone)]
struct EchoChannel {
    line: FeedbackDelay,
    time: ParamSmoother,
    feedback: ParamSmoother,
    damping: ParamSmoother,
    mix: ParamSmoother,
    applied_damping_hz: f32,
}

impl EchoChannel {
    fn new(max_delay: usize, sample_rate: f32) -> Result<Self> {
        let smoother = || ParamSmoother::with_time(SMOOTHING_MS, sample_rate, SmootherMode::Snapping);
        Ok(Self {
            line: FeedbackDelay::new(max_delay),
            time: smoother()?,
            feedback: smoother()?,
            damping: smoother()?,
            mix: smoother()?,
            applied_damping_hz: 0.0,
        })
    }

    fn snap_to(&mut self, params: &EchoParams, sample_rate: f32) {
        self.time.reset(ms_to_samples(params.time_ms, sample_rate));
        self.feedback.reset(params.feedback);
        self.damping.reset(params.damping_hz);
        self.mix.reset(params.mix);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EchoEffect {
    channels: Vec<EchoChannel>,
    sample_rate: f32,
    needs_snap: bool,
}

impl EchoEffect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for EchoEffect {
    type Params = EchoParams;

    fn prepare(&mut self, config: &ProcessConfig) -> Result<()> {
        config.validate()?;
        let max_delay = ms_to_samples(EchoParams::MAX_TIME_MS, config.sample_rate).ceil() as usize;

        self.channels = (0..config.channels)
            .map(|_| EchoChannel::new(max_delay, config.sample_rate))
            .collect::<Result<_>>()?;
        self.sample_rate = config.sample_rate;
        self.needs_snap = true;

        debug!(
            "echo prepared: {} channels, {} sample lines at {} Hz",
            config.channels, max_delay, config.sample_rate
        );
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]], params: &EchoParams) {
        let sample_rate = self.sample_rate;
        let target_time = ms_to_samples(params.time_ms, sample_rate);

        for (state, buffer) in self.channels.iter_mut().zip(channels.iter_mut()) {
            if self.needs_snap {
                state.snap_to(params, sample_rate);
            }

            for sample in buffer.iter_mut() {
                let delay = state.time.process(target_time).min(state.line.max_delay());
                let feedback = state.feedback.process(params.feedback);
                let mix = state.mix.process(params.mix);
                let damping_hz = state.damping.process(params.damping_hz);

                if damping_hz != state.applied_damping_hz {
                    state.line.set_damping_cutoff(damping_hz, sample_rate);
                    state.applied_damping_hz = damping_hz;
                }

                *sample = state.line.process(*sample, delay, feedback, mix);
            }
        }
        self.needs_snap = false;
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            state.line.reset();
        }
        self.needs_snap = true;
    }

    fn tail_samples(&self, params: &EchoParams) -> Option<usize> {
        decay_tail(ms_to_samples(params.time_ms, self.sample_rate), params.feedback)
    }
}
