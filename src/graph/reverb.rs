use std::f32::consts::FRAC_PI_2;

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ms_to_samples, ParamRange, ProcessConfig};
use crate::dsp::mix::blend_dry_wet;
use crate::dsp::reverb::{Reverb, TopologyKind};
use crate::dsp::smoother::{ParamSmoother, SmootherMode};
use crate::graph::node::{decay_tail, Effect, ParamSet, SMOOTHING_MS};
use crate::Result;

/*
Reverb
======

Feedback-delay-network reverb with three voicings (plate, hall, shimmer).
Every channel owns a full engine per voicing, allocated in `prepare`, so
switching voicing while playing never allocates.

Parameters
----------

Topology (0 = plate, 1 = hall, 2 = shimmer):
  Which recipe runs. Switching flushes the incoming engine and
  equal-power crossfades from the outgoing one over 20 ms.

Pre-delay (0 - 250 ms):
  Gap between the dry sound and the start of the reverb.

Decay (0.0 - 1.05):
  Gain per trip around the network. Anything at or above 1.0 is the
  infinite hold: the tail freezes at its current level and new input is
  ignored until decay drops again.

Colour (500 - 18000 Hz):
  Damping cutoff. Low values give a dark, absorbent room.

Mix (0.0 - 1.0):
  Dry/wet blend.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    pub topology: TopologyKind,
    pub pre_delay_ms: f32,
    pub decay: f32,
    pub color_hz: f32,
    pub mix: f32,
}

impl ReverbParams {
    pub const RANGES: &'static [ParamRange] = &[
        ParamRange::new("topology", 0.0, 2.0, 0.0),
        ParamRange::new("pre_delay_ms", 0.0, 250.0, 10.0),
        ParamRange::new("decay", 0.0, 1.05, 0.7),
        ParamRange::new("color_hz", 500.0, 18_000.0, 6_000.0),
        ParamRange::new("mix", 0.0, 1.0, 0.3),
    ];

    pub const MAX_PRE_DELAY_MS: f32 = 250.0;

    /// Decay at or above unity holds the tail indefinitely.
    pub fn is_infinite(&self) -> bool {
        self.decay >= 1.0
    }
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self::from_values(&[])
    }
}

impl ParamSet for ReverbParams {
    const LEN: usize = Self::RANGES.len();

    fn range(index: usize) -> Option<ParamRange> {
        Self::RANGES.get(index).copied()
    }

    fn from_values(values: &[f32]) -> Self {
        let r = Self::RANGES;
        Self {
            topology: TopologyKind::from_index(r[0].pick(values, 0)),
            pre_delay_ms: r[1].pick(values, 1),
            decay: r[2].pick(values, 2),
            color_hz: r[3].pick(values, 3),
            mix: r[4].pick(values, 4),
        }
    }

    fn to_values(&self) -> Vec<f32> {
        vec![
            self.topology as usize as f32,
            self.pre_delay_ms,
            self.decay,
            self.color_hz,
            self.mix,
        ]
    }
}

#[derive(Debug, Clone)]
struct ReverbChannel {
    engines: [Reverb; 3],
    pre_delay: ParamSmoother,
    decay: ParamSmoother,
    color: ParamSmoother,
    mix: ParamSmoother,
    applied_color_hz: f32,
    fade_from: Option<usize>,
    fade_pos: usize,
}

impl ReverbChannel {
    fn new(sample_rate: f32, channel: usize) -> Result<Self> {
        let smoother = || ParamSmoother::with_time(SMOOTHING_MS, sample_rate, SmootherMode::Snapping);
        let engine = |kind: TopologyKind| {
            Reverb::new(kind.topology(), sample_rate, channel, ReverbParams::MAX_PRE_DELAY_MS)
        };
        Ok(Self {
            engines: TopologyKind::ALL.map(engine),
            pre_delay: smoother()?,
            decay: smoother()?,
            color: smoother()?,
            mix: smoother()?,
            applied_color_hz: 0.0,
            fade_from: None,
            fade_pos: 0,
        })
    }

    fn snap_to(&mut self, params: &ReverbParams, sample_rate: f32) {
        self.pre_delay.reset(ms_to_samples(params.pre_delay_ms, sample_rate));
        self.decay.reset(params.decay);
        self.color.reset(params.color_hz);
        self.mix.reset(params.mix);
    }

    fn switch_to(&mut self, index: usize, from: usize, fade: bool) {
        // Switching back mid-fade keeps the engine that is still ringing
        if self.fade_from != Some(index) {
            self.engines[index].reset();
        }
        self.applied_color_hz = 0.0;
        self.fade_from = fade.then_some(from);
        self.fade_pos = 0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReverbEffect {
    channels: Vec<ReverbChannel>,
    sample_rate: f32,
    active: TopologyKind,
    fade_samples: usize,
    needs_snap: bool,
}

impl ReverbEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_topology(&self) -> TopologyKind {
        self.active
    }
}

impl Effect for ReverbEffect {
    type Params = ReverbParams;

    fn prepare(&mut self, config: &ProcessConfig) -> Result<()> {
        config.validate()?;
        self.channels = (0..config.channels)
            .map(|channel| ReverbChannel::new(config.sample_rate, channel))
            .collect::<Result<_>>()?;
        self.sample_rate = config.sample_rate;
        self.fade_samples = (ms_to_samples(SMOOTHING_MS, config.sample_rate).round() as usize).max(1);
        self.needs_snap = true;

        if config.channels > crate::dsp::fdn::LINES {
            warn!(
                "reverb prepared for {} channels; output vectors repeat every {}",
                config.channels,
                crate::dsp::fdn::LINES
            );
        }
        if let Some(first) = self.channels.first() {
            for engine in &first.engines {
                debug!(
                    "reverb {}: taps {:?} at {} Hz",
                    engine.topology().name,
                    engine.network().lengths(),
                    config.sample_rate
                );
            }
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]], params: &ReverbParams) {
        let sample_rate = self.sample_rate;
        let switched = params.topology != self.active;
        let index = params.topology as usize;
        let from = self.active as usize;
        let fade_len = self.fade_samples.max(1);
        let target_pre_delay = ms_to_samples(params.pre_delay_ms, sample_rate);

        for (state, buffer) in self.channels.iter_mut().zip(channels.iter_mut()) {
            if self.needs_snap {
                state.snap_to(params, sample_rate);
            }
            if switched {
                state.switch_to(index, from, !self.needs_snap);
            }

            for sample in buffer.iter_mut() {
                let pre_delay = state.pre_delay.process(target_pre_delay);
                let color_hz = state.color.process(params.color_hz);
                let mix = state.mix.process(params.mix);
                // Infinite hold engages immediately rather than ramping through unity
                let decay = if params.is_infinite() {
                    params.decay
                } else {
                    state.decay.process(params.decay)
                };

                if (color_hz - state.applied_color_hz).abs() > 1.0 {
                    state.engines[index].set_damping_cutoff(color_hz);
                    state.applied_color_hz = color_hz;
                }

                let dry = *sample;
                let mut wet = state.engines[index].process(dry, pre_delay, decay);
                if let Some(outgoing) = state.fade_from {
                    let tail = state.engines[outgoing].process(dry, pre_delay, decay);
                    let angle = state.fade_pos as f32 / fade_len as f32 * FRAC_PI_2;
                    wet = wet * angle.sin() + tail * angle.cos();
                    state.fade_pos += 1;
                    if state.fade_pos >= fade_len {
                        state.fade_from = None;
                    }
                }
                *sample = blend_dry_wet(dry, wet, mix);
            }
        }

        self.active = params.topology;
        self.needs_snap = false;
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            for engine in &mut state.engines {
                engine.reset();
            }
            state.applied_color_hz = 0.0;
            state.fade_from = None;
        }
        self.needs_snap = true;
    }

    fn tail_samples(&self, params: &ReverbParams) -> Option<usize> {
        let longest = self
            .channels
            .iter()
            .map(|state| state.engines[params.topology as usize].network().longest())
            .max()
            .unwrap_or(0);
        let pre_delay = ms_to_samples(params.pre_delay_ms, self.sample_rate);
        decay_tail(longest as f32, params.decay).map(|tail| tail + pre_delay.ceil() as usize)
    }
}
