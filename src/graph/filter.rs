use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ParamRange, ProcessConfig};
use crate::dsp::filter::{Biquad, FilterDesigner, FilterShape};
use crate::dsp::mix::blend_dry_wet;
use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::dsp::smoother::{ParamSmoother, SmootherMode};
use crate::graph::node::{Effect, ParamSet, SMOOTHING_MS};
use crate::Result;

/*
Auto-Filter
===========

A resonant biquad whose cutoff is swept by an LFO locked to the host tempo.
Sweeping a band-pass gives the classic auto-wah; a low-pass gives slow,
breathing pads.

Every sample:

    lfo     = oscillator(tempo_hz × speed)            in [-1, 1]
    cutoff  = smoothed_cutoff + lfo × amount          clamped to [20 Hz, fs/2]
    coeffs  = design(shape, cutoff, resonance)
    out     = biquad(in) × mix + in × (1 - mix)

Tempo Sync
----------

One LFO cycle per bar of the host's time signature, scaled by speed:

    tempo_hz = bpm / 60 × numerator / denominator

120 bpm in 4/4 is 2 Hz; speed 2 doubles it to 4 Hz.

Parameters
----------

  cutoff      20 - 2500 Hz      centre of the sweep
  resonance   0.1 - 18          Q of the biquad
  speed       1 - 10            multiples of the tempo rate
  amount      0 - 1000 Hz       sweep depth either side of the centre
  mix         0.01 - 1.0        dry/wet
  shape       0 - 3             flat, low-pass, band-pass, high-pass
  waveform    0 - 4             sine, triangle, sawtooth, trapezoid, square
  bpm, numerator, denominator   host transport
*/

/// Host transport, used to derive the LFO rate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    pub bpm: f32,
    pub numerator: f32,
    pub denominator: f32,
}

impl Tempo {
    #[inline]
    pub fn hz(&self, speed: f32) -> f32 {
        self.bpm / 60.0 * self.numerator / self.denominator * speed
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            numerator: 4.0,
            denominator: 4.0,
        }
    }
}

/// Responses the sweep can run. Every variant has a coefficient formula,
/// so the designer cannot fail on the audio thread.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepShape {
    Flat,
    #[default]
    LowPass,
    BandPass,
    HighPass,
}

impl SweepShape {
    pub const ALL: [SweepShape; 4] = [
        SweepShape::Flat,
        SweepShape::LowPass,
        SweepShape::BandPass,
        SweepShape::HighPass,
    ];

    pub fn filter_shape(self) -> FilterShape {
        match self {
            SweepShape::Flat => FilterShape::Flat,
            SweepShape::LowPass => FilterShape::LowPass2,
            SweepShape::BandPass => FilterShape::BandPass,
            SweepShape::HighPass => FilterShape::HighPass2,
        }
    }
}

const WAVEFORMS: [Waveform; 5] = [
    Waveform::Sine,
    Waveform::Triangle,
    Waveform::Sawtooth,
    Waveform::Trapezoid,
    Waveform::Square,
];

fn slot<T: Copy + PartialEq>(table: &[T], value: f32) -> T {
    let index = (value.round().max(0.0) as usize).min(table.len() - 1);
    table[index]
}

fn index_of<T: PartialEq>(table: &[T], item: &T) -> f32 {
    table.iter().position(|t| t == item).unwrap_or(0) as f32
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoFilterParams {
    pub cutoff_hz: f32,
    pub resonance: f32,
    pub speed: f32,
    pub amount_hz: f32,
    pub mix: f32,
    pub shape: SweepShape,
    pub waveform: Waveform,
    pub tempo: Tempo,
}

impl AutoFilterParams {
    pub const RANGES: &'static [ParamRange] = &[
        ParamRange::new("cutoff_hz", 20.0, 2_500.0, 1_200.0),
        ParamRange::new("resonance", 0.1, 18.0, 1.0),
        ParamRange::new("speed", 1.0, 10.0, 1.0),
        ParamRange::new("amount_hz", 0.0, 1_000.0, 100.0),
        ParamRange::new("mix", 0.01, 1.0, 0.5),
        ParamRange::new("shape", 0.0, 3.0, 1.0),
        ParamRange::new("waveform", 0.0, 4.0, 0.0),
        ParamRange::new("bpm", 20.0, 300.0, 120.0),
        ParamRange::new("numerator", 1.0, 16.0, 4.0),
        ParamRange::new("denominator", 1.0, 16.0, 4.0),
    ];
}

impl Default for AutoFilterParams {
    fn default() -> Self {
        Self::from_values(&[])
    }
}

impl ParamSet for AutoFilterParams {
    const LEN: usize = Self::RANGES.len();

    fn range(index: usize) -> Option<ParamRange> {
        Self::RANGES.get(index).copied()
    }

    fn from_values(values: &[f32]) -> Self {
        let r = Self::RANGES;
        Self {
            cutoff_hz: r[0].pick(values, 0),
            resonance: r[1].pick(values, 1),
            speed: r[2].pick(values, 2).round(),
            amount_hz: r[3].pick(values, 3),
            mix: r[4].pick(values, 4),
            shape: slot(&SweepShape::ALL, r[5].pick(values, 5)),
            waveform: slot(&WAVEFORMS, r[6].pick(values, 6)),
            tempo: Tempo {
                bpm: r[7].pick(values, 7),
                numerator: r[8].pick(values, 8).round(),
                denominator: r[9].pick(values, 9).round(),
            },
        }
    }

    fn to_values(&self) -> Vec<f32> {
        vec![
            self.cutoff_hz,
            self.resonance,
            self.speed,
            self.amount_hz,
            self.mix,
            index_of(&SweepShape::ALL, &self.shape),
            index_of(&WAVEFORMS, &self.waveform),
            self.tempo.bpm,
            self.tempo.numerator,
            self.tempo.denominator,
        ]
    }
}

#[derive(Debug, Clone)]
struct FilterChannel {
    biquad: Biquad,
    lfo: Oscillator,
    cutoff: ParamSmoother,
    mix: ParamSmoother,
}

#[derive(Debug, Clone)]
pub struct AutoFilterEffect {
    channels: Vec<FilterChannel>,
    designer: FilterDesigner,
    sample_rate: f32,
    needs_snap: bool,
}

impl AutoFilterEffect {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            designer: FilterDesigner::new(48_000.0),
            sample_rate: 48_000.0,
            needs_snap: true,
        }
    }
}

impl Default for AutoFilterEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for AutoFilterEffect {
    type Params = AutoFilterParams;

    fn prepare(&mut self, config: &ProcessConfig) -> Result<()> {
        config.validate()?;
        let sample_rate = config.sample_rate;
        let smoother = || ParamSmoother::with_time(SMOOTHING_MS, sample_rate, SmootherMode::Snapping);

        self.channels = (0..config.channels)
            .map(|_| -> Result<FilterChannel> {
                Ok(FilterChannel {
                    biquad: Biquad::default(),
                    lfo: Oscillator::new(),
                    cutoff: smoother()?,
                    mix: smoother()?,
                })
            })
            .collect::<Result<_>>()?;
        self.designer = FilterDesigner::new(sample_rate);
        self.sample_rate = sample_rate;
        self.needs_snap = true;

        debug!("auto-filter prepared: {} channels at {sample_rate} Hz", config.channels);
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]], params: &AutoFilterParams) {
        let sample_rate = self.sample_rate;
        let nyquist = sample_rate * 0.5;
        let lfo_hz = params.tempo.hz(params.speed);
        let shape = params.shape.filter_shape();

        for (state, buffer) in self.channels.iter_mut().zip(channels.iter_mut()) {
            if self.needs_snap {
                state.cutoff.reset(params.cutoff_hz);
                state.mix.reset(params.mix);
            }

            for sample in buffer.iter_mut() {
                let mix = state.mix.process(params.mix);
                let centre = state.cutoff.process(params.cutoff_hz);
                let modulation = state.lfo.process(lfo_hz, sample_rate, params.waveform, 0.0);
                let cutoff = (centre + modulation * params.amount_hz).clamp(20.0, nyquist);

                self.designer
                    .set_parameters(cutoff, sample_rate, params.resonance, 0.0);
                if let Ok(coefficients) = self.designer.design(shape) {
                    state.biquad.set_coefficients(coefficients);
                }

                let dry = *sample;
                *sample = blend_dry_wet(dry, state.biquad.process(dry), mix);
            }
        }
        self.needs_snap = false;
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            state.biquad.reset();
            state.lfo.reset(0.0);
        }
        self.needs_snap = true;
    }

    fn tail_samples(&self, _params: &AutoFilterParams) -> Option<usize> {
        // Ringing of a high-Q biquad, not a true delay tail
        Some((self.sample_rate * 0.05) as usize)
    }
}
