//! Delay-line pitch shifter.

/*
Pitch Shifting with a Sweeping Delay
====================================

Reading a delay line while its delay time changes resamples the signal. If
the delay shrinks by one sample every sample the read head moves at twice
the write speed: an octave up. If it grows, the pitch drops.

A phasor sweeps the delay across a fixed window:

    delay = phasor * window        phasor in [0, 1)
    f_phasor = (1 - ratio) * fs / window

For ratio > 1 the phasor runs backwards so the delay shrinks. When it wraps
the read head jumps by a whole window, which clicks. A second tap reads on
the inverse phasor (half a cycle later), and the two are crossfaded with
raised-cosine windows:

    gain = 0.5 - 0.5 cos(2π · phasor)

    tap A   /\    /\    /\          gain is 0 exactly where A jumps
    tap B  \/ \/  \/ \/  \/         and 1 where B jumps, and vice versa

The gains always sum to 1, so a steady input keeps its level. Window length
trades smearing (long) against a rough, buzzy texture (short).

Vocabulary
----------

  ratio     Output/input frequency. 2.0 is an octave up, 0.5 an octave down.
  window    Span of delay the phasor sweeps, in samples.
*/

use crate::dsp::interpolate::Interpolation;
use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::dsp::ring_buffer::{RingBuffer, INTERPOLATION_HEADROOM};
use crate::TWO_PI;

/// Smallest delay either tap reads, keeping the interpolator off the write head.
pub const MIN_TAP_DELAY: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct PitchShifter {
    line: RingBuffer<f32>,
    phasor: Oscillator,
    window: f32,
}

impl PitchShifter {
    pub fn new(window_samples: usize) -> Self {
        let window_samples = window_samples.max(4);
        Self {
            line: RingBuffer::new(window_samples + MIN_TAP_DELAY as usize + INTERPOLATION_HEADROOM),
            phasor: Oscillator::new(),
            window: window_samples as f32,
        }
    }

    /// Window length in samples.
    pub fn window(&self) -> f32 {
        self.window
    }

    #[inline]
    pub fn process(&mut self, input: f32, ratio: f32, sample_rate: f32) -> f32 {
        let phase = self.phasor.phase();
        let frequency = (1.0 - ratio) * sample_rate / self.window;

        let a = self
            .phasor
            .process(frequency, sample_rate, Waveform::Phasor, 0.0);
        let b = Waveform::PhasorInverse.evaluate(phase);

        let tap_a = self
            .line
            .read_interpolated(MIN_TAP_DELAY + a * self.window, Interpolation::Hermite);
        let tap_b = self
            .line
            .read_interpolated(MIN_TAP_DELAY + b * self.window, Interpolation::Hermite);
        self.line.write(input);

        let gain_a = 0.5 - 0.5 * (TWO_PI * a).cos();
        let gain_b = 0.5 - 0.5 * (TWO_PI * b).cos();
        tap_a * gain_a + tap_b * gain_b
    }

    pub fn reset(&mut self) {
        self.line.reset();
        self.phasor.reset(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f32 = 48_000.0;

    fn zero_crossings(signal: &[f32]) -> usize {
        signal
            .windows(2)
            .filter(|pair| (pair[0] < 0.0) != (pair[1] < 0.0))
            .count()
    }

    fn shifted_sine(frequency: f32, ratio: f32) -> Vec<f32> {
        let mut shifter = PitchShifter::new(2_400);
        (0..FS as usize)
            .map(|n| {
                let x = (TWO_PI * frequency * n as f32 / FS).sin();
                shifter.process(x, ratio, FS)
            })
            .collect()
    }

    #[test]
    fn test_unity_ratio_is_a_fixed_delay() {
        let mut shifter = PitchShifter::new(100);
        let out: Vec<f32> = (0..200)
            .map(|n| shifter.process(if n == 0 { 1.0 } else { 0.0 }, 1.0, FS))
            .collect();

        // Frozen phasor at 0: tap A is silent, tap B sits half a window back
        let expected = (MIN_TAP_DELAY + 50.0) as usize;
        for (n, &s) in out.iter().enumerate() {
            if n == expected {
                assert!((s - 1.0).abs() < 1e-5, "peak {s}");
            } else {
                assert!(s.abs() < 1e-5, "sample {n}: {s}");
            }
        }
    }

    #[test]
    fn test_octave_up_doubles_frequency() {
        let out = shifted_sine(440.0, 2.0);
        let crossings = zero_crossings(&out[4_800..]) as f32;
        let seconds = (out.len() - 4_800) as f32 / FS;
        let measured = crossings / (2.0 * seconds);
        assert!((measured - 880.0).abs() < 880.0 * 0.05, "measured {measured} Hz");
    }

    #[test]
    fn test_octave_down_halves_frequency() {
        let out = shifted_sine(440.0, 0.5);
        let crossings = zero_crossings(&out[4_800..]) as f32;
        let seconds = (out.len() - 4_800) as f32 / FS;
        let measured = crossings / (2.0 * seconds);
        assert!((measured - 220.0).abs() < 220.0 * 0.05, "measured {measured} Hz");
    }

    #[test]
    fn test_output_is_bounded() {
        let out = shifted_sine(1_000.0, 1.5);
        assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.01));
    }
}
