//! Phase-accumulating oscillator shared by audible tones and LFOs.

/*
Oscillator
==========

One accumulator, many shapes. The oscillator keeps a phase angle in
radians, evaluates the selected waveform at `phase + phase_offset`, and then
advances by

    Δφ = 2π · frequency / sample_rate

per sample. After every step the phase is wrapped back into [0, 2π) so that
long sessions do not lose precision to an ever-growing angle.

The same code drives audible tones (20 Hz - 20 kHz) and control-rate LFOs
(0.01 - 20 Hz) that sweep delay times and filter cutoffs. Negative
frequencies run the phase backwards; zero freezes it. Neither is rejected.

Vocabulary
----------

  phase         Where in the cycle we are, 0..2π.
  phase offset  A constant shift added before evaluation. Two oscillators
                with offsets 0 and π produce mirror-image modulation, which
                is how stereo chorus decorrelates its channels.
  bipolar       Output in [-1, 1]. Every shape except the phasors.
  phasor        A unipolar ramp in [0, 1). Drives delay-line read heads
                for pitch shifting.

Shapes
------

    Sine           sin(φ)
    Triangle       (2/π) · asin(sin(φ))
    Sawtooth       2 · frac(φ / 2π) - 1
    Square         sign(sin(φ)), exactly 0 at the crossings
    Trapezoid      Σ sin(kφ)/k over the first 16 odd k. Band-limited, peaks
                   near ±0.93 with the Gibbs ripple left on the plateaus
    Phasor         frac(φ / 2π)
    PhasorInverse  frac((φ + π) / 2π), the phasor half a cycle later
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::TWO_PI;

/// Number of odd harmonics summed by the trapezoid shape.
const TRAPEZOID_HARMONICS: usize = 16;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Sawtooth,
    Square,
    Trapezoid,
    Phasor,
    PhasorInverse,
}

impl Waveform {
    pub const ALL: [Waveform; 7] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Sawtooth,
        Waveform::Square,
        Waveform::Trapezoid,
        Waveform::Phasor,
        Waveform::PhasorInverse,
    ];

    /// Unipolar shapes output [0, 1); the rest [-1, 1].
    pub fn is_unipolar(self) -> bool {
        matches!(self, Waveform::Phasor | Waveform::PhasorInverse)
    }

    /// Evaluate the shape at `angle` radians.
    #[inline]
    pub fn evaluate(self, angle: f32) -> f32 {
        match self {
            Waveform::Sine => angle.sin(),
            Waveform::Triangle => {
                (std::f32::consts::FRAC_2_PI * angle.sin().asin()).clamp(-1.0, 1.0)
            }
            Waveform::Sawtooth => (2.0 * ramp(angle) - 1.0).clamp(-1.0, 1.0),
            Waveform::Square => {
                let s = angle.sin();
                if s > 0.0 {
                    1.0
                } else if s < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Waveform::Trapezoid => {
                let mut sum = 0.0;
                for n in 0..TRAPEZOID_HARMONICS {
                    let k = (2 * n + 1) as f32;
                    sum += (k * angle).sin() / k;
                }
                sum
            }
            Waveform::Phasor => ramp(angle),
            Waveform::PhasorInverse => ramp(angle + std::f32::consts::PI),
        }
    }
}

/// `frac(angle / 2π)`, kept strictly below 1.0.
#[inline]
fn ramp(angle: f32) -> f32 {
    let value = (angle / TWO_PI).rem_euclid(1.0);
    // rem_euclid can round a tiny negative angle up to exactly 1.0
    if value >= 1.0 {
        0.0
    } else {
        value
    }
}

#[derive(Debug, Clone, Default)]
pub struct Oscillator {
    phase: f32,
}

impl Oscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Start at `phase` radians (wrapped into [0, 2π)).
    pub fn with_phase(phase: f32) -> Self {
        let mut osc = Self::new();
        osc.reset(phase);
        osc
    }

    /// Emit the current sample, then advance one step.
    #[inline]
    pub fn process(
        &mut self,
        frequency: f32,
        sample_rate: f32,
        waveform: Waveform,
        phase_offset: f32,
    ) -> f32 {
        let sample = waveform.evaluate(self.phase + phase_offset);
        self.phase = wrap_phase(self.phase + TWO_PI * frequency / sample_rate);
        sample
    }

    /// Fill `destination` with consecutive samples.
    pub fn render(
        &mut self,
        destination: &mut [f32],
        frequency: f32,
        sample_rate: f32,
        waveform: Waveform,
    ) {
        for sample in destination.iter_mut() {
            *sample = self.process(frequency, sample_rate, waveform, 0.0);
        }
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self, phase: f32) {
        self.phase = wrap_phase(phase);
    }
}

#[inline]
fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(TWO_PI);
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep() -> impl Iterator<Item = (f32, f32)> {
        [44_100.0, 48_000.0].into_iter().flat_map(|sr| {
            [1.0, 5.5, 110.0, 440.0, 1_234.5, 5_000.0, 10_000.0]
                .into_iter()
                .map(move |f| (f, sr))
        })
    }

    #[test]
    fn test_bipolar_shapes_stay_in_range() {
        for waveform in Waveform::ALL.into_iter().filter(|w| !w.is_unipolar()) {
            for (frequency, sample_rate) in sweep() {
                let mut osc = Oscillator::new();
                for _ in 0..4_096 {
                    let s = osc.process(frequency, sample_rate, waveform, 0.0);
                    assert!(
                        (-1.0..=1.0).contains(&s),
                        "{waveform:?} at {frequency} Hz / {sample_rate} gave {s}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_phasors_stay_below_one() {
        for waveform in [Waveform::Phasor, Waveform::PhasorInverse] {
            for (frequency, sample_rate) in sweep() {
                let mut osc = Oscillator::new();
                for _ in 0..4_096 {
                    let s = osc.process(frequency, sample_rate, waveform, 0.0);
                    assert!((0.0..1.0).contains(&s), "{waveform:?} gave {s}");
                }
            }
        }
    }

    #[test]
    fn test_phase_stays_wrapped() {
        let mut osc = Oscillator::new();
        for _ in 0..100_000 {
            osc.process(9_999.0, 44_100.0, Waveform::Sine, 0.0);
            assert!((0.0..TWO_PI).contains(&osc.phase()));
        }
        // Backwards too
        for _ in 0..1_000 {
            osc.process(-300.0, 44_100.0, Waveform::Sine, 0.0);
            assert!((0.0..TWO_PI).contains(&osc.phase()));
        }
    }

    #[test]
    fn test_sine_matches_closed_form() {
        let mut osc = Oscillator::new();
        let (f, sr) = (440.0, 48_000.0);
        for n in 0..256 {
            let expected = (TWO_PI * f * n as f32 / sr).sin();
            let got = osc.process(f, sr, Waveform::Sine, 0.0);
            assert!((got - expected).abs() < 1e-3, "sample {n}");
        }
    }

    #[test]
    fn test_trapezoid_is_unscaled_odd_harmonic_sum() {
        // Partial Leibniz series at a quarter cycle, just under π/4
        let plateau = Waveform::Trapezoid.evaluate(TWO_PI / 4.0);
        assert!(plateau < std::f32::consts::FRAC_PI_4);
        assert!((plateau - std::f32::consts::FRAC_PI_4).abs() < 0.02, "got {plateau}");

        // No clipped corners: a slow cycle moves by tiny steps everywhere
        let mut osc = Oscillator::new();
        let mut previous = osc.process(1.0, 48_000.0, Waveform::Trapezoid, 0.0);
        for _ in 0..48_000 {
            let s = osc.process(1.0, 48_000.0, Waveform::Trapezoid, 0.0);
            assert!((s - previous).abs() < 0.005);
            assert!(s.abs() < 0.95);
            previous = s;
        }
    }

    #[test]
    fn test_square_is_exactly_zero_at_crossing() {
        assert_eq!(Waveform::Square.evaluate(0.0), 0.0);
        assert_eq!(Waveform::Square.evaluate(1.0), 1.0);
        assert_eq!(Waveform::Square.evaluate(4.0), -1.0);
    }

    #[test]
    fn test_phasor_pair_is_half_a_cycle_apart() {
        for &angle in &[0.0, 0.5, 2.0, 4.0, 6.0] {
            let a = Waveform::Phasor.evaluate(angle);
            let b = Waveform::PhasorInverse.evaluate(angle);
            let diff = (a - b).rem_euclid(1.0);
            assert!((diff - 0.5).abs() < 1e-5, "angle {angle}");
        }
    }

    #[test]
    fn test_zero_and_negative_frequency() {
        let mut frozen = Oscillator::with_phase(1.0);
        let first = frozen.process(0.0, 48_000.0, Waveform::Phasor, 0.0);
        for _ in 0..10 {
            assert_eq!(frozen.process(0.0, 48_000.0, Waveform::Phasor, 0.0), first);
        }

        let mut reversed = Oscillator::with_phase(3.0);
        let a = reversed.process(-100.0, 48_000.0, Waveform::Phasor, 0.0);
        let b = reversed.process(-100.0, 48_000.0, Waveform::Phasor, 0.0);
        assert!(b < a);
    }

    #[test]
    fn test_render_matches_process() {
        let mut a = Oscillator::new();
        let mut b = Oscillator::new();
        let mut block = [0.0; 64];
        a.render(&mut block, 220.0, 44_100.0, Waveform::Triangle);
        for (i, &s) in block.iter().enumerate() {
            assert_eq!(s, b.process(220.0, 44_100.0, Waveform::Triangle, 0.0), "sample {i}");
        }
    }
}
