//! Recursive filter design and runtime state.

/*
| shape        | order | passes               | rejects              |
| ------------ | ----- | -------------------- | -------------------- |
| Flat         | -     | everything           | nothing (bypass)     |
| LowPass1/2   | 1 / 2 | below cutoff         | above cutoff         |
| HighPass1/2  | 1 / 2 | above cutoff         | below cutoff         |
| AllPass1/2   | 1 / 2 | everything           | nothing (phase only) |
| BandPass     | 2     | around cutoff        | both sides           |
| BandReject   | 2     | outside cutoff       | around cutoff        |
| Peak         | 2     | no formula yet                              |
| Parametric   | 2     | no formula yet                              |
| LowShelf     | 2     | no formula yet                              |
| HighShelf    | 2     | no formula yet                              |

Coefficient convention: `a*` are the numerator (feed-forward) terms and
`b*` the denominator (feedback) terms of

            a0 + a1 z^-1 + a2 z^-2
    H(z) = ------------------------
            b0 + b1 z^-1 + b2 z^-2

normalized so that b0 == 1. Second-order shapes use the RBJ cookbook
formulas, first-order shapes the bilinear transform with K = tan(ω/2).
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result, TWO_PI};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterShape {
    #[default]
    Flat,
    LowPass2,
    BandPass,
    HighPass2,
    LowPass1,
    HighPass1,
    AllPass1,
    AllPass2,
    Peak,
    Parametric,
    BandReject,
    LowShelf,
    HighShelf,
}

impl FilterShape {
    /// Shapes with a working coefficient formula.
    pub const IMPLEMENTED: [FilterShape; 9] = [
        FilterShape::Flat,
        FilterShape::LowPass1,
        FilterShape::LowPass2,
        FilterShape::HighPass1,
        FilterShape::HighPass2,
        FilterShape::AllPass1,
        FilterShape::AllPass2,
        FilterShape::BandPass,
        FilterShape::BandReject,
    ];

    pub fn is_implemented(self) -> bool {
        Self::IMPLEMENTED.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
}

impl FilterCoefficients {
    /// The identity filter.
    pub const FLAT: FilterCoefficients = FilterCoefficients {
        a0: 1.0,
        a1: 0.0,
        a2: 0.0,
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
    };

    fn normalized(a0: f32, a1: f32, a2: f32, b0: f32, b1: f32, b2: f32) -> Self {
        Self {
            a0: a0 / b0,
            a1: a1 / b0,
            a2: a2 / b0,
            b0: 1.0,
            b1: b1 / b0,
            b2: b2 / b0,
        }
    }

    /// As `(a0, a1, a2, b0, b1, b2)`.
    pub fn as_tuple(&self) -> (f32, f32, f32, f32, f32, f32) {
        (self.a0, self.a1, self.a2, self.b0, self.b1, self.b2)
    }

    /// |H(e^jω)| at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f32, sample_rate: f32) -> f32 {
        let w = TWO_PI * freq_hz / sample_rate;
        let (c1, s1) = (w.cos(), w.sin());
        let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = self.a0 + self.a1 * c1 + self.a2 * c2;
        let num_im = -(self.a1 * s1 + self.a2 * s2);
        let den_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let den_im = -(self.b1 * s1 + self.b2 * s2);

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }
}

impl Default for FilterCoefficients {
    fn default() -> Self {
        Self::FLAT
    }
}

/// Turns cutoff/Q/gain into coefficients for any `FilterShape`.
///
/// `set_parameters` caches the trig and gain terms; `design` evaluates a
/// shape against that cache and hands back the coefficients by value.
#[derive(Debug, Clone)]
pub struct FilterDesigner {
    cutoff_hz: f32,
    sample_rate: f32,
    q: f32,
    gain_db: f32,

    omega: f32,
    sin_omega: f32,
    cos_omega: f32,
    gain: f32,
}

impl FilterDesigner {
    pub const MIN_Q: f32 = 0.01;

    pub fn new(sample_rate: f32) -> Self {
        let mut designer = Self {
            cutoff_hz: 1200.0,
            sample_rate,
            q: std::f32::consts::FRAC_1_SQRT_2,
            gain_db: 0.0,
            omega: 0.0,
            sin_omega: 0.0,
            cos_omega: 1.0,
            gain: 1.0,
        };
        designer.set_parameters(1200.0, sample_rate, std::f32::consts::FRAC_1_SQRT_2, 0.0);
        designer
    }

    /// Cache ω, sin ω, cos ω and the linear gain.
    ///
    /// Cutoff is kept inside (1 Hz, 0.499 fs) so the trig terms never
    /// degenerate.
    pub fn set_parameters(&mut self, cutoff_hz: f32, sample_rate: f32, q: f32, gain_db: f32) {
        let sample_rate = sample_rate.max(1.0);
        let cutoff_hz = cutoff_hz.clamp(1.0, sample_rate * 0.499);

        self.cutoff_hz = cutoff_hz;
        self.sample_rate = sample_rate;
        self.q = q.max(Self::MIN_Q);
        self.gain_db = gain_db;

        self.omega = TWO_PI * cutoff_hz / sample_rate;
        self.sin_omega = self.omega.sin();
        self.cos_omega = self.omega.cos();
        self.gain = 10.0_f32.powf(gain_db / 20.0);
    }

    pub fn design(&self, shape: FilterShape) -> Result<FilterCoefficients> {
        let (sin_w, cos_w, g) = (self.sin_omega, self.cos_omega, self.gain);
        let alpha = sin_w / (2.0 * self.q);
        let k = (self.omega * 0.5).tan();

        let coefficients = match shape {
            FilterShape::Flat => FilterCoefficients::FLAT,
            FilterShape::LowPass1 => {
                FilterCoefficients::normalized(g * k, g * k, 0.0, k + 1.0, k - 1.0, 0.0)
            }
            FilterShape::HighPass1 => {
                FilterCoefficients::normalized(g, -g, 0.0, k + 1.0, k - 1.0, 0.0)
            }
            FilterShape::AllPass1 => {
                FilterCoefficients::normalized(g * (k - 1.0), g * (k + 1.0), 0.0, k + 1.0, k - 1.0, 0.0)
            }
            FilterShape::LowPass2 => {
                let side = (1.0 - cos_w) * 0.5 * g;
                FilterCoefficients::normalized(
                    side,
                    2.0 * side,
                    side,
                    1.0 + alpha,
                    -2.0 * cos_w,
                    1.0 - alpha,
                )
            }
            FilterShape::HighPass2 => {
                let side = (1.0 + cos_w) * 0.5 * g;
                FilterCoefficients::normalized(
                    side,
                    -2.0 * side,
                    side,
                    1.0 + alpha,
                    -2.0 * cos_w,
                    1.0 - alpha,
                )
            }
            FilterShape::AllPass2 => FilterCoefficients::normalized(
                g * (1.0 - alpha),
                g * -2.0 * cos_w,
                g * (1.0 + alpha),
                1.0 + alpha,
                -2.0 * cos_w,
                1.0 - alpha,
            ),
            FilterShape::BandPass => FilterCoefficients::normalized(
                g * alpha,
                0.0,
                g * -alpha,
                1.0 + alpha,
                -2.0 * cos_w,
                1.0 - alpha,
            ),
            FilterShape::BandReject => FilterCoefficients::normalized(
                g,
                g * -2.0 * cos_w,
                g,
                1.0 + alpha,
                -2.0 * cos_w,
                1.0 - alpha,
            ),
            FilterShape::Peak
            | FilterShape::Parametric
            | FilterShape::LowShelf
            | FilterShape::HighShelf => return Err(Error::UnimplementedShape(shape)),
        };

        Ok(coefficients)
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }
}

/// Second-order section in transposed direct form II.
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coefficients: FilterCoefficients,
    s1: f32,
    s2: f32,
}

impl Biquad {
    pub fn new(coefficients: FilterCoefficients) -> Self {
        Self {
            coefficients,
            s1: 0.0,
            s2: 0.0,
        }
    }

    /// Swap coefficients, keeping the state registers so sweeps stay smooth.
    #[inline]
    pub fn set_coefficients(&mut self, coefficients: FilterCoefficients) {
        self.coefficients = coefficients;
    }

    pub fn coefficients(&self) -> FilterCoefficients {
        self.coefficients
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coefficients;
        let output = c.a0 * input + self.s1;
        self.s1 = c.a1 * input - c.b1 * output + self.s2;
        self.s2 = c.a2 * input - c.b2 * output;
        output
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}

/// One-pole low-pass used for damping: `y = (1 - d) x + d y[n-1]`.
#[derive(Debug, Clone, Default)]
pub struct OnePole {
    damping: f32,
    state: f32,
}

impl OnePole {
    pub const MAX_DAMPING: f32 = 0.99;

    pub fn new() -> Self {
        Self::default()
    }

    /// 0.0 passes the input through, values toward 1.0 darken it.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, Self::MAX_DAMPING);
    }

    /// Set damping from a -3 dB style cutoff, `d = exp(-2π fc / fs)`.
    pub fn set_cutoff(&mut self, cutoff_hz: f32, sample_rate: f32) {
        let safe_cutoff = cutoff_hz.clamp(20.0, sample_rate * 0.49);
        self.set_damping((-TWO_PI * safe_cutoff / sample_rate).exp());
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = (1.0 - self.damping) * input + self.damping * self.state;
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
