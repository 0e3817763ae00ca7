//! Fractional-sample reconstruction.

/*
Fractional Delay Interpolation
==============================

A delay line stores samples at whole-sample positions. Modulated effects
(chorus, pitch shifting, smoothed delay-time automation) ask for positions
in between, e.g. "441.37 samples ago". Interpolation rebuilds the missing
value from the stored neighbours.

All three policies look at the same four-sample neighbourhood around the
integer part `n` of the requested delay:

    x_m1 = sample n-1 ago   (newer)
    x0   = sample n   ago
    x1   = sample n+1 ago
    x2   = sample n+2 ago   (older)

and a fractional part `frac` in [0, 1) that moves from x0 toward x1.

  Linear     Straight line between x0 and x1. Cheap, but its slope jumps at
             every sample boundary, which is audible as zipper noise when
             the delay is swept.

  Hermite    Cubic through x0 and x1 with Catmull-Rom tangents taken from
             the outer neighbours. Continuous in value and first derivative.
             The default for modulation and pitch shifting.

  Lagrange   The unique cubic through all four points. Almost the same
             result as Hermite, more multiplies. Offered as an alternative.

All three return exactly x0 when frac == 0.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Truncate to the integer delay.
    None,
    Linear,
    #[default]
    Hermite,
    Lagrange,
}

#[inline]
pub fn linear(x0: f32, x1: f32, frac: f32) -> f32 {
    if frac >= 1.0 {
        return x1;
    }
    frac * x1 + (1.0 - frac) * x0
}

/// Catmull-Rom cubic in Horner form.
#[inline]
pub fn hermite(x_m1: f32, x0: f32, x1: f32, x2: f32, frac: f32) -> f32 {
    let c = (x1 - x_m1) * 0.5;
    let v = x0 - x1;
    let w = c + v;
    let a = w + v + (x2 - x0) * 0.5;
    let b_neg = w + a;
    ((a * frac - b_neg) * frac + c) * frac + x0
}

/// Four-point Lagrange polynomial through nodes at -1, 0, 1 and 2.
#[inline]
pub fn lagrange(x_m1: f32, x0: f32, x1: f32, x2: f32, frac: f32) -> f32 {
    let d_m1 = frac + 1.0;
    let d0 = frac;
    let d1 = frac - 1.0;
    let d2 = frac - 2.0;

    let l_m1 = -(d0 * d1 * d2) / 6.0;
    let l0 = (d_m1 * d1 * d2) / 2.0;
    let l1 = -(d_m1 * d0 * d2) / 2.0;
    let l2 = (d_m1 * d0 * d1) / 6.0;

    x_m1 * l_m1 + x0 * l0 + x1 * l1 + x2 * l2
}
