//! Low-level DSP primitives used by the effects in `graph`.
//!
//! Everything here is allocation-free once constructed, so a primitive can be
//! built in `prepare` and driven sample by sample from the audio callback.
//! The modules stay focused on the signal math; parameter handling,
//! smoothing and channel layout live one level up.

/// All-pass diffuser (Schroeder and Gerzon forms).
pub mod allpass;
/// Comb / feedback delay with wet/dry mix.
pub mod delay;
/// Four-line feedback delay network.
pub mod fdn;
/// Coefficient designer, biquad and one-pole damping filter.
pub mod filter;
pub mod interpolate;
pub mod mix;
/// Phase-accumulating oscillator and LFO shapes.
pub mod oscillator;
pub mod pitch_shift;
/// Plate, hall and shimmer reverb recipes.
pub mod reverb;
pub mod ring_buffer;
pub mod smoother;

pub use filter::{FilterCoefficients, FilterDesigner, FilterShape};
pub use oscillator::{Oscillator, Waveform};
pub use ring_buffer::RingBuffer;
pub use smoother::{ParamSmoother, SmootherMode};
