//! Host-facing effects and the patterns that compose them.
//!
//! Each effect wraps the `dsp` primitives with what a host needs: one state
//! set per channel sized in `prepare`, smoothed parameters, clamped host
//! value parsing and tail reporting. The `extensions` module adds fluent
//! helpers so chains read left to right.

/// Modulated-delay chorus.
pub mod chorus;
/// Feedback echo with damped repeats.
pub mod echo;
/// Fluent combinators (`.chain()`, `.boxed()`).
pub mod extensions;
/// LFO-swept, tempo-synced biquad.
pub mod filter;
/// Core traits shared by all effects.
pub mod node;
/// Plate, hall and shimmer FDN reverb.
pub mod reverb;
/// Serial chaining of two effects.
pub mod through;

pub use chorus::{ChorusEffect, ChorusParams};
pub use echo::{EchoEffect, EchoParams};
pub use extensions::EffectExt;
pub use filter::{AutoFilterEffect, AutoFilterParams, SweepShape, Tempo};
pub use node::{Effect, HostEffect, ParamSet};
pub use reverb::{ReverbEffect, ReverbParams};
pub use through::Chain;
