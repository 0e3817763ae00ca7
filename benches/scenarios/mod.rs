//! Host-facing effect benchmarks.
//!
//! These drive the effects the way a plugin host does: stereo blocks in
//! place, parameters parsed from a flat value array every block.

mod effects;

pub use effects::{bench_chains, bench_effects};
