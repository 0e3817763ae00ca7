//! Benchmarks for low-level DSP primitives.

mod delay;
mod filter;
mod mix;
mod oscillator;
mod reverb;
mod ring_buffer;

pub use delay::bench_delay;
pub use filter::bench_filter;
pub use mix::bench_mix;
pub use oscillator::bench_oscillator;
pub use reverb::bench_reverb;
pub use ring_buffer::bench_ring_buffer;
