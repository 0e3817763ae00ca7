pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Host-facing effects and composition

pub use config::{ParamRange, ProcessConfig};
pub use error::{Error, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Full turn in radians, shared by every phase and coefficient calculation.
pub const TWO_PI: f32 = std::f32::consts::TAU;
