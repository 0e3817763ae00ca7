//! Prepare-time configuration and published parameter ranges.

use crate::{Error, Result, MAX_BLOCK_SIZE};

/// What the host announces before audio starts flowing.
///
/// Effects size every buffer from this in `prepare` and never reallocate
/// while processing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessConfig {
    pub sample_rate: f32,
    pub max_block_size: usize,
    pub channels: usize,
}

impl ProcessConfig {
    pub fn new(sample_rate: f32, max_block_size: usize, channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            channels,
        }
    }

    /// Stereo at 48 kHz with 512-sample blocks.
    pub fn stereo(sample_rate: f32) -> Self {
        Self::new(sample_rate, 512, 2)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 || self.max_block_size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize(self.max_block_size));
        }
        if self.channels == 0 {
            return Err(Error::NoChannels);
        }
        Ok(())
    }

    /// Convert milliseconds to (fractional) samples at this rate.
    #[inline]
    pub fn ms_to_samples(&self, ms: f32) -> f32 {
        ms_to_samples(ms, self.sample_rate)
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::stereo(48_000.0)
    }
}

#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * 0.001 * sample_rate
}

/// Published bounds for one automatable control.
///
/// Host values are clamped into `[min, max]` before they reach the DSP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    pub const fn new(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            min,
            max,
            default,
        }
    }

    /// Clamp into range. NaN falls back to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Clamp the value at `index`, or return the default when the host
    /// supplied fewer values.
    #[inline]
    pub fn pick(&self, values: &[f32], index: usize) -> f32 {
        values
            .get(index)
            .map_or(self.default, |&value| self.clamp(value))
    }
}
