use crate::config::{ParamRange, ProcessConfig};
use crate::Result;

/// Smoothing time applied to every continuous control.
pub const SMOOTHING_MS: f32 = 20.0;

/// Typed parameters for one effect, built from the host's raw values.
///
/// Slot `i` of the host's value array maps to `range(i)`.
pub trait ParamSet: Copy + Send + Default {
    /// Number of host slots.
    const LEN: usize;

    /// Published bounds for slot `index`.
    fn range(index: usize) -> Option<ParamRange>;

    /// Build from host values. Every value is clamped to its range; missing
    /// slots take the default.
    fn from_values(values: &[f32]) -> Self;

    /// Back to host values, in slot order.
    fn to_values(&self) -> Vec<f32>;

    fn ranges() -> Vec<ParamRange> {
        (0..Self::LEN).filter_map(Self::range).collect()
    }
}

/// Serial composition: the first set's slots, then the second's.
impl<A: ParamSet, B: ParamSet> ParamSet for (A, B) {
    const LEN: usize = A::LEN + B::LEN;

    fn range(index: usize) -> Option<ParamRange> {
        if index < A::LEN {
            A::range(index)
        } else {
            B::range(index - A::LEN)
        }
    }

    fn from_values(values: &[f32]) -> Self {
        let split = A::LEN.min(values.len());
        let (head, tail) = values.split_at(split);
        (A::from_values(head), B::from_values(tail))
    }

    fn to_values(&self) -> Vec<f32> {
        let mut values = self.0.to_values();
        values.extend(self.1.to_values());
        values
    }
}

/// Core trait for in-place multichannel effects.
///
/// Lifecycle: `prepare` once the host announces its format (allocates and
/// may fail), then any number of `process` calls (never allocates, never
/// fails), with `reset` whenever playback restarts.
pub trait Effect: Send {
    type Params: ParamSet;

    fn prepare(&mut self, config: &ProcessConfig) -> Result<()>;

    /// Overwrite every channel slice with processed audio.
    ///
    /// Channels beyond the prepared count pass through untouched.
    fn process(&mut self, channels: &mut [&mut [f32]], params: &Self::Params);

    /// Flush delay lines and filter state, keeping the allocation.
    fn reset(&mut self);

    /// How long the effect keeps sounding after the input stops.
    /// `None` means it may never stop.
    fn tail_samples(&self, params: &Self::Params) -> Option<usize> {
        let _ = params;
        Some(0)
    }
}

/// Object-safe view of an `Effect` driven by raw host values, for hosts
/// that pick the effect at runtime.
pub trait HostEffect: Send {
    fn ranges(&self) -> Vec<ParamRange>;

    fn configure(&mut self, config: &ProcessConfig) -> Result<()>;

    fn process_values(&mut self, channels: &mut [&mut [f32]], values: &[f32]);

    fn flush(&mut self);

    fn tail_samples_for(&self, values: &[f32]) -> Option<usize>;
}

impl<E: Effect> HostEffect for E {
    fn ranges(&self) -> Vec<ParamRange> {
        E::Params::ranges()
    }

    fn configure(&mut self, config: &ProcessConfig) -> Result<()> {
        self.prepare(config)
    }

    fn process_values(&mut self, channels: &mut [&mut [f32]], values: &[f32]) {
        let params = E::Params::from_values(values);
        self.process(channels, &params);
    }

    fn flush(&mut self) {
        self.reset()
    }

    fn tail_samples_for(&self, values: &[f32]) -> Option<usize> {
        self.tail_samples(&E::Params::from_values(values))
    }
}

/// Default values for every slot of `P`.
pub fn default_values<P: ParamSet>() -> Vec<f32> {
    P::ranges().iter().map(|range| range.default).collect()
}

/// Samples for the feedback loop to fall by 60 dB, given the loop length
/// and per-trip gain. `None` when the gain never lets it die away.
pub fn decay_tail(loop_samples: f32, gain: f32) -> Option<usize> {
    let gain = gain.abs();
    if gain >= 1.0 {
        return None;
    }
    if gain <= f32::EPSILON {
        return Some(loop_samples.ceil() as usize);
    }
    let trips = 0.001f32.ln() / gain.ln();
    Some((loop_samples * (trips + 1.0)).ceil() as usize)
}
