use thiserror::Error;

use crate::dsp::filter::FilterShape;

/// Configuration errors.
///
/// Everything here is raised while preparing or reconfiguring an effect.
/// The per-sample path never returns an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("sample rate must be finite and positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("maximum block size must be between 1 and {max}, got {0}", max = crate::MAX_BLOCK_SIZE)]
    InvalidBlockSize(usize),

    #[error("at least one audio channel is required")]
    NoChannels,

    #[error("smoothing time must be finite and positive, got {0} ms")]
    InvalidSmoothingTime(f32),

    #[error("filter shape {0:?} has no coefficient formula")]
    UnimplementedShape(FilterShape),
}

pub type Result<T> = std::result::Result<T, Error>;
