//! Messages and snapshots shared between the audio thread and the UI

use saavy_fx::ParamRange;

use crate::source::SourceKind;

/// UI to audio thread. Small and `Copy` so it can cross an rtrb queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    SetParam { index: usize, value: f32 },
    Bypass(bool),
    /// Clear delay lines and tails
    Flush,
    Source(SourceKind),
}

/// Everything the UI needs once, before the first frame.
#[derive(Debug, Clone)]
pub struct UiStateInit {
    pub effect_name: String,
    pub sample_rate: f32,
    pub channels: usize,
    pub ranges: Vec<ParamRange>,
    pub values: Vec<f32>,
    pub source: SourceKind,
}
