//! Test signals fed into the effect under audition.

use saavy_fx::dsp::{Oscillator, Waveform};

/// A minor-ish arpeggio, one note per pluck.
const PLUCK_NOTES: [f32; 4] = [220.0, 261.63, 329.63, 392.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Decaying saw plucks, two per second
    Plucks,
    /// Steady low saw, good for hearing filters and chorus
    Drone,
    /// Single-sample clicks, shows the raw impulse response
    Clicks,
}

impl SourceKind {
    pub fn next(self) -> Self {
        match self {
            SourceKind::Plucks => SourceKind::Drone,
            SourceKind::Drone => SourceKind::Clicks,
            SourceKind::Clicks => SourceKind::Plucks,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Plucks => "plucks",
            SourceKind::Drone => "drone",
            SourceKind::Clicks => "clicks",
        }
    }
}

pub struct TestSource {
    kind: SourceKind,
    oscillator: Oscillator,
    sample_rate: f32,
    envelope: f32,
    release: f32,
    interval: usize,
    countdown: usize,
    note: usize,
}

impl TestSource {
    pub fn new(kind: SourceKind, sample_rate: f32) -> Self {
        Self {
            kind,
            oscillator: Oscillator::new(),
            sample_rate,
            envelope: 0.0,
            // 150 ms time constant
            release: (-1.0 / (0.15 * sample_rate)).exp(),
            interval: (sample_rate * 0.5) as usize,
            countdown: 0,
            note: 0,
        }
    }

    pub fn set_kind(&mut self, kind: SourceKind) {
        self.kind = kind;
        self.oscillator.reset(0.0);
        self.envelope = 0.0;
        self.countdown = 0;
    }

    pub fn next_sample(&mut self) -> f32 {
        let trigger = self.countdown == 0;
        self.countdown = if trigger { self.interval } else { self.countdown } - 1;

        match self.kind {
            SourceKind::Plucks => {
                if trigger {
                    self.envelope = 1.0;
                    self.note = (self.note + 1) % PLUCK_NOTES.len();
                }
                self.envelope *= self.release;
                let freq = PLUCK_NOTES[self.note];
                self.oscillator
                    .process(freq, self.sample_rate, Waveform::Sawtooth, 0.0)
                    * self.envelope
                    * 0.4
            }
            SourceKind::Drone => {
                self.oscillator
                    .process(110.0, self.sample_rate, Waveform::Sawtooth, 0.0)
                    * 0.25
            }
            SourceKind::Clicks => {
                if trigger {
                    0.8
                } else {
                    0.0
                }
            }
        }
    }
}
