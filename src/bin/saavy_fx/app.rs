//! Audition - audio stream setup and the real-time callback

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};
use rtrb::RingBuffer;

use saavy_fx::{graph::HostEffect, ProcessConfig, MAX_BLOCK_SIZE};

use super::source::{SourceKind, TestSource};
use super::ui::{ControlMessage, UiApp, UiStateInit};

/// Channels the effect sees; extra device channels repeat them.
const PROCESS_CHANNELS: usize = 2;

/// Room for a few UI frames of scope samples.
const SCOPE_QUEUE: usize = 16_384;

const CONTROL_QUEUE: usize = 256;

pub struct Audition {
    name: String,
    effect: Box<dyn HostEffect>,
    source: SourceKind,
}

impl Audition {
    pub fn new(name: impl Into<String>, effect: Box<dyn HostEffect>) -> Self {
        Self {
            name: name.into(),
            effect,
            source: SourceKind::Plucks,
        }
    }

    /// Open the default output device, start the stream and hand the
    /// terminal to the UI until it quits.
    pub fn run(self) -> EyreResult<()> {
        let Self {
            name,
            mut effect,
            source,
        } = self;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let device_channels = config.channels() as usize;
        let active = device_channels.clamp(1, PROCESS_CHANNELS);

        effect
            .configure(&ProcessConfig::new(sample_rate, MAX_BLOCK_SIZE, active))
            .wrap_err_with(|| format!("failed to prepare {name}"))?;
        info!("{name}: {sample_rate} Hz, {device_channels} device channels, {active} processed");

        let ranges = effect.ranges();
        let mut values: Vec<f32> = ranges.iter().map(|range| range.default).collect();
        let initial_values = values.clone();

        let (control_tx, mut control_rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE);

        let mut test_source = TestSource::new(source, sample_rate);
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE * PROCESS_CHANNELS];
        let mut bypass = false;

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                while let Ok(message) = control_rx.pop() {
                    match message {
                        ControlMessage::SetParam { index, value } => {
                            if let Some(slot) = values.get_mut(index) {
                                *slot = value;
                            }
                        }
                        ControlMessage::Bypass(on) => bypass = on,
                        ControlMessage::Flush => effect.flush(),
                        ControlMessage::Source(kind) => test_source.set_kind(kind),
                    }
                }

                let total_frames = data.len() / device_channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    {
                        let (left, right) = scratch.split_at_mut(MAX_BLOCK_SIZE);
                        let left = &mut left[..frames];
                        let right = &mut right[..frames];
                        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                            let sample = test_source.next_sample();
                            *l = sample;
                            *r = sample;
                        }
                        if !bypass {
                            let mut channels = [left, right];
                            effect.process_values(&mut channels[..active], &values);
                        }
                    }

                    let out_off = frames_written * device_channels;
                    for i in 0..frames {
                        for ch in 0..device_channels {
                            let source_channel = ch % active;
                            data[out_off + i * device_channels + ch] =
                                scratch[source_channel * MAX_BLOCK_SIZE + i];
                        }
                        // A full queue only means the UI is behind
                        let _ = scope_tx.push(scratch[i]);
                    }

                    frames_written += frames;
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;

        let init = UiStateInit {
            effect_name: name,
            sample_rate,
            channels: active,
            ranges,
            values: initial_values,
            source,
        };

        let mut terminal = ratatui::init();
        let result = UiApp::new(scope_rx, control_tx, init).run(&mut terminal);
        ratatui::restore();

        if let Err(err) = stream.pause() {
            warn!("failed to pause stream: {err}");
        }
        result
    }
}
