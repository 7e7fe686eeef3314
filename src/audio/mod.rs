use anyhow::Context;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio_api::AudioCommand;

mod click;
mod engine;
mod sample_buffer;
mod voice;

pub use engine::{Engine, PlaybackError};
pub use sample_buffer::{SampleBuffer, StereoFrame};

const COMMAND_QUEUE: usize = 1024;
const FALLBACK_SAMPLE_RATE: u32 = 44100;

pub struct AudioHandle {
    tx: Option<Sender<AudioCommand>>, // None = running without a device
    sample_rate: u32,
    _output_stream: Option<cpal::Stream>,
}

impl AudioHandle {
    /// A handle that drops every command; for machines without an output
    /// device and for `--no-audio`.
    pub fn silent() -> Self {
        Self {
            tx: None,
            sample_rate: FALLBACK_SAMPLE_RATE,
            _output_stream: None,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.tx.is_none()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Never blocks the ui thread; a full queue loses the command.
    pub fn send(&self, cmd: AudioCommand) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::warn!("audio command queue full, dropping command"),
            Err(TrySendError::Disconnected(_)) => log::warn!("audio engine is gone"),
        }
    }

    pub fn send_all(&self, cmds: impl IntoIterator<Item = AudioCommand>) {
        for cmd in cmds {
            self.send(cmd);
        }
    }
}

pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(COMMAND_QUEUE);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate: u32 = config.sample_rate();
    let channels = config.channels() as usize;

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream =
                build_output_stream_f32(&device, &config.into(), rx, channels, sample_rate)?;
            output_stream.play().context("failed to play output stream")?;
            log::info!("audio output running: {sample_rate} Hz, {channels} channels");

            Ok(AudioHandle {
                tx: Some(tx),
                sample_rate,
                _output_stream: Some(output_stream),
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    channels: usize,
    sample_rate: u32,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = Engine::new(sample_rate);
    let channels = channels.max(1);
    let mut scratch: Vec<StereoFrame> = Vec::new(); // grows to the largest block once

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            let n_frames = data.len() / channels;
            scratch.resize(n_frames, StereoFrame::default());
            engine.render_block(&mut scratch);

            for (out, frame) in data.chunks_exact_mut(channels).zip(&scratch) {
                match out {
                    [mono] => *mono = (frame.left + frame.right) * 0.5,
                    [l, r, rest @ ..] => {
                        *l = frame.left;
                        *r = frame.right;
                        rest.fill(0.0);
                    }
                    [] => {}
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_handle_swallows_commands() {
        let audio = AudioHandle::silent();
        assert!(audio.is_silent());
        audio.send(AudioCommand::Click { gain: 0.3 });
        assert_eq!(audio.sample_rate(), FALLBACK_SAMPLE_RATE);
    }
}
