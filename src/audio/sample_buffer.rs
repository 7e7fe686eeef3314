use std::io::Read;
use std::path::Path;

use anyhow::Context;

// The smallest unit of audio; one stereo frame
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn mono(x: f32) -> Self {
        Self { left: x, right: x }
    }

    pub fn scaled(self, gain: f32) -> Self {
        Self {
            left: self.left * gain,
            right: self.right * gain,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>, // the decoded drum, at the output rate
}

impl SampleBuffer {
    pub fn from_mono(samples: &[f32]) -> Self {
        Self {
            data: samples.iter().copied().map(StereoFrame::mono).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Load a WAV file from disk, resampled to the output rate
    pub fn load_wav(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        Self::from_wav_reader(reader, target_rate)
            .with_context(|| format!("decoding {}", path.display()))
    }

    pub fn from_wav_reader<R: Read>(
        mut reader: hound::WavReader<R>,
        target_rate: u32,
    ) -> anyhow::Result<Self> {
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader // float, just pass it through
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                // int, scale into -1.0..1.0
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
            #[allow(unreachable_patterns)]
            _ => anyhow::bail!("unsupported sample format: {:?}", spec.sample_format),
        };

        // mono is duplicated, anything wider keeps its first two channels
        let frames: Vec<StereoFrame> = samples
            .chunks_exact(channels)
            .map(|c| match c {
                [x] => StereoFrame::mono(*x),
                [l, r, ..] => StereoFrame { left: *l, right: *r },
                [] => StereoFrame::default(),
            })
            .collect();

        Ok(Self {
            data: resample_linear(&frames, spec.sample_rate, target_rate),
        })
    }
}

fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate || source_rate == 0 || frames.is_empty() {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let last = frames.len() - 1;

    (0..out_len)
        .map(|i| {
            let src_pos = i as f64 / ratio; // ex. 3.7
            let idx = src_pos.floor() as usize; // ex. 3
            if idx >= last {
                return frames[last];
            }
            let frac = (src_pos - idx as f64) as f32; // ex. 0.7
            let (a, b) = (frames[idx], frames[idx + 1]);
            StereoFrame {
                left: a.left * (1.0 - frac) + b.left * frac,
                right: a.right * (1.0 - frac) + b.right * frac,
            }
        })
        .collect()
}
