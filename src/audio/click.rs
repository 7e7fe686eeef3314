// the metronome click is synthesized, not loaded: a short sine blip with a
// fast exponential decay
use std::f32::consts::TAU;

use super::sample_buffer::SampleBuffer;

const CLICK_FREQ_HZ: f32 = 1000.0;
const CLICK_SECONDS: f32 = 0.015;
const CLICK_DECAY: f32 = 40.0;

pub fn synth_click(sample_rate: u32) -> SampleBuffer {
    let rate = sample_rate.max(1) as f32;
    let n = (rate * CLICK_SECONDS) as usize;
    let samples: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / rate;
            (t * CLICK_FREQ_HZ * TAU).sin() * (-t * CLICK_DECAY).exp()
        })
        .collect();
    SampleBuffer::from_mono(&samples)
}
