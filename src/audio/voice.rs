use super::sample_buffer::{SampleBuffer, StereoFrame};

/// Playback cursor over one drum's buffer. Each drum has exactly one, so a
/// retrigger cuts the previous hit and starts again from the top.
#[derive(Clone, Debug, Default)]
pub struct Voice {
    pos: usize,
    gain: f32,
    active: bool,
}

impl Voice {
    pub fn restart(&mut self, gain: f32) {
        self.pos = 0;
        self.gain = gain;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Mix this voice into `out`, stopping at the end of the buffer.
    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        let remaining = buffer.data.get(self.pos..).unwrap_or(&[]);
        let n = remaining.len().min(out.len());
        for (frame, sample) in out.iter_mut().zip(&remaining[..n]) {
            let s = sample.scaled(self.gain);
            frame.left += s.left;
            frame.right += s.right;
        }
        self.pos += n;
        if self.pos >= buffer.data.len() {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_through_then_goes_idle() {
        let buffer = SampleBuffer::from_mono(&[1.0, 1.0, 1.0]);
        let mut voice = Voice::default();
        voice.restart(0.5);

        let mut out = [StereoFrame::default(); 2];
        voice.render_into(&buffer, &mut out);
        assert_eq!(out, [StereoFrame::mono(0.5); 2]);
        assert!(voice.is_active());

        let mut out = [StereoFrame::default(); 2];
        voice.render_into(&buffer, &mut out);
        assert_eq!(out, [StereoFrame::mono(0.5), StereoFrame::default()]);
        assert!(!voice.is_active());
    }

    #[test]
    fn restart_rewinds() {
        let buffer = SampleBuffer::from_mono(&[1.0; 8]);
        let mut voice = Voice::default();
        voice.restart(1.0);
        let mut out = [StereoFrame::default(); 5];
        voice.render_into(&buffer, &mut out);
        assert_eq!(voice.position(), 5);

        voice.restart(1.0);
        assert_eq!(voice.position(), 0);
    }

    #[test]
    fn mixes_additively() {
        let buffer = SampleBuffer::from_mono(&[0.25]);
        let mut voice = Voice::default();
        voice.restart(1.0);
        let mut out = [StereoFrame::mono(0.5)];
        voice.render_into(&buffer, &mut out);
        assert_eq!(out[0], StereoFrame::mono(0.75));
    }
}
