use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Short-time Fourier transform over a hann window.
///
/// Frames are either centered on `frame * hop` (zero-padded at the edges,
/// matching the convention of centered STFT implementations) or start-aligned
/// at `frame * hop` with no padding.
pub struct Stft {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    n_fft: usize,
    hop: usize,
}

impl Stft {
    pub fn new(n_fft: usize, hop: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n_fft);
        Self {
            fft,
            window: hann_window(n_fft),
            n_fft,
            hop,
        }
    }

    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of frequency bins per frame (`n_fft / 2 + 1`).
    pub fn bin_count(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Magnitude spectrogram with frames centered on `frame * hop`.
    pub fn magnitudes_centered(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        if samples.is_empty() {
            return Vec::new();
        }
        let frame_count = samples.len() / self.hop + 1;
        let half = (self.n_fft / 2) as isize;
        let mut frames = Vec::with_capacity(frame_count);
        let mut buf = vec![Complex::new(0.0f32, 0.0f32); self.n_fft];

        for frame in 0..frame_count {
            let center = (frame * self.hop) as isize;
            for (i, slot) in buf.iter_mut().enumerate() {
                let idx = center - half + i as isize;
                let sample = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize]
                } else {
                    0.0
                };
                *slot = Complex::new(sample * self.window[i], 0.0);
            }
            self.fft.process(&mut buf);
            frames.push(buf[..self.bin_count()].iter().map(|c| c.norm()).collect());
        }
        frames
    }

    /// Magnitude spectrogram with frames starting at `frame * hop`; only
    /// complete frames are emitted.
    pub fn magnitudes(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        if samples.len() < self.n_fft {
            return Vec::new();
        }
        let frame_count = (samples.len() - self.n_fft) / self.hop + 1;
        let mut frames = Vec::with_capacity(frame_count);
        let mut buf = vec![Complex::new(0.0f32, 0.0f32); self.n_fft];

        for frame in 0..frame_count {
            let start = frame * self.hop;
            for (i, slot) in buf.iter_mut().enumerate() {
                *slot = Complex::new(samples[start + i] * self.window[i], 0.0);
            }
            self.fft.process(&mut buf);
            frames.push(buf[..self.bin_count()].iter().map(|c| c.norm()).collect());
        }
        frames
    }
}

fn hann_window(n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / (n - 1) as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn hann_window_is_symmetric_and_zero_at_edges() {
        let w = hann_window(8);
        assert_relative_eq!(w[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(w[7], 0.0, epsilon = 1e-6);
        for i in 0..4 {
            assert_relative_eq!(w[i], w[7 - i], epsilon = 1e-6);
        }
    }

    #[test]
    fn sine_energy_lands_in_expected_bin() {
        let n_fft = 256;
        let sample_rate = 1024.0f32;
        // Bin width is 4 Hz; a 64 Hz sine should peak at bin 16.
        let samples: Vec<f32> = (0..1024)
            .map(|i| (2.0 * std::f32::consts::PI * 64.0 * i as f32 / sample_rate).sin())
            .collect();
        let stft = Stft::new(n_fft, 128);
        let frames = stft.magnitudes(&samples);
        assert!(!frames.is_empty());
        let mid = &frames[frames.len() / 2];
        let peak_bin = mid
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 16);
    }

    #[test]
    fn centered_frame_count_covers_signal() {
        let stft = Stft::new(64, 16);
        let frames = stft.magnitudes_centered(&vec![0.5f32; 160]);
        assert_eq!(frames.len(), 160 / 16 + 1);
        assert_eq!(frames[0].len(), 33);
    }

    #[test]
    fn empty_input_yields_no_frames() {
        let stft = Stft::new(64, 16);
        assert!(stft.magnitudes_centered(&[]).is_empty());
        assert!(stft.magnitudes(&[0.0; 10]).is_empty());
    }
}
