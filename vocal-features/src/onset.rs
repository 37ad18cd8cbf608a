use crate::stft::Stft;

/// Spectral-flux onset strength curve.
///
/// Built from a magnitude STFT: per-bin positive frame-to-frame difference,
/// reduced across frequency by the median so that broadband attacks stand out
/// while narrowband wobble is suppressed.
#[derive(Debug, Clone)]
pub struct OnsetEnvelope {
    values: Vec<f32>,
    hop: usize,
    sample_rate: u32,
}

impl OnsetEnvelope {
    /// Compute the envelope with the standard analysis parameters:
    /// hop of `sample_rate / 2000` samples and an FFT size of
    /// `2 * min(2048, sample_rate / 4)`.
    pub fn compute(samples: &[f32], sample_rate: u32) -> Self {
        let hop = (sample_rate as usize / 2000).max(1);
        let n_fft = (sample_rate as usize / 4).min(2048) * 2;
        Self::compute_with(samples, sample_rate, n_fft, hop)
    }

    pub fn compute_with(samples: &[f32], sample_rate: u32, n_fft: usize, hop: usize) -> Self {
        let stft = Stft::new(n_fft, hop);
        let mag = stft.magnitudes_centered(samples);
        let values = spectral_flux(&mag);
        Self {
            values,
            hop,
            sample_rate,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Envelope frame index closest to time `t`, clamped into range.
    /// Inverse of [`Self::time_at`] up to rounding, so a time produced
    /// by `time_at` maps back to its frame.
    pub fn frame_at(&self, t: f64) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let frame = (t * self.sample_rate as f64 / self.hop as f64).round() as isize;
        frame.clamp(0, self.values.len() as isize - 1) as usize
    }

    pub fn time_at(&self, frame: usize) -> f64 {
        frame as f64 * self.hop as f64 / self.sample_rate as f64
    }

    pub fn frames_for_radius(&self, radius_s: f64) -> usize {
        ((radius_s * self.sample_rate as f64 / self.hop as f64) as usize).max(1)
    }

    /// Noise-relative peak threshold: `mean + k * stddev` over the envelope.
    pub fn adaptive_threshold(&self, k: f32) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let n = self.values.len() as f64;
        let mean = self.values.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = self
            .values
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        (mean + k as f64 * var.sqrt()) as f32
    }

    /// Value at `frame`, zero out of range.
    pub fn value(&self, frame: usize) -> f32 {
        self.values.get(frame).copied().unwrap_or(0.0)
    }

    /// Whether `frame` is a positive local maximum of the envelope.
    pub fn is_peak(&self, frame: usize) -> bool {
        let Some(&v) = self.values.get(frame) else {
            return false;
        };
        if v <= 0.0 {
            return false;
        }
        let left = frame.checked_sub(1).map_or(0.0, |i| self.values[i]);
        let right = self.values.get(frame + 1).copied().unwrap_or(0.0);
        v >= left && v >= right
    }

    /// Strongest value in `[lo, hi)`, returned as (frame index, strength).
    pub fn strongest_in(&self, lo: usize, hi: usize) -> Option<(usize, f32)> {
        let hi = hi.min(self.values.len());
        if lo >= hi {
            return None;
        }
        let mut best = (lo, self.values[lo]);
        for (offset, &v) in self.values[lo..hi].iter().enumerate() {
            if v > best.1 {
                best = (lo + offset, v);
            }
        }
        Some(best)
    }
}

fn spectral_flux(mag: &[Vec<f32>]) -> Vec<f32> {
    if mag.len() < 2 {
        return Vec::new();
    }
    let bins = mag[0].len();
    let mut flux = Vec::with_capacity(mag.len() - 1);
    let mut diffs = vec![0.0f32; bins];
    for t in 0..mag.len() - 1 {
        for b in 0..bins {
            diffs[b] = (mag[t + 1][b] - mag[t][b]).max(0.0);
        }
        flux.push(median(&mut diffs));
    }
    flux
}

fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
