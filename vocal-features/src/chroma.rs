use crate::stft::Stft;

const MIN_FREQ_HZ: f32 = 55.0;
const MAX_FREQ_HZ: f32 = 5_000.0;

/// 12-bin pitch-class energy per hop.
///
/// Each FFT magnitude bin inside the analysis band is folded onto its nearest
/// equal-tempered pitch class; frames are start-aligned with a window of
/// `2 * hop` samples.
pub fn chroma_frames(samples: &[f32], sample_rate: u32, hop: usize) -> Vec<[f32; 12]> {
    let n_fft = hop * 2;
    let stft = Stft::new(n_fft, hop);
    let mag = stft.magnitudes(samples);
    if mag.is_empty() {
        return Vec::new();
    }

    let bin_hz = sample_rate as f32 / n_fft as f32;
    let classes: Vec<Option<usize>> = (0..stft.bin_count())
        .map(|b| {
            let freq = b as f32 * bin_hz;
            if freq < MIN_FREQ_HZ || freq > MAX_FREQ_HZ {
                return None;
            }
            let midi = 69.0 + 12.0 * (freq / 440.0).log2();
            Some((midi.round() as i32).rem_euclid(12) as usize)
        })
        .collect();

    mag.iter()
        .map(|frame| {
            let mut pcs = [0.0f32; 12];
            for (b, &m) in frame.iter().enumerate() {
                if let Some(pc) = classes[b] {
                    pcs[pc] += m * m;
                }
            }
            pcs
        })
        .collect()
}

/// Normalize a chroma vector to unit length; zero vectors are left untouched.
pub fn normalize(chroma: &[f32; 12]) -> [f32; 12] {
    let norm = chroma.iter().map(|&v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return *chroma;
    }
    let mut out = [0.0f32; 12];
    for (o, &v) in out.iter_mut().zip(chroma.iter()) {
        *o = v / norm;
    }
    out
}

pub fn cosine_similarity(a: &[f32; 12], b: &[f32; 12]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|&v| v * v).sum::<f32>().sqrt();
    let nb = b.iter().map(|&v| v * v).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}
