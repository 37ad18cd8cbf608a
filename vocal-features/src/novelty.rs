use crate::chroma::normalize;

/// Cosine self-similarity matrix over row-normalized chroma frames.
pub fn self_similarity(chroma: &[[f32; 12]]) -> Vec<Vec<f32>> {
    let normalized: Vec<[f32; 12]> = chroma.iter().map(normalize).collect();
    let n = normalized.len();
    let mut ssm = vec![vec![0.0f32; n]; n];
    for i in 0..n {
        for j in i..n {
            let dot: f32 = normalized[i]
                .iter()
                .zip(normalized[j].iter())
                .map(|(a, b)| a * b)
                .sum();
            ssm[i][j] = dot;
            ssm[j][i] = dot;
        }
    }
    ssm
}

/// Checkerboard novelty along the diagonal: high where the blocks before and
/// after a frame are each self-similar but dissimilar to one another.
pub fn checkerboard_novelty(ssm: &[Vec<f32>], kernel: usize) -> Vec<f32> {
    let n = ssm.len();
    let mut novelty = vec![0.0f32; n];
    if kernel == 0 || n < 2 * kernel {
        return novelty;
    }
    for i in kernel..n - kernel {
        let before = block_mean(ssm, i - kernel, i, i - kernel, i);
        let after = block_mean(ssm, i, i + kernel, i, i + kernel);
        let cross = block_mean(ssm, i - kernel, i, i, i + kernel);
        novelty[i] = before + after - 2.0 * cross;
    }
    novelty
}

fn block_mean(ssm: &[Vec<f32>], r0: usize, r1: usize, c0: usize, c1: usize) -> f32 {
    let mut sum = 0.0f64;
    for row in &ssm[r0..r1] {
        for &v in &row[c0..c1] {
            sum += v as f64;
        }
    }
    (sum / ((r1 - r0) * (c1 - c0)) as f64) as f32
}

/// Scale so the maximum becomes 1; a non-positive curve is returned as is.
pub fn normalize_to_peak(novelty: &mut [f32]) {
    let max = novelty.iter().copied().fold(f32::MIN, f32::max);
    if max > 0.0 {
        for v in novelty.iter_mut() {
            *v /= max;
        }
    }
}

/// Centered moving average with the given half width.
pub fn smooth(values: &[f32], half_width: usize) -> Vec<f32> {
    if half_width == 0 || values.is_empty() {
        return values.to_vec();
    }
    let n = values.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half_width);
            let hi = (i + half_width + 1).min(n);
            values[lo..hi].iter().sum::<f32>() / (hi - lo) as f32
        })
        .collect()
}

/// `mean + k * stddev` over the strictly positive novelty values, clamped to
/// `[lo, hi]`.
pub fn adaptive_peak_threshold(novelty: &[f32], k: f32, lo: f32, hi: f32) -> f32 {
    let positive: Vec<f64> = novelty
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| v as f64)
        .collect();
    if positive.is_empty() {
        return lo;
    }
    let n = positive.len() as f64;
    let mean = positive.iter().sum::<f64>() / n;
    let var = positive.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    ((mean + k as f64 * var.sqrt()) as f32).clamp(lo, hi)
}

/// Local maxima above `threshold`, at least `min_spacing` frames apart.
pub fn pick_peaks(novelty: &[f32], threshold: f32, min_spacing: usize) -> Vec<usize> {
    let mut peaks = Vec::new();
    if novelty.len() < 3 {
        return peaks;
    }
    for i in 1..novelty.len() - 1 {
        if novelty[i] > threshold && novelty[i] > novelty[i - 1] && novelty[i] > novelty[i + 1] {
            let far_enough = peaks.last().map_or(true, |&last| i - last >= min_spacing);
            if far_enough {
                peaks.push(i);
            }
        }
    }
    peaks
}
