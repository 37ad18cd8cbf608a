/// Per-frame RMS energy over fixed-length frames; the trailing partial frame
/// is included.
pub fn frame_rms(samples: &[f32], frame_len: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let frame_len = frame_len.max(1);
    samples
        .chunks(frame_len)
        .map(|chunk| {
            let mean_sq =
                chunk.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / chunk.len() as f64;
            mean_sq.sqrt() as f32
        })
        .collect()
}

/// RMS over a sample span, clamped to the signal bounds.
pub fn span_rms(samples: &[f32], start: usize, end: usize) -> f32 {
    let end = end.min(samples.len());
    if start >= end {
        return 0.0;
    }
    let span = &samples[start..end];
    let mean_sq = span.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / span.len() as f64;
    mean_sq.sqrt() as f32
}
