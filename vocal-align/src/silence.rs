//! RMS and emission-based silence detection.
//!
//! The RMS detector measures a noise floor from the quiet edges of the
//! signal and flags frames below a multiple of it. A strict profile is
//! tried first; near the edges of the signal a lenient profile picks up
//! soft fade-ins the strict one misses.

use serde::{Deserialize, Serialize};
use vocal_features::rms::frame_rms;

use crate::config::SilenceConfig;
use crate::types::{Emission, SilenceInterval};

/// Which signal the silence detector reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceStrategy {
    /// Frame RMS of the raw samples.
    #[default]
    Rms,
    /// Blank-vs-voiced probabilities from the acoustic backend.
    Emission,
}

fn frame_len(sample_rate_hz: u32, cfg: &SilenceConfig) -> usize {
    ((sample_rate_hz as f64 * cfg.frame_s).round() as usize).max(1)
}

fn front_noise_floor(frame_values: &[f32], baseline_frames: usize) -> f32 {
    let n = frame_values.len().min(baseline_frames).max(1);
    frame_values.iter().take(n).copied().sum::<f32>() / n as f32
}

fn back_noise_floor(frame_values: &[f32], baseline_frames: usize) -> f32 {
    let n = frame_values.len().min(baseline_frames).max(1);
    frame_values.iter().rev().take(n).copied().sum::<f32>() / n as f32
}

/// Detects stretches of non-speech audio at least `min_silence_s` long.
pub fn detect_silences(
    samples: &[f32],
    sample_rate_hz: u32,
    cfg: &SilenceConfig,
) -> Vec<SilenceInterval> {
    if samples.is_empty() || sample_rate_hz == 0 {
        return Vec::new();
    }
    let frame_len = frame_len(sample_rate_hz, cfg);
    let rms = frame_rms(samples, frame_len);
    if rms.is_empty() {
        return Vec::new();
    }

    // Songs rarely end the way they start; take the quieter edge as the
    // noise floor estimate. The absolute ceiling keeps the threshold
    // sane when both edges are loud.
    let floor = front_noise_floor(&rms, cfg.baseline_frames)
        .min(back_noise_floor(&rms, cfg.baseline_frames));
    let threshold = (floor * cfg.strict.floor_multiplier)
        .max(cfg.strict.min_threshold)
        .min(cfg.max_silence_rms);

    let frame_s = frame_len as f64 / sample_rate_hz as f64;
    let duration = samples.len() as f64 / sample_rate_hz as f64;
    let quiet: Vec<bool> = rms.iter().map(|&v| v < threshold).collect();
    collect_runs(&quiet, frame_s, duration, cfg.min_silence_s)
}

/// Detects non-speech stretches from backend emissions: a frame is
/// quiet when the blank dominates and no voiced class is plausible.
pub fn silences_from_emission(
    emission: &Emission,
    blank_id: usize,
    frame_dt: f64,
    cfg: &SilenceConfig,
) -> Vec<SilenceInterval> {
    if emission.frames() == 0 || frame_dt <= 0.0 {
        return Vec::new();
    }
    let quiet: Vec<bool> = emission
        .log_probs
        .iter()
        .map(|row| {
            let blank = row.get(blank_id).copied().unwrap_or(f32::NEG_INFINITY);
            let best_voiced = row
                .iter()
                .enumerate()
                .filter(|&(c, _)| c != blank_id)
                .map(|(_, &lp)| lp)
                .fold(f32::NEG_INFINITY, f32::max);
            blank.exp() >= cfg.blank_min_prob && best_voiced.exp() <= cfg.voiced_max_prob
        })
        .collect();
    let duration = emission.frames() as f64 * frame_dt;
    collect_runs(&quiet, frame_dt, duration, cfg.min_silence_s)
}

fn collect_runs(
    quiet: &[bool],
    frame_s: f64,
    duration: f64,
    min_silence_s: f64,
) -> Vec<SilenceInterval> {
    let mut silences = Vec::new();
    let mut run_start: Option<usize> = None;
    for (i, &is_quiet) in quiet.iter().enumerate() {
        match (is_quiet, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(first)) => {
                push_run(&mut silences, first, i, frame_s, duration, min_silence_s);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(first) = run_start {
        push_run(
            &mut silences,
            first,
            quiet.len(),
            frame_s,
            duration,
            min_silence_s,
        );
    }
    silences
}

fn push_run(
    silences: &mut Vec<SilenceInterval>,
    first: usize,
    one_past_last: usize,
    frame_s: f64,
    duration: f64,
    min_silence_s: f64,
) {
    let start = first as f64 * frame_s;
    let end = (one_past_last as f64 * frame_s).min(duration);
    if end - start >= min_silence_s {
        silences.push(SilenceInterval { start, end });
    }
}

/// First and last speech instants in seconds. Falls back to the full
/// extent when a side never rises above its thresholds.
pub fn speech_bounds(samples: &[f32], sample_rate_hz: u32, cfg: &SilenceConfig) -> (f64, f64) {
    let duration = if sample_rate_hz == 0 {
        0.0
    } else {
        samples.len() as f64 / sample_rate_hz as f64
    };
    if samples.is_empty() || sample_rate_hz == 0 {
        return (0.0, duration);
    }

    let frame_len = frame_len(sample_rate_hz, cfg);
    let rms = frame_rms(samples, frame_len);
    if rms.is_empty() {
        return (0.0, duration);
    }
    let frame_s = frame_len as f64 / sample_rate_hz as f64;

    let onset = detect_onset_frame(&rms, cfg).map_or(0.0, |f| f as f64 * frame_s);
    let offset =
        detect_offset_frame(&rms, cfg).map_or(duration, |f| ((f + 1) as f64 * frame_s).min(duration));
    (onset, offset.max(onset))
}

fn detect_onset_frame(rms: &[f32], cfg: &SilenceConfig) -> Option<usize> {
    let floor = front_noise_floor(rms, cfg.baseline_frames);
    let strict_threshold = (floor * cfg.strict.floor_multiplier).max(cfg.strict.min_threshold);
    let strict = first_run_above(rms, strict_threshold, cfg.strict.min_consecutive_frames);
    if let Some(frame) = strict {
        if frame <= cfg.edge_window_frames {
            return Some(frame);
        }
    }

    let lenient_threshold = (floor * cfg.lenient.floor_multiplier).max(cfg.lenient.min_threshold);
    let lenient = first_run_above(rms, lenient_threshold, cfg.lenient.min_consecutive_frames);

    match (strict, lenient) {
        (None, fallback) => fallback,
        (Some(frame), Some(fallback)) if frame > cfg.edge_window_frames && fallback < frame => {
            Some(fallback)
        }
        (Some(frame), _) => Some(frame),
    }
}

fn detect_offset_frame(rms: &[f32], cfg: &SilenceConfig) -> Option<usize> {
    let floor = back_noise_floor(rms, cfg.baseline_frames);
    let strict_threshold = (floor * cfg.strict.floor_multiplier).max(cfg.strict.min_threshold);
    let strict = last_run_above(rms, strict_threshold, cfg.strict.min_consecutive_frames);
    if let Some(frame) = strict {
        if is_late_enough(frame, rms.len(), cfg.edge_window_frames) {
            return Some(frame);
        }
    }

    let lenient_threshold = (floor * cfg.lenient.floor_multiplier).max(cfg.lenient.min_threshold);
    let lenient = last_run_above(rms, lenient_threshold, cfg.lenient.min_consecutive_frames);

    match (strict, lenient) {
        (None, fallback) => fallback,
        (Some(frame), Some(fallback))
            if !is_late_enough(frame, rms.len(), cfg.edge_window_frames) && fallback > frame =>
        {
            Some(fallback)
        }
        (Some(frame), _) => Some(frame),
    }
}

fn is_late_enough(offset_frame: usize, total_frames: usize, late_window: usize) -> bool {
    offset_frame >= total_frames.saturating_sub(1 + late_window)
}

fn first_run_above(rms: &[f32], threshold: f32, min_consecutive: usize) -> Option<usize> {
    let mut run_start = 0usize;
    let mut run_len = 0usize;
    for (frame_idx, value) in rms.iter().copied().enumerate() {
        if value >= threshold {
            if run_len == 0 {
                run_start = frame_idx;
            }
            run_len += 1;
            if run_len >= min_consecutive {
                return Some(run_start);
            }
            continue;
        }
        run_len = 0;
    }
    None
}

fn last_run_above(rms: &[f32], threshold: f32, min_consecutive: usize) -> Option<usize> {
    let mut run_end = 0usize;
    let mut run_len = 0usize;
    for (frame_idx, value) in rms.iter().copied().enumerate().rev() {
        if value >= threshold {
            if run_len == 0 {
                run_end = frame_idx;
            }
            run_len += 1;
            if run_len >= min_consecutive {
                return Some(run_end);
            }
            continue;
        }
        run_len = 0;
    }
    None
}

/// Finds a better start for a decode window: the end of the last
/// silence gap that begins within the leading fraction of the window.
/// Returns `None` when no gap qualifies or the trim would remove an
/// implausibly large share of the window.
pub fn trim_lead(
    window_start: f64,
    window_end: f64,
    silences: &[SilenceInterval],
    cfg: &SilenceConfig,
) -> Option<f64> {
    let len = window_end - window_start;
    if len <= 0.0 {
        return None;
    }
    let lead_limit = window_start + cfg.lead_window_fraction * len;

    let candidate = silences
        .iter()
        .filter(|s| s.start >= window_start && s.start < lead_limit && s.end < window_end)
        .last()?;

    let new_start = candidate.end;
    let trimmed = new_start - window_start;
    if trimmed <= 0.0 {
        return None;
    }
    if trimmed > cfg.max_lead_trim_fraction * len {
        tracing::debug!(
            window_start,
            new_start,
            "lead trim discarded, would remove most of the window"
        );
        return None;
    }
    Some(new_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SilenceConfig {
        SilenceConfig::default()
    }

    /// 1 kHz signal: quiet and loud stretches by duration in seconds.
    fn signal(parts: &[(f64, f32)]) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(seconds, level) in parts {
            samples.extend(std::iter::repeat(level).take((seconds * 1000.0) as usize));
        }
        samples
    }

    #[test]
    fn detects_leading_and_interior_gaps() {
        let samples = signal(&[(0.3, 0.0), (1.0, 0.5), (0.5, 0.0), (1.0, 0.5)]);
        let silences = detect_silences(&samples, 1000, &config());
        assert_eq!(silences.len(), 2);
        assert!((silences[0].start - 0.0).abs() < 1e-9);
        assert!((silences[0].end - 0.3).abs() < 1e-9);
        assert!((silences[1].start - 1.3).abs() < 1e-9);
        assert!((silences[1].end - 1.8).abs() < 1e-9);
    }

    #[test]
    fn short_gaps_are_ignored() {
        let samples = signal(&[(1.0, 0.5), (0.1, 0.0), (1.0, 0.5)]);
        let silences = detect_silences(&samples, 1000, &config());
        assert!(silences.is_empty());
    }

    #[test]
    fn loud_edges_still_expose_interior_gaps() {
        // both baselines are loud, so the absolute ceiling takes over
        let samples = signal(&[(1.0, 0.5), (0.4, 0.0), (1.0, 0.5)]);
        let silences = detect_silences(&samples, 1000, &config());
        assert_eq!(silences.len(), 1);
        assert!((silences[0].start - 1.0).abs() < 1e-9);
        assert!((silences[0].end - 1.4).abs() < 1e-9);
    }

    #[test]
    fn empty_audio_has_no_silences() {
        assert!(detect_silences(&[], 1000, &config()).is_empty());
        assert!(detect_silences(&[0.0; 100], 0, &config()).is_empty());
    }

    #[test]
    fn speech_bounds_skip_quiet_edges() {
        let samples = signal(&[(0.3, 0.0), (2.0, 0.5), (0.4, 0.0)]);
        let (onset, offset) = speech_bounds(&samples, 1000, &config());
        assert!((onset - 0.3).abs() < 0.02);
        assert!((offset - 2.3).abs() < 0.02);
    }

    #[test]
    fn speech_bounds_of_pure_tone_cover_everything() {
        let samples = signal(&[(1.0, 0.5)]);
        let (onset, offset) = speech_bounds(&samples, 1000, &config());
        // nothing rises above a floor measured from the tone itself, so
        // both sides fall back to the full extent
        assert!((onset - 0.0).abs() < 1e-9);
        assert!((offset - 1.0).abs() < 1e-9);
    }

    #[test]
    fn lead_trim_snaps_to_last_early_gap() {
        let silences = vec![
            SilenceInterval { start: 0.5, end: 1.0 },
            SilenceInterval { start: 2.0, end: 3.0 },
        ];
        let new_start = trim_lead(0.0, 10.0, &silences, &config());
        assert_eq!(new_start, Some(3.0));
    }

    #[test]
    fn lead_trim_ignores_late_gaps() {
        let silences = vec![SilenceInterval { start: 5.0, end: 6.0 }];
        assert_eq!(trim_lead(0.0, 10.0, &silences, &config()), None);
    }

    #[test]
    fn lead_trim_rejects_overlong_trims() {
        let silences = vec![SilenceInterval { start: 3.9, end: 8.5 }];
        assert_eq!(trim_lead(0.0, 10.0, &silences, &config()), None);
    }

    #[test]
    fn emission_silences_follow_blank_probability() {
        let quiet_row = || {
            // blank 0.9, voiced 0.05
            vec![0.9f32.ln(), 0.05f32.ln(), 0.05f32.ln()]
        };
        let voiced_row = || vec![0.05f32.ln(), 0.9f32.ln(), 0.05f32.ln()];
        let mut rows = Vec::new();
        rows.extend((0..10).map(|_| quiet_row()));
        rows.extend((0..10).map(|_| voiced_row()));
        rows.extend((0..10).map(|_| quiet_row()));
        let emission = Emission::new(rows);

        let silences = silences_from_emission(&emission, 0, 0.05, &config());
        assert_eq!(silences.len(), 2);
        assert!((silences[0].start - 0.0).abs() < 1e-9);
        assert!((silences[0].end - 0.5).abs() < 1e-9);
        assert!((silences[1].start - 1.0).abs() < 1e-9);
        assert!((silences[1].end - 1.5).abs() < 1e-9);
    }
}
