//! Boundary snapping against the spectral-flux onset envelope.
//!
//! Word starts are searched within a wide radius and snapped to the
//! strongest onset peak above an adaptive threshold; phoneme boundaries
//! use a narrower radius and accept weaker peaks. Overlaps introduced
//! by snapping are repaired before phoneme boundaries are refit. A
//! boundary already resting on a qualifying peak is left in place, so
//! running the pass again changes nothing.

use vocal_features::OnsetEnvelope;

use crate::config::RefineConfig;
use crate::types::WordTiming;

/// Envelopes shorter than this carry no usable onset structure.
const MIN_ENVELOPE_FRAMES: usize = 10;

/// Computes the onset envelope of the full signal and snaps word and
/// phoneme boundaries to it. Returns false when the signal is too short
/// to refine; the words are then left untouched.
pub fn refine_word_onsets(
    words: &mut Vec<WordTiming>,
    samples: &[f32],
    sample_rate_hz: u32,
    cfg: &RefineConfig,
) -> bool {
    if words.is_empty() || samples.is_empty() || sample_rate_hz == 0 {
        return false;
    }
    let envelope = OnsetEnvelope::compute(samples, sample_rate_hz);
    refine_with_envelope(words, &envelope, cfg)
}

/// Snaps boundaries against a precomputed envelope.
pub fn refine_with_envelope(
    words: &mut Vec<WordTiming>,
    envelope: &OnsetEnvelope,
    cfg: &RefineConfig,
) -> bool {
    if envelope.len() < MIN_ENVELOPE_FRAMES {
        return false;
    }
    let threshold = envelope.adaptive_threshold(cfg.onset_threshold_k);

    // Word starts first.
    let word_radius = envelope.frames_for_radius(cfg.word_snap_radius_s);
    let mut shifted = 0usize;
    let mut total_delta_ms = 0.0f64;
    for word in words.iter_mut() {
        let center = envelope.frame_at(word.start);
        if envelope.is_peak(center) && envelope.value(center) >= threshold {
            continue;
        }
        let lo = center.saturating_sub(word_radius);
        let hi = (center + word_radius + 1).min(envelope.len());
        if hi - lo < 3 {
            continue;
        }
        let Some((peak, strength)) = envelope.strongest_in(lo, hi) else {
            continue;
        };
        // Only snap onto an actual peak; a flat envelope or a window
        // edge where the envelope still rises is not an onset.
        if strength >= threshold && strength > 0.0 && envelope.is_peak(peak) {
            let refined = envelope.time_at(peak);
            total_delta_ms += (refined - word.start).abs() * 1000.0;
            word.start = refined;
            shifted += 1;
        }
    }

    // Snapping can reorder or overlap words; repair before touching
    // phonemes. Natural gaps between words are preserved.
    words.sort_by(|a, b| a.start.total_cmp(&b.start));
    for i in 0..words.len().saturating_sub(1) {
        if words[i].end > words[i + 1].start {
            words[i].end = words[i + 1].start;
        }
    }
    for word in words.iter_mut() {
        if word.end <= word.start {
            word.end = word.start + cfg.min_word_duration_s;
        }
    }

    // Phoneme boundaries inside the repaired word spans.
    let phoneme_radius = envelope.frames_for_radius(cfg.phoneme_snap_radius_s);
    let accept = threshold * cfg.phoneme_accept_factor;
    let mut phoneme_shifts = 0usize;
    for word in words.iter_mut() {
        let n = word.phonemes.len();
        if n == 0 {
            continue;
        }
        let word_start = word.start;
        let word_end = word.end;
        if n == 1 {
            word.phonemes[0].start = word_start;
            word.phonemes[0].end = word_end;
            continue;
        }

        word.phonemes[0].start = word_start;
        for j in 1..n {
            let center = envelope.frame_at(word.phonemes[j].start);
            if envelope.is_peak(center) && envelope.value(center) >= accept {
                continue;
            }
            let lo = center.saturating_sub(phoneme_radius);
            let hi = (center + phoneme_radius + 1).min(envelope.len());
            if hi - lo < 2 {
                continue;
            }
            let Some((peak, strength)) = envelope.strongest_in(lo, hi) else {
                continue;
            };
            if strength >= accept && strength > 0.0 && envelope.is_peak(peak) {
                let candidate = envelope.time_at(peak);
                let min_start = word.phonemes[j - 1].start + cfg.min_phoneme_step_s;
                let max_start = word_end - (n - j) as f64 * cfg.min_phoneme_step_s;
                // A peak outside the feasible range would be clamped
                // off the onset; keep the decoded boundary instead.
                if candidate >= min_start && candidate <= max_start {
                    word.phonemes[j].start = candidate;
                    phoneme_shifts += 1;
                }
            }
        }
        for j in 0..n - 1 {
            let next_start = word.phonemes[j + 1].start;
            word.phonemes[j].end = next_start;
        }
        word.phonemes[n - 1].end = word_end;
    }

    let avg_delta_ms = if shifted > 0 {
        total_delta_ms / shifted as f64
    } else {
        0.0
    };
    tracing::debug!(
        shifted,
        total = words.len(),
        avg_delta_ms,
        phoneme_shifts,
        "onset refinement"
    );
    true
}
