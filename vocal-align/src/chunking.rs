//! Cutting long audio into independently decodable windows.
//!
//! Three planners cover the three hint situations: per-line windows
//! from line hints, silence-guided splitting of unhinted audio, and
//! fixed per-word windows when the caller already knows rough word
//! positions.

use std::ops::Range;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, LineHint, SilenceInterval, WordHint};

/// One chunk per hinted line. A line ends where the next begins; the
/// last line ends at the first silence after it, capped by the maximum
/// line extent and the end of the audio.
pub fn plan_from_lines(
    lines: &[LineHint],
    line_word_ranges: &[Range<usize>],
    silences: &[SilenceInterval],
    duration_s: f64,
    cfg: &ChunkingConfig,
) -> Vec<Chunk> {
    debug_assert_eq!(lines.len(), line_word_ranges.len());

    let mut chunks = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let start = line.start.clamp(0.0, duration_s);
        let end = match lines.get(i + 1) {
            Some(next) => next.start.clamp(start, duration_s),
            None => {
                let cap = (start + cfg.max_line_extent_s).min(duration_s);
                silences
                    .iter()
                    .find(|s| s.start > start)
                    .map_or(cap, |s| s.start.clamp(start, cap))
            }
        };
        chunks.push(Chunk {
            start,
            end,
            words: line_word_ranges[i].clone(),
            line_span: Some((i, i)),
        });
    }
    chunks
}

/// Splits unhinted audio at silence centers, preferring the latest
/// silence that keeps the chunk under budget, and falling back to a
/// hard cut when none fits. Words are distributed across the chunks in
/// proportion to each chunk's voiced duration.
pub fn plan_by_silences(
    word_count: usize,
    duration_s: f64,
    silences: &[SilenceInterval],
    cfg: &ChunkingConfig,
) -> Vec<Chunk> {
    let mut bounds = Vec::new();
    let mut cursor = 0.0f64;
    while duration_s - cursor > cfg.max_chunk_s {
        let budget_end = cursor + cfg.max_chunk_s;
        let boundary = silences
            .iter()
            .map(SilenceInterval::center)
            .filter(|&c| c > cursor && c <= budget_end)
            .fold(None::<f64>, |acc, c| Some(acc.map_or(c, |a| a.max(c))))
            .unwrap_or(budget_end);
        bounds.push((cursor, boundary));
        cursor = boundary;
    }
    bounds.push((cursor, duration_s));

    let voiced: Vec<f64> = bounds
        .iter()
        .map(|&(a, b)| {
            let overlap: f64 = silences.iter().map(|s| intersection(s, a, b)).sum();
            ((b - a) - overlap).max(0.0)
        })
        .collect();
    let total_voiced: f64 = voiced.iter().sum();

    // When everything is flagged silent, fall back to raw lengths.
    let weights: Vec<f64> = if total_voiced > 0.0 {
        voiced
    } else {
        bounds.iter().map(|&(a, b)| b - a).collect()
    };
    let total_weight: f64 = weights.iter().sum::<f64>().max(f64::MIN_POSITIVE);

    let mut chunks = Vec::with_capacity(bounds.len());
    let mut cumulative = 0.0f64;
    let mut assigned = 0usize;
    for (i, &(start, end)) in bounds.iter().enumerate() {
        cumulative += weights[i];
        let split = if i + 1 == bounds.len() {
            word_count
        } else {
            ((word_count as f64 * cumulative / total_weight).round() as usize).min(word_count)
        };
        chunks.push(Chunk {
            start,
            end,
            words: assigned..split.max(assigned),
            line_span: None,
        });
        assigned = split.max(assigned);
    }
    chunks
}

/// One chunk per hinted word, clamped into the audio.
pub fn plan_from_word_hints(hints: &[WordHint], duration_s: f64) -> Vec<Chunk> {
    hints
        .iter()
        .enumerate()
        .map(|(i, hint)| {
            let start = hint.start.clamp(0.0, duration_s);
            let end = hint.end.clamp(start, duration_s);
            Chunk {
                start,
                end,
                words: i..i + 1,
                line_span: None,
            }
        })
        .collect()
}

fn intersection(silence: &SilenceInterval, a: f64, b: f64) -> f64 {
    (silence.end.min(b) - silence.start.max(a)).max(0.0)
}
