//! Turns a decoded Viterbi path back into word and phoneme timings.

use crate::types::{PhonemeTiming, TokenSequence, TokenSource, WordPlan, WordTiming};

/// Smallest phoneme duration kept when frames collapse, in seconds.
const MIN_PHONEME_S: f64 = 0.005;

/// Span given to a word or phoneme the decoder never visited, in
/// seconds.
const PLACEHOLDER_S: f64 = 0.010;

/// Converts a `(state, frame)` path into one timing per planned word.
///
/// Frames are grouped by the phoneme they were emitted for; a phoneme
/// that expands to several characters gets the union of their frames.
/// Phonemes the path never visited receive a short placeholder after
/// the previous one. Within each word the phonemes tile the word span
/// without gaps.
pub fn path_to_word_timings(
    path: &[(usize, usize)],
    seq: &TokenSequence,
    plans: &[WordPlan],
    frame_dt: f64,
    offset_s: f64,
) -> Vec<WordTiming> {
    let mut frame_spans: Vec<Vec<Option<(usize, usize)>>> = plans
        .iter()
        .map(|plan| vec![None; plan.phonemes.len()])
        .collect();

    for &(state, frame) in path {
        if let Some(TokenSource::Phoneme { word, phoneme }) = seq.sources.get(state) {
            let slot = &mut frame_spans[*word][*phoneme];
            *slot = match *slot {
                None => Some((frame, frame)),
                Some((first, last)) => Some((first.min(frame), last.max(frame))),
            };
        }
    }

    let mut words = Vec::with_capacity(plans.len());
    let mut cursor = offset_s;

    for (word_idx, plan) in plans.iter().enumerate() {
        let mut phonemes = Vec::with_capacity(plan.phonemes.len());
        for (phoneme_idx, symbol) in plan.phonemes.iter().enumerate() {
            let (mut start, mut end) = match frame_spans[word_idx][phoneme_idx] {
                Some((first, last)) => (
                    offset_s + first as f64 * frame_dt,
                    offset_s + (last + 1) as f64 * frame_dt,
                ),
                None => (cursor, cursor + PLACEHOLDER_S),
            };
            start = start.max(cursor);
            end = end.max(start + MIN_PHONEME_S);
            cursor = end;
            phonemes.push(PhonemeTiming::new(symbol.clone(), start, end));
        }

        for i in 0..phonemes.len().saturating_sub(1) {
            let next_start = phonemes[i + 1].start;
            phonemes[i].end = next_start;
        }

        let (start, end) = match (phonemes.first(), phonemes.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => {
                let start = cursor;
                cursor = start + PLACEHOLDER_S;
                (start, cursor)
            }
        };

        let mut word = WordTiming::new(plan.text.clone(), start, end);
        word.phonemes = phonemes;
        words.push(word);
    }

    words
}

/// Spreads words evenly across a window when decoding is impossible.
/// Phonemes split their word span into equal parts.
pub fn distribute_evenly(plans: &[WordPlan], start_s: f64, end_s: f64) -> Vec<WordTiming> {
    if plans.is_empty() {
        return Vec::new();
    }
    let span = (end_s - start_s).max(0.0);
    let word_dur = span / plans.len() as f64;

    plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let ws = start_s + i as f64 * word_dur;
            let we = if i + 1 == plans.len() {
                start_s + span
            } else {
                start_s + (i + 1) as f64 * word_dur
            };
            let mut word = WordTiming::new(plan.text.clone(), ws, we);
            if !plan.phonemes.is_empty() {
                let ph_dur = (we - ws) / plan.phonemes.len() as f64;
                word.phonemes = plan
                    .phonemes
                    .iter()
                    .enumerate()
                    .map(|(j, symbol)| {
                        let ps = ws + j as f64 * ph_dur;
                        let pe = if j + 1 == plan.phonemes.len() {
                            we
                        } else {
                            ws + (j + 1) as f64 * ph_dur
                        };
                        PhonemeTiming::new(symbol.clone(), ps, pe)
                    })
                    .collect();
            }
            word
        })
        .collect()
}

/// Forces a stitched word list to be non-overlapping and in order,
/// re-fitting each word's phonemes to any adjusted bounds.
pub fn enforce_monotonic(words: &mut [WordTiming], min_step_s: f64) {
    let mut prev_end = 0.0f64;
    for word in words.iter_mut() {
        if word.start < prev_end {
            word.start = prev_end;
        }
        if word.end < word.start + min_step_s {
            word.end = word.start + min_step_s;
        }
        fit_phonemes_to_word(word, min_step_s);
        prev_end = word.end;
    }
}

/// Clamps a word's phonemes into its span, keeping them ordered and
/// tiling the span exactly.
pub fn fit_phonemes_to_word(word: &mut WordTiming, min_step_s: f64) {
    let n = word.phonemes.len();
    if n == 0 {
        return;
    }

    word.phonemes[0].start = word.start;
    for i in 1..n {
        // The cumulative floor can pass the word end when the span is
        // shorter than n steps; cap it so tail phonemes collapse onto
        // the end instead.
        let floor = (word.phonemes[i - 1].start + min_step_s).min(word.end);
        let clamped = word.phonemes[i].start.clamp(floor, word.end);
        word.phonemes[i].start = clamped;
    }
    for i in 0..n - 1 {
        let next_start = word.phonemes[i + 1].start;
        word.phonemes[i].end = next_start;
    }
    word.phonemes[n - 1].end = word.end;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(text: &str, phonemes: &[&str]) -> WordPlan {
        WordPlan::new(text, phonemes.iter().map(|s| s.to_string()).collect())
    }

    fn assert_tiled(word: &WordTiming) {
        if word.phonemes.is_empty() {
            return;
        }
        assert!((word.phonemes[0].start - word.start).abs() < 1e-9);
        for pair in word.phonemes.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < 1e-9);
        }
        assert!((word.phonemes.last().unwrap().end - word.end).abs() < 1e-9);
    }

    #[test]
    fn decoded_frames_become_second_offsets() {
        // tokens: blank, K(ph0), blank, T(ph1), blank
        let seq = TokenSequence {
            tokens: vec![0, 5, 0, 7, 0],
            sources: vec![
                TokenSource::Blank,
                TokenSource::Phoneme { word: 0, phoneme: 0 },
                TokenSource::Blank,
                TokenSource::Phoneme { word: 0, phoneme: 1 },
                TokenSource::Blank,
            ],
        };
        let path = vec![(1, 0), (1, 1), (2, 2), (3, 3), (3, 4)];
        let plans = vec![plan("cat", &["K", "T"])];
        let words = path_to_word_timings(&path, &seq, &plans, 0.1, 0.0);

        assert_eq!(words.len(), 1);
        let word = &words[0];
        assert!((word.start - 0.0).abs() < 1e-9);
        // last frame 4 ends at 0.5
        assert!((word.end - 0.5).abs() < 1e-9);
        // the blank gap between K and T is absorbed into K
        assert!((word.phonemes[0].end - 0.3).abs() < 1e-9);
        assert_tiled(word);
    }

    #[test]
    fn window_offset_shifts_all_times() {
        let seq = TokenSequence {
            tokens: vec![0, 5, 0],
            sources: vec![
                TokenSource::Blank,
                TokenSource::Phoneme { word: 0, phoneme: 0 },
                TokenSource::Blank,
            ],
        };
        let path = vec![(1, 0), (1, 1)];
        let plans = vec![plan("oh", &["OW"])];
        let words = path_to_word_timings(&path, &seq, &plans, 0.05, 2.0);
        assert!((words[0].start - 2.0).abs() < 1e-9);
        assert!((words[0].end - 2.1).abs() < 1e-9);
    }

    #[test]
    fn multi_char_phoneme_unions_frames() {
        // AY spelled as two characters, both sourced to phoneme 0
        let seq = TokenSequence {
            tokens: vec![0, 2, 0, 3, 0],
            sources: vec![
                TokenSource::Blank,
                TokenSource::Phoneme { word: 0, phoneme: 0 },
                TokenSource::Blank,
                TokenSource::Phoneme { word: 0, phoneme: 0 },
                TokenSource::Blank,
            ],
        };
        let path = vec![(1, 0), (1, 1), (3, 2), (3, 3)];
        let plans = vec![plan("eye", &["AY"])];
        let words = path_to_word_timings(&path, &seq, &plans, 0.1, 0.0);
        assert_eq!(words[0].phonemes.len(), 1);
        assert!((words[0].phonemes[0].start - 0.0).abs() < 1e-9);
        assert!((words[0].phonemes[0].end - 0.4).abs() < 1e-9);
    }

    #[test]
    fn unvisited_phoneme_gets_placeholder_after_previous() {
        let seq = TokenSequence {
            tokens: vec![0, 5, 0, 7, 0],
            sources: vec![
                TokenSource::Blank,
                TokenSource::Phoneme { word: 0, phoneme: 0 },
                TokenSource::Blank,
                TokenSource::Phoneme { word: 0, phoneme: 1 },
                TokenSource::Blank,
            ],
        };
        // path never enters state 3
        let path = vec![(1, 0), (1, 1), (2, 2)];
        let plans = vec![plan("cat", &["K", "T"])];
        let words = path_to_word_timings(&path, &seq, &plans, 0.1, 0.0);
        let t = &words[0].phonemes[1];
        assert!((t.start - 0.2).abs() < 1e-9);
        assert!((t.end - 0.21).abs() < 1e-9);
        assert_tiled(&words[0]);
    }

    #[test]
    fn undecodable_word_gets_placeholder_span() {
        let seq = TokenSequence {
            tokens: vec![0],
            sources: vec![TokenSource::Blank],
        };
        let path = vec![(0, 0), (0, 1)];
        let plans = vec![plan("hm", &["M"])];
        let words = path_to_word_timings(&path, &seq, &plans, 0.1, 1.0);
        assert_eq!(words.len(), 1);
        assert!((words[0].start - 1.0).abs() < 1e-9);
        assert!((words[0].end - 1.01).abs() < 1e-9);
    }

    #[test]
    fn even_distribution_tiles_the_window() {
        let plans = vec![plan("la", &["L", "AA"]), plan("da", &["D", "AA"])];
        let words = distribute_evenly(&plans, 1.0, 3.0);
        assert_eq!(words.len(), 2);
        assert!((words[0].start - 1.0).abs() < 1e-9);
        assert!((words[0].end - 2.0).abs() < 1e-9);
        assert!((words[1].start - 2.0).abs() < 1e-9);
        assert!((words[1].end - 3.0).abs() < 1e-9);
        for word in &words {
            assert_tiled(word);
        }
    }

    #[test]
    fn even_distribution_of_nothing_is_empty() {
        assert!(distribute_evenly(&[], 0.0, 5.0).is_empty());
    }

    #[test]
    fn monotonic_enforcement_removes_overlap() {
        let mut words = vec![
            WordTiming::new("a", 0.0, 1.0),
            WordTiming::new("b", 0.8, 1.5),
        ];
        enforce_monotonic(&mut words, 0.005);
        assert!((words[1].start - 1.0).abs() < 1e-9);
        assert!(words[1].end >= words[1].start);
    }

    #[test]
    fn fully_squeezed_word_keeps_phonemes_inside_span() {
        // The second word overlaps the first and carries more phonemes
        // than its squeezed span has minimum steps.
        let first = WordTiming::new("long", 0.0, 1.2);
        let mut second = WordTiming::new("stops", 1.0, 1.2);
        second.phonemes = vec![
            PhonemeTiming::new("S", 1.0, 1.05),
            PhonemeTiming::new("T", 1.05, 1.1),
            PhonemeTiming::new("AA", 1.1, 1.15),
            PhonemeTiming::new("P", 1.15, 1.2),
        ];
        let mut words = vec![first, second];
        enforce_monotonic(&mut words, 0.005);

        let w = &words[1];
        assert!((w.start - 1.2).abs() < 1e-9);
        assert!(w.end >= w.start);
        for p in &w.phonemes {
            assert!(p.start >= w.start - 1e-9);
            assert!(p.end <= w.end + 1e-9);
            assert!(p.end >= p.start);
        }
        assert!((w.phonemes.last().unwrap().end - w.end).abs() < 1e-9);
    }

    #[test]
    fn refitting_keeps_phonemes_inside_word() {
        let mut word = WordTiming::new("cat", 1.0, 2.0);
        word.phonemes = vec![
            PhonemeTiming::new("K", 0.5, 0.9),
            PhonemeTiming::new("AE", 0.9, 1.4),
            PhonemeTiming::new("T", 1.4, 2.4),
        ];
        fit_phonemes_to_word(&mut word, 0.005);
        assert!((word.phonemes[0].start - 1.0).abs() < 1e-9);
        assert!((word.phonemes[2].end - 2.0).abs() < 1e-9);
        for pair in word.phonemes.windows(2) {
            assert!(pair[1].start >= pair[0].start);
        }
    }
}
