//! Word-internal duration sanity for singing.
//!
//! Forced alignment can compress vowels on fast passages even when the
//! boundary placement is right. When the vowels of a word fall under a
//! minimum share of its duration, the word's interior is rebuilt from
//! consonant duration priors with the remaining time given to vowels.

use crate::config::RefineConfig;
use crate::phones::{consonant_class, is_vowel, stress_digit};
use crate::types::WordTiming;

/// Redistributes phoneme time inside words whose vowels were squeezed
/// below `cfg.min_vowel_share`. Word boundaries are never moved.
/// Returns the number of words rebuilt.
pub fn enforce_vowel_durations(words: &mut [WordTiming], cfg: &RefineConfig) -> usize {
    let mut fixed = 0usize;

    for word in words.iter_mut() {
        if word.phonemes.len() < 2 {
            continue;
        }
        let word_dur = word.end - word.start;
        if word_dur <= 0.01 {
            continue;
        }

        let vowel_idxs: Vec<usize> = word
            .phonemes
            .iter()
            .enumerate()
            .filter(|(_, p)| is_vowel(&p.phoneme))
            .map(|(i, _)| i)
            .collect();
        if vowel_idxs.is_empty() || vowel_idxs.len() == word.phonemes.len() {
            continue;
        }

        let vowel_time: f64 = vowel_idxs
            .iter()
            .map(|&i| word.phonemes[i].duration())
            .sum();
        if vowel_time / word_dur >= cfg.min_vowel_share {
            continue;
        }

        let mut durations = vec![0.0f64; word.phonemes.len()];
        let mut total_cons = 0.0f64;
        for (i, p) in word.phonemes.iter().enumerate() {
            if !is_vowel(&p.phoneme) {
                let base = consonant_class(&p.phoneme).base_duration_s();
                durations[i] = base;
                total_cons += base;
            }
        }

        if total_cons >= word_dur * 0.65 {
            let scale = (word_dur * 0.55) / total_cons;
            total_cons = 0.0;
            for (i, p) in word.phonemes.iter().enumerate() {
                if !is_vowel(&p.phoneme) {
                    durations[i] *= scale;
                    total_cons += durations[i];
                }
            }
        }

        let vowel_total = word_dur - total_cons;
        let weights: Vec<f64> = vowel_idxs
            .iter()
            .enumerate()
            .map(|(j, &i)| vowel_weight(&word.phonemes[i].phoneme, j))
            .collect();
        let total_weight: f64 = weights.iter().sum();
        for (j, &i) in vowel_idxs.iter().enumerate() {
            durations[i] = vowel_total * weights[j] / total_weight;
        }

        let mut cursor = word.start;
        for (i, p) in word.phonemes.iter_mut().enumerate() {
            p.start = cursor;
            p.end = cursor + durations[i];
            cursor = p.end;
        }
        if let Some(last) = word.phonemes.last_mut() {
            last.end = word.end;
        }
        fixed += 1;
    }

    if fixed > 0 {
        tracing::debug!(fixed, "redistributed words with compressed vowels");
    }
    fixed
}

/// Dictionary entries carry stress digits; those outrank the
/// first-vowel heuristic used for rule-derived pronunciations.
fn vowel_weight(symbol: &str, position: usize) -> f64 {
    match stress_digit(symbol) {
        Some(1) => 1.6,
        Some(2) => 1.2,
        Some(0) => 0.7,
        _ => {
            if position == 0 {
                1.5
            } else {
                1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhonemeTiming;

    fn word(text: &str, start: f64, end: f64, phonemes: &[(&str, f64, f64)]) -> WordTiming {
        let mut w = WordTiming::new(text, start, end);
        w.phonemes = phonemes
            .iter()
            .map(|&(p, s, e)| PhonemeTiming::new(p, s, e))
            .collect();
        w
    }

    fn assert_tiled(w: &WordTiming) {
        assert!((w.phonemes[0].start - w.start).abs() < 1e-9);
        for pair in w.phonemes.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < 1e-9);
        }
        assert!((w.phonemes.last().unwrap().end - w.end).abs() < 1e-9);
    }

    #[test]
    fn compressed_vowel_regains_its_share() {
        let mut words = vec![word(
            "bat",
            0.0,
            1.0,
            &[("B", 0.0, 0.45), ("AE", 0.45, 0.5), ("T", 0.5, 1.0)],
        )];
        let fixed = enforce_vowel_durations(&mut words, &RefineConfig::default());
        assert_eq!(fixed, 1);
        let w = &words[0];
        assert!((w.phonemes[0].duration() - 0.055).abs() < 1e-9);
        assert!(w.phonemes[1].duration() >= 0.35);
        assert_tiled(w);
    }

    #[test]
    fn healthy_words_are_left_alone() {
        let original = word(
            "bat",
            0.0,
            1.0,
            &[("B", 0.0, 0.3), ("AE", 0.3, 0.7), ("T", 0.7, 1.0)],
        );
        let mut words = vec![original.clone()];
        let fixed = enforce_vowel_durations(&mut words, &RefineConfig::default());
        assert_eq!(fixed, 0);
        assert_eq!(words[0], original);
    }

    #[test]
    fn vowel_only_words_are_skipped() {
        let original = word("ooh", 0.0, 0.5, &[("UW", 0.0, 0.2), ("AA", 0.2, 0.5)]);
        let mut words = vec![original.clone()];
        assert_eq!(enforce_vowel_durations(&mut words, &RefineConfig::default()), 0);
        assert_eq!(words[0], original);
    }

    #[test]
    fn tiny_words_are_skipped() {
        let original = word(
            "it",
            1.0,
            1.008,
            &[("IH", 1.0, 1.004), ("T", 1.004, 1.008)],
        );
        let mut words = vec![original.clone()];
        assert_eq!(enforce_vowel_durations(&mut words, &RefineConfig::default()), 0);
        assert_eq!(words[0], original);
    }

    #[test]
    fn consonant_clusters_scale_down_in_short_words() {
        let mut words = vec![word(
            "cats",
            0.0,
            0.2,
            &[
                ("K", 0.0, 0.06),
                ("AE", 0.06, 0.08),
                ("T", 0.08, 0.14),
                ("S", 0.14, 0.2),
            ],
        )];
        let fixed = enforce_vowel_durations(&mut words, &RefineConfig::default());
        assert_eq!(fixed, 1);
        let w = &words[0];
        // consonant priors total 0.16s, scaled to 0.55 of the word
        let cons_total = w.phonemes[0].duration() + w.phonemes[2].duration()
            + w.phonemes[3].duration();
        assert!((cons_total - 0.11).abs() < 1e-6);
        assert!((w.phonemes[1].duration() - 0.09).abs() < 1e-6);
        assert_tiled(w);
    }

    #[test]
    fn stress_digits_outweigh_position() {
        let mut words = vec![word(
            "away",
            0.0,
            1.0,
            &[("AH0", 0.0, 0.01), ("W", 0.01, 0.98), ("EY1", 0.98, 1.0)],
        )];
        let fixed = enforce_vowel_durations(&mut words, &RefineConfig::default());
        assert_eq!(fixed, 1);
        let w = &words[0];
        // primary stress gets 1.6 against 0.7 for the reduced vowel
        assert!(w.phonemes[2].duration() > 2.0 * w.phonemes[0].duration());
        assert_tiled(w);
    }
}
