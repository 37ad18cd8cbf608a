use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::phones::strip_stress;
use crate::types::{TokenSequence, TokenSource};

/// How word boundaries are represented in the token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorStyle {
    /// Insert the vocabulary's word separator between words, framed by
    /// blanks, so inter-word silence can stretch over the separator
    /// state instead of pulling word edges apart.
    #[default]
    SilenceAbsorbing,
    /// A single fixed boundary token between words, not framed by a
    /// trailing blank. Marks the boundary without giving silence an
    /// extra state to stretch over.
    Marker,
}

/// Character spelling of an ARPABET symbol for a character-level
/// acoustic vocabulary. Diphthongs spell out both letters so glides
/// keep their full acoustic extent; every expanded character maps back
/// to the same source phoneme.
pub fn arpabet_chars(symbol: &str) -> Option<&'static str> {
    let chars = match strip_stress(symbol) {
        "AA" | "AE" | "AH" => "A",
        "AO" => "O",
        "AW" => "AW",
        "AY" => "AY",
        "B" => "B",
        "CH" => "C",
        "D" | "DH" => "D",
        "EH" => "E",
        "ER" => "R",
        "EY" => "EY",
        "F" => "F",
        "G" => "G",
        "HH" => "H",
        "IH" => "I",
        "IY" => "E",
        "JH" => "J",
        "K" => "K",
        "L" => "L",
        "M" => "M",
        "N" | "NG" => "N",
        "OW" => "OW",
        "OY" => "OY",
        "P" => "P",
        "R" => "R",
        "S" | "SH" => "S",
        "T" | "TH" => "T",
        "UH" | "UW" => "U",
        "V" => "V",
        "W" | "WH" => "W",
        "Y" => "Y",
        "Z" | "ZH" => "Z",
        _ => return None,
    };
    Some(chars)
}

/// Builds the blank-interleaved token sequence for a chunk's words.
///
/// Each phoneme contributes one token per spelled character, every
/// emitting token is followed by a blank, and the whole sequence opens
/// with a blank. Characters missing from the vocabulary are dropped;
/// the count of dropped tokens is returned so the caller can log it.
pub fn build_token_sequence(
    word_phonemes: &[Vec<String>],
    vocab: &HashMap<char, usize>,
    blank_id: usize,
    style: SeparatorStyle,
) -> (TokenSequence, usize) {
    let separator_id = vocab.get(&'|').copied();

    let mut tokens = vec![blank_id];
    let mut sources = vec![TokenSource::Blank];
    let mut dropped = 0usize;
    let mut any_word_emitted = false;

    for (word_idx, phonemes) in word_phonemes.iter().enumerate() {
        let mut emitted: Vec<(usize, TokenSource)> = Vec::new();
        for (phoneme_idx, symbol) in phonemes.iter().enumerate() {
            let Some(spelled) = arpabet_chars(symbol) else {
                dropped += 1;
                continue;
            };
            for c in spelled.chars() {
                match vocab.get(&c) {
                    Some(&id) => emitted.push((
                        id,
                        TokenSource::Phoneme {
                            word: word_idx,
                            phoneme: phoneme_idx,
                        },
                    )),
                    None => dropped += 1,
                }
            }
        }

        if emitted.is_empty() {
            continue;
        }

        if any_word_emitted {
            if let Some(sep) = separator_id {
                tokens.push(sep);
                sources.push(TokenSource::Separator);
                if style == SeparatorStyle::SilenceAbsorbing {
                    tokens.push(blank_id);
                    sources.push(TokenSource::Blank);
                }
            }
        }

        for (id, source) in emitted {
            tokens.push(id);
            sources.push(source);
            tokens.push(blank_id);
            sources.push(TokenSource::Blank);
        }
        any_word_emitted = true;
    }

    if dropped > 0 {
        tracing::warn!(dropped, "tokens missing from acoustic vocabulary");
    }

    (TokenSequence { tokens, sources }, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLANK_ID: usize = 0;

    fn letter_vocab() -> HashMap<char, usize> {
        let mut m = HashMap::new();
        m.insert('|', 1);
        for (i, c) in ('A'..='Z').enumerate() {
            m.insert(c, i + 2);
        }
        m
    }

    fn phonemes(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_produces_single_blank() {
        let (seq, dropped) =
            build_token_sequence(&[], &letter_vocab(), BLANK_ID, SeparatorStyle::SilenceAbsorbing);
        assert_eq!(seq.tokens, vec![BLANK_ID]);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn single_phoneme_word_is_blank_interleaved() {
        let words = vec![phonemes(&["K"])];
        let (seq, _) =
            build_token_sequence(&words, &letter_vocab(), BLANK_ID, SeparatorStyle::SilenceAbsorbing);
        // blank, K, blank
        assert_eq!(seq.tokens.len(), 3);
        assert_eq!(seq.sources[0], TokenSource::Blank);
        assert_eq!(seq.sources[1], TokenSource::Phoneme { word: 0, phoneme: 0 });
        assert_eq!(seq.sources[2], TokenSource::Blank);
    }

    #[test]
    fn diphthong_expands_to_two_tokens_with_shared_source() {
        let words = vec![phonemes(&["AY"])];
        let (seq, dropped) =
            build_token_sequence(&words, &letter_vocab(), BLANK_ID, SeparatorStyle::SilenceAbsorbing);
        assert_eq!(dropped, 0);
        let phoneme_tokens: Vec<_> = seq
            .sources
            .iter()
            .filter(|s| matches!(s, TokenSource::Phoneme { .. }))
            .collect();
        assert_eq!(phoneme_tokens.len(), 2);
        assert!(phoneme_tokens
            .iter()
            .all(|s| **s == TokenSource::Phoneme { word: 0, phoneme: 0 }));
    }

    #[test]
    fn silence_absorbing_style_inserts_separators() {
        let words = vec![phonemes(&["K"]), phonemes(&["T"])];
        let (seq, _) =
            build_token_sequence(&words, &letter_vocab(), BLANK_ID, SeparatorStyle::SilenceAbsorbing);
        let seps = seq
            .sources
            .iter()
            .filter(|s| **s == TokenSource::Separator)
            .count();
        assert_eq!(seps, 1);
    }

    #[test]
    fn marker_style_inserts_one_bare_separator() {
        let words = vec![phonemes(&["K"]), phonemes(&["T"])];
        let (seq, _) =
            build_token_sequence(&words, &letter_vocab(), BLANK_ID, SeparatorStyle::Marker);
        // blank, K, blank, |, T, blank
        assert_eq!(seq.tokens.len(), 6);
        let sep_positions: Vec<usize> = seq
            .sources
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == TokenSource::Separator)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(sep_positions, vec![3]);
        // no blank after the separator: the next word follows directly
        assert_eq!(seq.sources[4], TokenSource::Phoneme { word: 1, phoneme: 0 });
    }

    #[test]
    fn stress_digits_do_not_block_spelling() {
        let words = vec![phonemes(&["AH0", "L"])];
        let (seq, dropped) =
            build_token_sequence(&words, &letter_vocab(), BLANK_ID, SeparatorStyle::SilenceAbsorbing);
        assert_eq!(dropped, 0);
        assert_eq!(seq.emitting_len(), 2);
    }

    #[test]
    fn unknown_symbols_are_counted_as_dropped() {
        let words = vec![phonemes(&["K", "XX", "T"])];
        let (seq, dropped) =
            build_token_sequence(&words, &letter_vocab(), BLANK_ID, SeparatorStyle::SilenceAbsorbing);
        assert_eq!(dropped, 1);
        assert_eq!(seq.emitting_len(), 2);
    }

    #[test]
    fn vocab_without_separator_still_tokenizes() {
        let mut vocab = letter_vocab();
        vocab.remove(&'|');
        let words = vec![phonemes(&["K"]), phonemes(&["T"])];
        let (seq, _) =
            build_token_sequence(&words, &vocab, BLANK_ID, SeparatorStyle::SilenceAbsorbing);
        assert!(seq.sources.iter().all(|s| *s != TokenSource::Separator));
    }
}
