//! Word-to-phoneme resolution.
//!
//! Lookup order: the built-in singing lexicon, then the general
//! pronouncing dictionary when one is loaded, then rule-based
//! conversion. Only tokens that are pure punctuation resolve to
//! nothing.

mod rules;
mod singing;

use std::collections::HashMap;
use std::path::Path;

use crate::error::AlignError;

pub use rules::grapheme_to_phonemes;

/// Punctuation stripped from both ends of a token before lookup.
/// Interior apostrophes survive, so contractions keep their dictionary
/// spelling.
const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '-', '\u{2019}', '\u{2018}', '\u{201c}',
    '\u{201d}',
];

/// Lowercases a token and trims surrounding punctuation. Returns an
/// empty string for punctuation-only tokens.
pub fn normalize_word(token: &str) -> String {
    token.trim().trim_matches(EDGE_PUNCTUATION).to_lowercase()
}

/// Pronunciation source combining the singing lexicon with an optional
/// general dictionary.
#[derive(Debug, Clone)]
pub struct Lexicon {
    singing: HashMap<String, Vec<String>>,
    general: HashMap<String, Vec<String>>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    /// The built-in singing lexicon alone.
    pub fn builtin() -> Self {
        let singing = singing::ENTRIES
            .iter()
            .map(|(word, phonemes)| {
                (
                    (*word).to_string(),
                    phonemes.iter().map(|p| (*p).to_string()).collect(),
                )
            })
            .collect();
        Self {
            singing,
            general: HashMap::new(),
        }
    }

    /// Loads a CMU-format pronouncing dictionary from disk on top of
    /// the built-in entries.
    pub fn with_general_dictionary(path: &Path) -> Result<Self, AlignError> {
        let bytes = std::fs::read(path)
            .map_err(|source| AlignError::io("reading pronouncing dictionary", source))?;
        let text = String::from_utf8_lossy(&bytes);
        let mut lexicon = Self::builtin();
        lexicon.general = parse_cmu_dictionary(&text);
        tracing::debug!(
            entries = lexicon.general.len(),
            path = %path.display(),
            "loaded general dictionary"
        );
        Ok(lexicon)
    }

    pub fn general_len(&self) -> usize {
        self.general.len()
    }

    /// Resolves a raw transcript token to ARPABET phonemes. Dictionary
    /// entries may carry stress digits; rule-based fallbacks never do.
    /// Empty only when the token is pure punctuation.
    pub fn lookup(&self, token: &str) -> Vec<String> {
        let word = normalize_word(token);
        if word.is_empty() {
            return Vec::new();
        }
        if let Some(phonemes) = self.singing.get(&word) {
            return phonemes.clone();
        }
        if let Some(phonemes) = self.general.get(&word) {
            return phonemes.clone();
        }
        grapheme_to_phonemes(&word)
    }
}

/// Parses CMU dictionary text: comment lines start with `;;;`, variant
/// pronunciations like `CLOSE(2)` are skipped, word and phonemes are
/// separated by two spaces.
pub fn parse_cmu_dictionary(text: &str) -> HashMap<String, Vec<String>> {
    let mut entries = HashMap::new();
    for line in text.lines() {
        if line.starts_with(";;;") {
            continue;
        }
        let Some((word, phoneme_text)) = line.trim().split_once("  ") else {
            continue;
        };
        if word.contains('(') {
            continue;
        }
        let phonemes: Vec<String> = phoneme_text
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if !phonemes.is_empty() {
            entries.insert(word.to_lowercase(), phonemes);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_edge_punctuation_only() {
        assert_eq!(normalize_word("Hello!"), "hello");
        assert_eq!(normalize_word("\u{201c}Night,\u{201d}"), "night");
        assert_eq!(normalize_word("don't"), "don't");
        assert_eq!(normalize_word("..."), "");
    }

    #[test]
    fn singing_lexicon_wins_over_rules() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.lookup("Gonna"), ["G", "AH", "N", "AH"]);
        assert_eq!(lexicon.lookup("whoa!"), ["W", "OW"]);
    }

    #[test]
    fn unknown_words_fall_back_to_rules() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.lookup("night"), ["N", "AY", "T"]);
    }

    #[test]
    fn gibberish_still_resolves_and_is_deterministic() {
        let lexicon = Lexicon::builtin();
        let first = lexicon.lookup("zzqx");
        assert!(!first.is_empty());
        assert_eq!(lexicon.lookup("zzqx"), first);
        assert_eq!(Lexicon::builtin().lookup("zzqx"), first);
    }

    #[test]
    fn punctuation_only_token_resolves_to_nothing() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.lookup("--").is_empty());
    }

    #[test]
    fn cmu_parser_skips_comments_and_variants() {
        let text = ";;; comment line\n\
                    HELLO  HH AH0 L OW1\n\
                    CLOSE(2)  K L OW1 Z\n\
                    WORLD  W ER1 L D\n";
        let entries = parse_cmu_dictionary(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["hello"], ["HH", "AH0", "L", "OW1"]);
        assert_eq!(entries["world"], ["W", "ER1", "L", "D"]);
    }

    #[test]
    fn general_dictionary_outranks_rule_fallback() {
        let mut lexicon = Lexicon::builtin();
        lexicon.general = parse_cmu_dictionary("NIGHT  N AY1 T\n");
        assert_eq!(lexicon.lookup("night"), ["N", "AY1", "T"]);
    }
}
