//! Core data types shared across the alignment pipeline.

use serde::{Deserialize, Serialize};

/// Timing for a single phoneme inside a word, in seconds from the start
/// of the audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeTiming {
    /// ARPABET symbol. Stress digits survive until the pipeline's final
    /// normalization so refinement can weight stressed vowels.
    pub phoneme: String,
    pub start: f64,
    pub end: f64,
}

impl PhonemeTiming {
    pub fn new(phoneme: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            phoneme: phoneme.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Timing for one word of the transcript together with its phoneme
/// breakdown. Phonemes tile the word span without gaps; the word span is
/// exactly `[phonemes.first().start, phonemes.last().end]` whenever the
/// breakdown is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub phonemes: Vec<PhonemeTiming>,
}

impl WordTiming {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
            phonemes: Vec::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// A transcript word with its resolved phonemes, before any timing is
/// known. Dictionary entries may carry stress digits here; they are
/// stripped when the final timings are assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPlan {
    pub text: String,
    pub phonemes: Vec<String>,
}

impl WordPlan {
    pub fn new(text: impl Into<String>, phonemes: Vec<String>) -> Self {
        Self {
            text: text.into(),
            phonemes,
        }
    }
}

/// Frame-level CTC emission matrix produced by an acoustic backend.
///
/// `log_probs[t][c]` is the log probability of class `c` at frame `t`.
/// Class 0 is the blank by convention; backends that use a different
/// blank index report it through [`crate::pipeline::EmissionBackend`].
#[derive(Debug, Clone)]
pub struct Emission {
    pub log_probs: Vec<Vec<f32>>,
}

impl Emission {
    pub fn new(log_probs: Vec<Vec<f32>>) -> Self {
        Self { log_probs }
    }

    pub fn frames(&self) -> usize {
        self.log_probs.len()
    }

    pub fn classes(&self) -> usize {
        self.log_probs.first().map_or(0, Vec::len)
    }

    /// Seconds covered by one emission frame given the duration of the
    /// audio window the emission was computed from.
    pub fn frame_duration(&self, window_s: f64) -> f64 {
        if self.log_probs.is_empty() {
            0.0
        } else {
            window_s / self.log_probs.len() as f64
        }
    }
}

/// Provenance of one entry in a blank-interleaved token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Blank,
    Separator,
    /// Character emitted for `phonemes[phoneme]` of `words[word]`. A
    /// phoneme that expands to several characters contributes several
    /// consecutive tokens with the same source indices.
    Phoneme {
        word: usize,
        phoneme: usize,
    },
}

/// Blank-interleaved token sequence fed to the Viterbi decoder, with a
/// parallel provenance list mapping decoded frames back to transcript
/// positions.
#[derive(Debug, Clone)]
pub struct TokenSequence {
    pub tokens: Vec<usize>,
    pub sources: Vec<TokenSource>,
}

impl TokenSequence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of non-blank tokens, which bounds the shortest valid CTC
    /// path through the sequence.
    pub fn emitting_len(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| !matches!(s, TokenSource::Blank))
            .count()
    }
}

/// A stretch of audio decoded independently, with the transcript words
/// assigned to it.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Window bounds in seconds, absolute within the full audio.
    pub start: f64,
    pub end: f64,
    /// Indices into the normalized word list of the full transcript.
    pub words: std::ops::Range<usize>,
    /// Indices of the first and last line hint covered, when the chunk
    /// was planned from line hints.
    pub line_span: Option<(usize, usize)>,
}

impl Chunk {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// A detected stretch of non-speech audio, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceInterval {
    pub start: f64,
    pub end: f64,
}

impl SilenceInterval {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Caller-supplied rough start time for one lyric line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineHint {
    pub text: String,
    pub start: f64,
}

/// Caller-supplied rough window for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordHint {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// Everything the aligner needs for one request.
#[derive(Debug, Clone)]
pub struct AlignmentInput {
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
    /// Whitespace-separated lyric text. May be empty when hints carry
    /// the words instead.
    pub transcript: String,
    pub line_hints: Option<Vec<LineHint>>,
    pub word_hints: Option<Vec<WordHint>>,
}

impl AlignmentInput {
    pub fn duration_s(&self) -> f64 {
        if self.sample_rate_hz == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate_hz as f64
        }
    }
}

/// Result of one alignment run.
#[derive(Debug, Clone, Default)]
pub struct AlignmentOutcome {
    pub words: Vec<WordTiming>,
    /// True when the onset refinement pass ran to completion.
    pub refined: bool,
    /// True when leading silence was trimmed from at least one window.
    pub lead_trimmed: bool,
    /// Human-readable notes about degraded stretches, e.g. chunks that
    /// fell back to even distribution.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emission_frame_duration_divides_window() {
        let emission = Emission::new(vec![vec![0.0; 4]; 50]);
        assert!((emission.frame_duration(1.0) - 0.02).abs() < 1e-12);
        assert_eq!(emission.frames(), 50);
        assert_eq!(emission.classes(), 4);
    }

    #[test]
    fn empty_emission_has_zero_frame_duration() {
        let emission = Emission::new(Vec::new());
        assert_eq!(emission.frame_duration(3.0), 0.0);
        assert_eq!(emission.classes(), 0);
    }

    #[test]
    fn token_sequence_counts_emitting_tokens() {
        let seq = TokenSequence {
            tokens: vec![0, 5, 0, 2, 0],
            sources: vec![
                TokenSource::Blank,
                TokenSource::Phoneme { word: 0, phoneme: 0 },
                TokenSource::Blank,
                TokenSource::Separator,
                TokenSource::Blank,
            ],
        };
        assert_eq!(seq.len(), 5);
        assert_eq!(seq.emitting_len(), 2);
    }

    #[test]
    fn silence_interval_center() {
        let gap = SilenceInterval { start: 1.0, end: 2.0 };
        assert!((gap.center() - 1.5).abs() < 1e-12);
        assert!((gap.duration() - 1.0).abs() < 1e-12);
    }
}
