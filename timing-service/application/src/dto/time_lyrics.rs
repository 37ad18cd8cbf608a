use serde::{Deserialize, Serialize};
use validator::Validate;

use timing_domain::{LyricTimingResult, TimedWord};

use crate::dto::round4;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TimeLyricsRequest {
    #[validate(length(min = 1))]
    pub samples: Vec<f32>,
    #[validate(range(min = 8_000, max = 192_000))]
    pub sample_rate_hz: Option<u32>,
    /// Whitespace-separated lyric text. May be empty when hints carry
    /// the words instead.
    #[serde(default)]
    pub transcript: String,
    /// JSON array of `{text, startMs}` objects. Malformed payloads are
    /// ignored with a warning.
    pub line_hints: Option<String>,
    /// JSON array of `{word, start, end}` objects, seconds.
    pub word_hints: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeLyricsResponse {
    pub session_id: String,
    pub words: Vec<TimedWordDto>,
    pub refined: bool,
    pub silence_trimmed: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimedWordDto {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub phonemes: Vec<TimedPhonemeDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimedPhonemeDto {
    pub phoneme: String,
    pub start: f64,
    pub end: f64,
}

impl From<TimedWord> for TimedWordDto {
    fn from(word: TimedWord) -> Self {
        Self {
            word: word.word,
            start: round4(word.start),
            end: round4(word.end),
            phonemes: word
                .phonemes
                .into_iter()
                .map(|p| TimedPhonemeDto {
                    phoneme: p.phoneme,
                    start: round4(p.start),
                    end: round4(p.end),
                })
                .collect(),
        }
    }
}

impl TimeLyricsResponse {
    pub(crate) fn from_result(session_id: String, result: LyricTimingResult) -> Self {
        Self {
            session_id,
            words: result.words.into_iter().map(TimedWordDto::from).collect(),
            refined: result.refined,
            silence_trimmed: result.silence_trimmed,
            warnings: result.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timing_domain::TimedPhoneme;

    #[test]
    fn word_times_are_rounded_to_four_decimals() {
        let word = TimedWord {
            word: "go".to_string(),
            start: 0.123_456_78,
            end: 0.987_654_32,
            phonemes: vec![TimedPhoneme {
                phoneme: "G".to_string(),
                start: 0.123_456_78,
                end: 0.5,
            }],
        };
        let dto = TimedWordDto::from(word);
        assert_eq!(dto.start, 0.123_5);
        assert_eq!(dto.end, 0.987_7);
        assert_eq!(dto.phonemes[0].start, 0.123_5);
    }
}
