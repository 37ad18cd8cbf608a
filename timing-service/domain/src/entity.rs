use serde::{Deserialize, Serialize};

/// Caller-supplied rough start for one lyric line, seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineStamp {
    pub text: String,
    pub start: f64,
}

/// Caller-supplied rough window for one word, seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordStamp {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricTimingRequest {
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
    pub transcript: String,
    pub line_hints: Option<Vec<LineStamp>>,
    pub word_hints: Option<Vec<WordStamp>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedPhoneme {
    pub phoneme: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub phonemes: Vec<TimedPhoneme>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricTimingResult {
    pub words: Vec<TimedWord>,
    /// True when the onset refinement pass ran to completion.
    pub refined: bool,
    /// True when leading silence was trimmed from at least one window.
    pub silence_trimmed: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureRequest {
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongSection {
    pub label: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureResult {
    pub sections: Vec<SongSection>,
}
