//! Tolerant parsers for the advisory timing-hint payloads. A payload
//! that cannot be used is reported as `None`, never as an error, so a
//! malformed hint degrades the request to full-file alignment.

use serde::Deserialize;
use timing_domain::{LineStamp, WordStamp};

#[derive(Debug, Deserialize)]
struct RawLineHint {
    text: String,
    #[serde(rename = "startMs", alias = "start_ms")]
    start_ms: f64,
}

#[derive(Debug, Deserialize)]
struct RawWordHint {
    word: String,
    start: f64,
    end: f64,
}

/// Parses a JSON array of `{text, startMs}` line hints, milliseconds.
pub fn parse_line_hints(payload: &str) -> Option<Vec<LineStamp>> {
    let raw: Vec<RawLineHint> = match serde_json::from_str(payload) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(%err, "ignoring malformed line hints");
            return None;
        }
    };
    let hints: Vec<LineStamp> = raw
        .into_iter()
        .filter(|line| !line.text.trim().is_empty() && line.start_ms >= 0.0)
        .map(|line| LineStamp {
            text: line.text,
            start: line.start_ms / 1000.0,
        })
        .collect();
    if hints.is_empty() {
        None
    } else {
        Some(hints)
    }
}

/// Parses a JSON array of `{word, start, end}` word hints, seconds.
pub fn parse_word_hints(payload: &str) -> Option<Vec<WordStamp>> {
    let raw: Vec<RawWordHint> = match serde_json::from_str(payload) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(%err, "ignoring malformed word hints");
            return None;
        }
    };
    let hints: Vec<WordStamp> = raw
        .into_iter()
        .filter(|hint| !hint.word.trim().is_empty() && hint.end > hint.start && hint.start >= 0.0)
        .map(|hint| WordStamp {
            word: hint.word,
            start: hint.start,
            end: hint.end,
        })
        .collect();
    if hints.is_empty() {
        None
    } else {
        Some(hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_hints_convert_milliseconds_to_seconds() {
        let hints =
            parse_line_hints(r#"[{"text": "first line", "startMs": 1500}]"#).expect("parses");
        assert_eq!(hints.len(), 1);
        assert!((hints[0].start - 1.5).abs() < 1e-9);
    }

    #[test]
    fn line_hints_accept_snake_case_key() {
        let hints = parse_line_hints(r#"[{"text": "x", "start_ms": 250}]"#).expect("parses");
        assert!((hints[0].start - 0.25).abs() < 1e-9);
    }

    #[test]
    fn malformed_line_hints_are_none() {
        assert!(parse_line_hints("not json").is_none());
        assert!(parse_line_hints(r#"{"text": "not an array"}"#).is_none());
    }

    #[test]
    fn blank_lines_are_filtered_and_empty_is_none() {
        assert!(parse_line_hints("[]").is_none());
        assert!(parse_line_hints(r#"[{"text": "  ", "startMs": 0}]"#).is_none());
    }

    #[test]
    fn word_hints_require_a_positive_window() {
        let payload = r#"[
            {"word": "keep", "start": 1.0, "end": 2.0},
            {"word": "drop", "start": 2.0, "end": 2.0}
        ]"#;
        let hints = parse_word_hints(payload).expect("parses");
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].word, "keep");
    }

    #[test]
    fn malformed_word_hints_are_none() {
        assert!(parse_word_hints("[{]").is_none());
        assert!(parse_word_hints("[]").is_none());
    }
}
