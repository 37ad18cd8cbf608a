use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use timing_domain::{LyricAlignmentPort, LyricTimingRequest};

use crate::hints::{parse_line_hints, parse_word_hints};
use crate::{ApplicationError, TimeLyricsRequest, TimeLyricsResponse};

#[async_trait]
pub trait TimeLyricsUseCase: Send + Sync {
    async fn time_lyrics(
        &self,
        request: TimeLyricsRequest,
    ) -> Result<TimeLyricsResponse, ApplicationError>;
}

pub struct TimeLyricsUseCaseImpl {
    aligner: Arc<dyn LyricAlignmentPort>,
    default_sample_rate_hz: u32,
}

impl TimeLyricsUseCaseImpl {
    pub fn new(aligner: Arc<dyn LyricAlignmentPort>, default_sample_rate_hz: u32) -> Self {
        Self {
            aligner,
            default_sample_rate_hz,
        }
    }
}

#[async_trait]
impl TimeLyricsUseCase for TimeLyricsUseCaseImpl {
    async fn time_lyrics(
        &self,
        request: TimeLyricsRequest,
    ) -> Result<TimeLyricsResponse, ApplicationError> {
        request
            .validate()
            .map_err(|err| ApplicationError::Validation(err.to_string()))?;

        let sample_rate_hz = request.sample_rate_hz.unwrap_or(self.default_sample_rate_hz);
        let session_id = request
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut hint_warnings = Vec::new();
        let line_hints = match request.line_hints.as_deref() {
            Some(raw) => {
                let parsed = parse_line_hints(raw);
                if parsed.is_none() {
                    hint_warnings.push("line hints were not usable and were ignored".to_string());
                }
                parsed
            }
            None => None,
        };
        let word_hints = match request.word_hints.as_deref() {
            Some(raw) => {
                let parsed = parse_word_hints(raw);
                if parsed.is_none() {
                    hint_warnings.push("word hints were not usable and were ignored".to_string());
                }
                parsed
            }
            None => None,
        };

        tracing::debug!(
            session_id = %session_id,
            sample_count = request.samples.len(),
            sample_rate_hz,
            transcript_words = request.transcript.split_whitespace().count(),
            line_hint_count = line_hints.as_ref().map_or(0, Vec::len),
            word_hint_count = word_hints.as_ref().map_or(0, Vec::len),
            "starting lyric timing"
        );

        let timed = self
            .aligner
            .time_lyrics(LyricTimingRequest {
                samples: request.samples,
                sample_rate_hz,
                transcript: request.transcript,
                line_hints,
                word_hints,
            })
            .await?;

        tracing::debug!(
            session_id = %session_id,
            timed_word_count = timed.words.len(),
            refined = timed.refined,
            silence_trimmed = timed.silence_trimmed,
            "lyric timing completed"
        );

        let mut response = TimeLyricsResponse::from_result(session_id, timed);
        response.warnings.extend(hint_warnings);
        Ok(response)
    }
}
