use async_trait::async_trait;

use timing_domain::{
    DomainError, LyricAlignmentPort, LyricTimingRequest, LyricTimingResult, TimedPhoneme,
    TimedWord,
};
use vocal_align::{
    AlignError, AlignerConfig, AlignmentInput, BackendInitConfig, LineHint, LyricAligner,
    LyricAlignerBuilder, WordHint,
};

pub mod backend;

pub use backend::EnergyEmissionBackend;

#[derive(Debug, Clone, Default)]
pub struct VocalAlignAdapterConfig {
    /// Optional CMU-format pronunciation dictionary layered over the
    /// built-in singing lexicon.
    pub dictionary_path: Option<String>,
    pub backend: BackendInitConfig,
    pub engine: AlignerConfig,
}

pub struct VocalAlignTimingAdapter {
    aligner: LyricAligner,
}

impl std::fmt::Debug for VocalAlignTimingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VocalAlignTimingAdapter")
            .finish_non_exhaustive()
    }
}

impl VocalAlignTimingAdapter {
    pub fn load(adapter_cfg: &VocalAlignAdapterConfig) -> Result<Self, DomainError> {
        let backend = EnergyEmissionBackend::new(&adapter_cfg.backend);
        let mut builder = LyricAlignerBuilder::new()
            .with_config(adapter_cfg.engine.clone())
            .with_backend(Box::new(backend));
        if let Some(path) = &adapter_cfg.dictionary_path {
            builder = builder.with_general_dictionary(path);
        }

        let aligner = builder.build().map_err(Self::map_error)?;
        Ok(Self { aligner })
    }

    fn map_error(error: AlignError) -> DomainError {
        match error {
            AlignError::InvalidInput { message } => DomainError::invalid_input(&message),
            other => DomainError::internal_error(&other.to_string()),
        }
    }
}

#[async_trait]
impl LyricAlignmentPort for VocalAlignTimingAdapter {
    async fn time_lyrics(
        &self,
        request: LyricTimingRequest,
    ) -> Result<LyricTimingResult, DomainError> {
        let outcome = self
            .aligner
            .align(&AlignmentInput {
                samples: request.samples,
                sample_rate_hz: request.sample_rate_hz,
                transcript: request.transcript,
                line_hints: request.line_hints.map(|hints| {
                    hints
                        .into_iter()
                        .map(|hint| LineHint {
                            text: hint.text,
                            start: hint.start,
                        })
                        .collect()
                }),
                word_hints: request.word_hints.map(|hints| {
                    hints
                        .into_iter()
                        .map(|hint| WordHint {
                            word: hint.word,
                            start: hint.start,
                            end: hint.end,
                        })
                        .collect()
                }),
            })
            .map_err(Self::map_error)?;

        Ok(LyricTimingResult {
            words: outcome
                .words
                .into_iter()
                .map(|word| TimedWord {
                    word: word.word,
                    start: word.start,
                    end: word.end,
                    phonemes: word
                        .phonemes
                        .into_iter()
                        .map(|phoneme| TimedPhoneme {
                            phoneme: phoneme.phoneme,
                            start: phoneme.start,
                            end: phoneme.end,
                        })
                        .collect(),
                })
                .collect(),
            refined: outcome.refined,
            silence_trimmed: outcome.lead_trimmed,
            warnings: outcome.warnings,
        })
    }
}
