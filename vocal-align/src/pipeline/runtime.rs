//! The aligner runtime: strategy selection, chunked decoding, and the
//! refinement passes, with per-chunk degradation instead of failure.

use std::ops::Range;

use crate::alignment::{
    build_token_sequence, distribute_evenly, enforce_monotonic, forced_align_viterbi,
    path_to_word_timings,
};
use crate::chunking::{plan_by_silences, plan_from_lines, plan_from_word_hints};
use crate::config::AlignerConfig;
use crate::error::AlignError;
use crate::g2p::{normalize_word, Lexicon};
use crate::phones::strip_stress;
use crate::pipeline::traits::EmissionBackend;
use crate::refine::{enforce_vowel_durations, refine_word_onsets};
use crate::silence::{
    detect_silences, silences_from_emission, speech_bounds, trim_lead, SilenceStrategy,
};
use crate::types::{
    AlignmentInput, AlignmentOutcome, Chunk, SilenceInterval, WordHint, WordPlan, WordTiming,
};

/// Lyric-to-audio aligner over a pluggable emission backend.
pub struct LyricAligner {
    backend: Box<dyn EmissionBackend>,
    lexicon: Lexicon,
    config: AlignerConfig,
    silence_strategy: SilenceStrategy,
}

impl core::fmt::Debug for LyricAligner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LyricAligner").finish_non_exhaustive()
    }
}

impl LyricAligner {
    pub(crate) fn from_parts(
        backend: Box<dyn EmissionBackend>,
        lexicon: Lexicon,
        config: AlignerConfig,
        silence_strategy: SilenceStrategy,
    ) -> Self {
        Self {
            backend,
            lexicon,
            config,
            silence_strategy,
        }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Aligns a transcript against audio. Word coverage is total: every
    /// plannable word comes back with a timing, degraded stretches are
    /// reported through [`AlignmentOutcome::warnings`].
    pub fn align(&self, input: &AlignmentInput) -> Result<AlignmentOutcome, AlignError> {
        if input.sample_rate_hz == 0 {
            return Err(AlignError::invalid_input("sample rate must be non-zero"));
        }
        let has_lines = input.line_hints.as_ref().is_some_and(|h| !h.is_empty());
        let has_word_hints = input.word_hints.as_ref().is_some_and(|h| !h.is_empty());
        if input.transcript.trim().is_empty() && !has_lines && !has_word_hints {
            return Err(AlignError::invalid_input(
                "either a transcript or timing hints are required",
            ));
        }

        let mut outcome = AlignmentOutcome::default();
        if input.samples.is_empty() {
            outcome.warnings.push("no audio samples".to_string());
            return Ok(outcome);
        }

        let duration = input.duration_s();
        let (plans, line_word_ranges) = self.plan_words(input, has_lines, has_word_hints);
        if plans.is_empty() {
            return Err(AlignError::invalid_input("no alignable words in input"));
        }

        let silences = self.scan_silences(input, duration, &mut outcome.warnings);
        let chunks = self.plan_chunks(
            input,
            &plans,
            &line_word_ranges,
            &silences,
            duration,
            has_lines,
            has_word_hints,
        );

        tracing::info!(
            words = plans.len(),
            chunks = chunks.len(),
            duration_s = duration,
            "aligning transcript"
        );

        let mut words = Vec::with_capacity(plans.len());
        for chunk in &chunks {
            self.decode_chunk(input, chunk, &plans, &silences, duration, &mut words, &mut outcome);
        }

        enforce_monotonic(&mut words, self.config.refine.min_phoneme_step_s);

        if self.config.refine.enforce_vowels {
            enforce_vowel_durations(&mut words, &self.config.refine);
        }
        if self.config.refine.refine_onsets {
            outcome.refined = refine_word_onsets(
                &mut words,
                &input.samples,
                input.sample_rate_hz,
                &self.config.refine,
            );
        }

        strip_stress_digits(&mut words);
        outcome.words = words;
        Ok(outcome)
    }

    /// Resolves the word list and, when line hints drive the run, the
    /// word index range covered by each line.
    fn plan_words(
        &self,
        input: &AlignmentInput,
        has_lines: bool,
        has_word_hints: bool,
    ) -> (Vec<WordPlan>, Vec<Range<usize>>) {
        let mut plans = Vec::new();
        let mut line_ranges = Vec::new();

        if has_word_hints {
            for hint in input.word_hints.as_deref().unwrap_or_default() {
                self.push_plan(&hint.word, &mut plans);
            }
            return (plans, line_ranges);
        }

        if has_lines {
            for line in input.line_hints.as_deref().unwrap_or_default() {
                let from = plans.len();
                for token in line.text.split_whitespace() {
                    self.push_plan(token, &mut plans);
                }
                line_ranges.push(from..plans.len());
            }
            return (plans, line_ranges);
        }

        for token in input.transcript.split_whitespace() {
            self.push_plan(token, &mut plans);
        }
        (plans, line_ranges)
    }

    fn push_plan(&self, token: &str, plans: &mut Vec<WordPlan>) {
        if normalize_word(token).is_empty() {
            tracing::debug!(token, "skipping punctuation-only token");
            return;
        }
        let phonemes = self.lexicon.lookup(token);
        plans.push(WordPlan::new(token, phonemes));
    }

    fn scan_silences(
        &self,
        input: &AlignmentInput,
        duration: f64,
        warnings: &mut Vec<String>,
    ) -> Vec<SilenceInterval> {
        match self.silence_strategy {
            SilenceStrategy::Rms => {
                detect_silences(&input.samples, input.sample_rate_hz, &self.config.silence)
            }
            SilenceStrategy::Emission => {
                match self.backend.emit(&input.samples, input.sample_rate_hz) {
                    Ok(emission) if emission.frames() > 0 => silences_from_emission(
                        &emission,
                        self.backend.blank_id(),
                        emission.frame_duration(duration),
                        &self.config.silence,
                    ),
                    Ok(_) => Vec::new(),
                    Err(err) => {
                        warnings.push(format!("emission silence scan failed: {err}"));
                        detect_silences(&input.samples, input.sample_rate_hz, &self.config.silence)
                    }
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_chunks(
        &self,
        input: &AlignmentInput,
        plans: &[WordPlan],
        line_word_ranges: &[Range<usize>],
        silences: &[SilenceInterval],
        duration: f64,
        has_lines: bool,
        has_word_hints: bool,
    ) -> Vec<Chunk> {
        if has_word_hints {
            // Punctuation-only hints produce no plan; drop them here
            // too so the chunk ranges stay aligned with the plan list.
            let hints: Vec<WordHint> = input
                .word_hints
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter(|hint| !normalize_word(&hint.word).is_empty())
                .cloned()
                .collect();
            return plan_from_word_hints(&hints, duration);
        }
        if has_lines {
            return plan_from_lines(
                input.line_hints.as_deref().unwrap_or_default(),
                line_word_ranges,
                silences,
                duration,
                &self.config.chunking,
            );
        }

        let mut chunks = plan_by_silences(plans.len(), duration, silences, &self.config.chunking);
        // A single unhinted window narrows to the detected speech
        // extent so a long instrumental lead cannot smear the words.
        if chunks.len() == 1 {
            let (onset, offset) =
                speech_bounds(&input.samples, input.sample_rate_hz, &self.config.silence);
            if offset > onset {
                chunks[0].start = onset;
                chunks[0].end = offset;
            }
        }
        chunks
    }

    #[allow(clippy::too_many_arguments)]
    fn decode_chunk(
        &self,
        input: &AlignmentInput,
        chunk: &Chunk,
        plans: &[WordPlan],
        silences: &[SilenceInterval],
        duration: f64,
        words: &mut Vec<WordTiming>,
        outcome: &mut AlignmentOutcome,
    ) {
        let chunk_plans = &plans[chunk.words.clone()];
        if chunk_plans.is_empty() {
            return;
        }

        let (mut start, end) = if chunk.line_span.is_some() {
            let pad = self.config.chunking.line_padding_s;
            ((chunk.start - pad).max(0.0), (chunk.end + pad).min(duration))
        } else {
            (chunk.start, chunk.end)
        };

        if chunk.line_span.is_some() {
            if let Some(new_start) = trim_lead(start, end, silences, &self.config.silence) {
                tracing::debug!(start, new_start, "trimmed instrumental lead");
                start = new_start;
                outcome.lead_trimmed = true;
            }
        }

        if end - start < self.config.chunking.min_window_s {
            outcome.warnings.push(format!(
                "window for {:?} too short, distributing words evenly",
                chunk.words
            ));
            words.extend(distribute_evenly(chunk_plans, chunk.start, chunk.end));
            return;
        }

        let phoneme_count: usize = chunk_plans.iter().map(|p| p.phonemes.len()).sum();
        if phoneme_count < 2 {
            tracing::debug!(words = ?chunk.words, "too few phonemes to decode");
            words.extend(distribute_evenly(chunk_plans, start, end));
            return;
        }

        let sr = input.sample_rate_hz as f64;
        let from = ((start * sr).round() as usize).min(input.samples.len());
        let to = ((end * sr).round() as usize).clamp(from, input.samples.len());
        let window = &input.samples[from..to];

        let emission = match self.backend.emit(window, input.sample_rate_hz) {
            Ok(emission) if emission.frames() > 0 => emission,
            Ok(_) => {
                outcome
                    .warnings
                    .push(format!("backend produced no frames for {:?}", chunk.words));
                words.extend(distribute_evenly(chunk_plans, start, end));
                return;
            }
            Err(err) => {
                outcome
                    .warnings
                    .push(format!("backend failed for {:?}: {err}", chunk.words));
                words.extend(distribute_evenly(chunk_plans, start, end));
                return;
            }
        };

        let word_phonemes: Vec<Vec<String>> =
            chunk_plans.iter().map(|p| p.phonemes.clone()).collect();
        let (seq, _dropped) = build_token_sequence(
            &word_phonemes,
            self.backend.vocab(),
            self.backend.blank_id(),
            self.config.separator_style,
        );
        if seq.emitting_len() == 0 {
            outcome
                .warnings
                .push(format!("no decodable tokens for {:?}", chunk.words));
            words.extend(distribute_evenly(chunk_plans, start, end));
            return;
        }

        let frame_dt = emission.frame_duration(end - start);
        match forced_align_viterbi(&emission.log_probs, &seq.tokens) {
            Some(path) => {
                words.extend(path_to_word_timings(&path, &seq, chunk_plans, frame_dt, start));
            }
            None => {
                outcome.warnings.push(format!(
                    "audio too short to decode {:?}, distributing words evenly",
                    chunk.words
                ));
                words.extend(distribute_evenly(chunk_plans, start, end));
            }
        }
    }
}

fn strip_stress_digits(words: &mut [WordTiming]) {
    for word in words.iter_mut() {
        for phoneme in word.phonemes.iter_mut() {
            let stripped = strip_stress(&phoneme.phoneme);
            if stripped.len() != phoneme.phoneme.len() {
                phoneme.phoneme = stripped.to_string();
            }
        }
    }
}
