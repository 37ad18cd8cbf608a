//! Tunable parameters for the alignment pipeline.
//!
//! Every threshold that shapes the output lives here with a serde
//! default, so a service configuration file can override any of them
//! without code changes.

use serde::{Deserialize, Serialize};

use crate::alignment::SeparatorStyle;

/// Top-level aligner configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    pub chunking: ChunkingConfig,
    pub silence: SilenceConfig,
    pub refine: RefineConfig,
    pub separator_style: SeparatorStyle,
}

/// How long stretches of audio are cut into independently decoded
/// windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Upper bound on a decoded window, in seconds.
    pub max_chunk_s: f64,
    /// Slack added on both sides of a line window before decoding.
    pub line_padding_s: f64,
    /// Cap on how far a line may extend past its hinted start when the
    /// next line start is unknown.
    pub max_line_extent_s: f64,
    /// Windows shorter than this are not decoded; their words fall back
    /// to even distribution.
    pub min_window_s: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_s: 30.0,
            line_padding_s: 0.5,
            max_line_extent_s: 10.0,
            min_window_s: 0.1,
        }
    }
}

/// One RMS-based silence detection profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionProfile {
    /// Speech threshold as a multiple of the measured noise floor.
    pub floor_multiplier: f32,
    /// Absolute lower bound on the speech threshold.
    pub min_threshold: f32,
    /// Consecutive frames required before a state change is accepted.
    pub min_consecutive_frames: usize,
}

impl Default for DetectionProfile {
    fn default() -> Self {
        Self {
            floor_multiplier: 4.0,
            min_threshold: 0.01,
            min_consecutive_frames: 3,
        }
    }
}

/// Silence detection and lead-in trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceConfig {
    /// RMS analysis frame length in seconds.
    pub frame_s: f64,
    /// Frames averaged at the start of the signal to estimate the noise
    /// floor.
    pub baseline_frames: usize,
    /// Gaps shorter than this are not treated as silence.
    pub min_silence_s: f64,
    /// Absolute RMS ceiling for a silent frame. Keeps the floor-derived
    /// threshold sane when the track has no quiet edge to measure.
    pub max_silence_rms: f32,
    pub strict: DetectionProfile,
    pub lenient: DetectionProfile,
    /// Frames near the edges where the lenient profile applies when the
    /// strict one finds nothing.
    pub edge_window_frames: usize,
    /// Fraction of a decode window searched for a late lead-in gap.
    pub lead_window_fraction: f64,
    /// A lead trim removing more than this fraction of the window is
    /// discarded as implausible.
    pub max_lead_trim_fraction: f64,
    /// Emission-based detection: minimum blank probability for a frame
    /// to count as non-speech.
    pub blank_min_prob: f32,
    /// Emission-based detection: maximum best non-blank probability for
    /// a frame to count as non-speech.
    pub voiced_max_prob: f32,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            frame_s: 0.010,
            baseline_frames: 10,
            min_silence_s: 0.25,
            max_silence_rms: 0.05,
            strict: DetectionProfile::default(),
            lenient: DetectionProfile {
                floor_multiplier: 3.0,
                min_threshold: 0.0075,
                min_consecutive_frames: 2,
            },
            edge_window_frames: 25,
            lead_window_fraction: 0.4,
            max_lead_trim_fraction: 0.7,
            blank_min_prob: 0.7,
            voiced_max_prob: 0.2,
        }
    }
}

/// Post-alignment refinement passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Redistribute word-internal time so vowels keep a audible share.
    pub enforce_vowels: bool,
    /// Minimum fraction of a word reserved for its vowels.
    pub min_vowel_share: f64,
    /// Snap word and phoneme starts to spectral-flux onsets.
    pub refine_onsets: bool,
    /// Onset peak threshold as `mean + k * std` of the flux envelope.
    pub onset_threshold_k: f32,
    /// Search radius around a word start, in seconds.
    pub word_snap_radius_s: f64,
    /// Search radius around a phoneme start, in seconds.
    pub phoneme_snap_radius_s: f64,
    /// Phoneme snaps accept peaks at this fraction of the threshold.
    pub phoneme_accept_factor: f32,
    /// A word squeezed below this duration is restored to it.
    pub min_word_duration_s: f64,
    /// Smallest step kept between neighbouring phoneme starts.
    pub min_phoneme_step_s: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            enforce_vowels: true,
            min_vowel_share: 0.35,
            refine_onsets: true,
            onset_threshold_k: 0.25,
            word_snap_radius_s: 0.055,
            phoneme_snap_radius_s: 0.025,
            phoneme_accept_factor: 0.5,
            min_word_duration_s: 0.05,
            min_phoneme_step_s: 0.005,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_serde() {
        let config = AlignerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AlignerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chunking.max_chunk_s, config.chunking.max_chunk_s);
        assert_eq!(back.refine.min_vowel_share, config.refine.min_vowel_share);
    }

    #[test]
    fn partial_profile_fills_missing_fields() {
        let config: AlignerConfig =
            serde_json::from_str(r#"{"silence":{"strict":{"floor_multiplier":5.0}}}"#).unwrap();
        assert_eq!(config.silence.strict.floor_multiplier, 5.0);
        assert_eq!(config.silence.strict.min_threshold, 0.01);
        assert_eq!(config.silence.strict.min_consecutive_frames, 3);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config: AlignerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.silence.baseline_frames, 10);
        assert_eq!(config.silence.strict.min_consecutive_frames, 3);
        assert_eq!(config.refine.word_snap_radius_s, 0.055);
    }
}
