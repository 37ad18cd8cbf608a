use async_trait::async_trait;

use timing_domain::{
    DomainError, SongSection, StructureAnalysisPort, StructureRequest, StructureResult,
};
use vocal_features::{detect_sections, StructureConfig};

pub struct StructureAnalysisAdapter {
    config: StructureConfig,
}

impl StructureAnalysisAdapter {
    pub fn new(config: StructureConfig) -> Self {
        tracing::debug!(
            hop = config.hop,
            min_section_s = config.min_section_s,
            "initializing structure analysis adapter"
        );
        Self { config }
    }
}

#[async_trait]
impl StructureAnalysisPort for StructureAnalysisAdapter {
    async fn analyze(&self, request: StructureRequest) -> Result<StructureResult, DomainError> {
        if request.sample_rate_hz == 0 {
            return Err(DomainError::invalid_input("sample rate must be positive"));
        }

        let sections = detect_sections(&request.samples, request.sample_rate_hz, &self.config);
        Ok(StructureResult {
            sections: sections
                .into_iter()
                .map(|section| SongSection {
                    label: section.label,
                    start: section.start,
                    end: section.end,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(duration_s: f64, sample_rate: u32) -> Vec<f32> {
        let count = (duration_s * sample_rate as f64) as usize;
        (0..count)
            .map(|i| {
                0.3 * (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[tokio::test]
    async fn short_audio_comes_back_as_one_section() {
        let adapter = StructureAnalysisAdapter::new(StructureConfig::default());
        let result = adapter
            .analyze(StructureRequest {
                samples: tone(5.0, 8_000),
                sample_rate_hz: 8_000,
            })
            .await
            .expect("analysis succeeds");

        assert_eq!(result.sections.len(), 1);
        assert_eq!(result.sections[0].label, "Full Song");
        assert!(result.sections[0].start.abs() < 1e-9);
        assert!((result.sections[0].end - 5.0).abs() < 0.1);
    }

    #[tokio::test]
    async fn zero_sample_rate_is_invalid_input() {
        let adapter = StructureAnalysisAdapter::new(StructureConfig::default());
        let err = adapter
            .analyze(StructureRequest {
                samples: vec![0.1, 0.2],
                sample_rate_hz: 0,
            })
            .await
            .expect_err("rejects");

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn empty_audio_yields_no_sections() {
        let adapter = StructureAnalysisAdapter::new(StructureConfig::default());
        let result = adapter
            .analyze(StructureRequest {
                samples: Vec::new(),
                sample_rate_hz: 8_000,
            })
            .await
            .expect("analysis succeeds");

        assert!(result.sections.is_empty());
    }
}
