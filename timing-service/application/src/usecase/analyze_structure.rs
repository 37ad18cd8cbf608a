use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use timing_domain::{StructureAnalysisPort, StructureRequest};

use crate::{AnalyzeStructureRequest, AnalyzeStructureResponse, ApplicationError};

#[async_trait]
pub trait AnalyzeStructureUseCase: Send + Sync {
    async fn analyze_structure(
        &self,
        request: AnalyzeStructureRequest,
    ) -> Result<AnalyzeStructureResponse, ApplicationError>;
}

pub struct AnalyzeStructureUseCaseImpl {
    analyzer: Arc<dyn StructureAnalysisPort>,
    default_sample_rate_hz: u32,
}

impl AnalyzeStructureUseCaseImpl {
    pub fn new(analyzer: Arc<dyn StructureAnalysisPort>, default_sample_rate_hz: u32) -> Self {
        Self {
            analyzer,
            default_sample_rate_hz,
        }
    }
}

#[async_trait]
impl AnalyzeStructureUseCase for AnalyzeStructureUseCaseImpl {
    async fn analyze_structure(
        &self,
        request: AnalyzeStructureRequest,
    ) -> Result<AnalyzeStructureResponse, ApplicationError> {
        request
            .validate()
            .map_err(|err| ApplicationError::Validation(err.to_string()))?;

        let sample_rate_hz = request.sample_rate_hz.unwrap_or(self.default_sample_rate_hz);
        let session_id = request
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::debug!(
            session_id = %session_id,
            sample_count = request.samples.len(),
            sample_rate_hz,
            "starting structure analysis"
        );

        let result = self
            .analyzer
            .analyze(StructureRequest {
                samples: request.samples,
                sample_rate_hz,
            })
            .await?;

        tracing::debug!(
            session_id = %session_id,
            section_count = result.sections.len(),
            "structure analysis completed"
        );

        Ok(AnalyzeStructureResponse::from_result(session_id, result))
    }
}
