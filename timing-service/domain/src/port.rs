use async_trait::async_trait;

use crate::{
    DomainError, LyricTimingRequest, LyricTimingResult, StructureRequest, StructureResult,
};

#[async_trait]
pub trait LyricAlignmentPort: Send + Sync {
    async fn time_lyrics(
        &self,
        request: LyricTimingRequest,
    ) -> Result<LyricTimingResult, DomainError>;
}

#[async_trait]
pub trait StructureAnalysisPort: Send + Sync {
    async fn analyze(&self, request: StructureRequest) -> Result<StructureResult, DomainError>;
}
