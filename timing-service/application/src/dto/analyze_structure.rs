use serde::{Deserialize, Serialize};
use validator::Validate;

use timing_domain::StructureResult;

use crate::dto::round4;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeStructureRequest {
    #[validate(length(min = 1))]
    pub samples: Vec<f32>,
    #[validate(range(min = 8_000, max = 192_000))]
    pub sample_rate_hz: Option<u32>,
    #[validate(length(min = 1, max = 64))]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeStructureResponse {
    pub session_id: String,
    pub sections: Vec<SongSectionDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SongSectionDto {
    pub label: String,
    pub start: f64,
    pub end: f64,
}

impl AnalyzeStructureResponse {
    pub(crate) fn from_result(session_id: String, result: StructureResult) -> Self {
        Self {
            session_id,
            sections: result
                .sections
                .into_iter()
                .map(|section| SongSectionDto {
                    label: section.label,
                    start: round4(section.start),
                    end: round4(section.end),
                })
                .collect(),
        }
    }
}
