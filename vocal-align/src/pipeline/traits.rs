use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AlignError;
use crate::types::Emission;

/// Runtime knobs a concrete backend receives at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendInitConfig {
    /// Threads the inference runtime may use; `None` lets it decide.
    pub intra_op_threads: Option<usize>,
    /// Device label understood by the backend, e.g. `cpu`.
    pub device: String,
}

impl Default for BackendInitConfig {
    fn default() -> Self {
        Self {
            intra_op_threads: None,
            device: "cpu".to_string(),
        }
    }
}

/// Produces frame-level CTC emissions for windows of audio.
///
/// Implementations wrap an acoustic model or a cheaper stand-in; the
/// aligner only relies on the emission contract: one row per frame,
/// one column per vocabulary class, log probabilities, and a dedicated
/// blank class.
pub trait EmissionBackend: Send + Sync {
    /// Emissions for one window of mono samples.
    fn emit(&self, samples: &[f32], sample_rate_hz: u32) -> Result<Emission, AlignError>;

    /// Character classes of the emission columns.
    fn vocab(&self) -> &HashMap<char, usize>;

    /// Column reserved for the CTC blank.
    fn blank_id(&self) -> usize {
        0
    }
}
