pub mod chroma;
pub mod error;
pub mod novelty;
pub mod onset;
pub mod rms;
pub mod sections;
pub mod stft;
pub mod wav;

pub use error::FeatureError;
pub use onset::OnsetEnvelope;
pub use sections::{detect_sections, Section, StructureConfig};
pub use stft::Stft;
pub use wav::read_wav_mono;
