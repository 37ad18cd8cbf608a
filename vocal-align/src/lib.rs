pub mod alignment;
pub mod chunking;
pub mod config;
pub mod error;
pub mod g2p;
pub mod phones;
pub mod pipeline;
pub mod refine;
pub mod silence;
pub mod types;

pub use config::AlignerConfig;
pub use error::AlignError;
pub use g2p::Lexicon;
pub use pipeline::builder::LyricAlignerBuilder;
pub use pipeline::runtime::LyricAligner;
pub use pipeline::traits::{BackendInitConfig, EmissionBackend};
pub use silence::SilenceStrategy;
pub use types::{
    AlignmentInput, AlignmentOutcome, Emission, LineHint, PhonemeTiming, WordHint, WordTiming,
};
