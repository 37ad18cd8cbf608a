use std::path::{Path, PathBuf};

use crate::config::AlignerConfig;
use crate::error::AlignError;
use crate::g2p::Lexicon;
use crate::pipeline::runtime::LyricAligner;
use crate::pipeline::traits::EmissionBackend;
use crate::silence::SilenceStrategy;

/// Assembles a [`LyricAligner`]. Everything except the emission backend
/// has a default; the backend decides what model actually runs.
///
/// ```no_run
/// # use vocal_align::{EmissionBackend, LyricAlignerBuilder};
/// # fn backend() -> Box<dyn EmissionBackend> { unimplemented!() }
/// let aligner = LyricAlignerBuilder::new()
///     .with_backend(backend())
///     .build()?;
/// # Ok::<(), vocal_align::AlignError>(())
/// ```
#[derive(Default)]
pub struct LyricAlignerBuilder {
    config: Option<AlignerConfig>,
    lexicon: Option<Lexicon>,
    backend: Option<Box<dyn EmissionBackend>>,
    silence_strategy: Option<SilenceStrategy>,
    general_dictionary: Option<PathBuf>,
}

impl LyricAlignerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: AlignerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Loads a CMU-format pronouncing dictionary at build time. Takes
    /// precedence over [`with_lexicon`](Self::with_lexicon).
    pub fn with_general_dictionary(mut self, path: impl AsRef<Path>) -> Self {
        self.general_dictionary = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_backend(mut self, backend: Box<dyn EmissionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_silence_strategy(mut self, strategy: SilenceStrategy) -> Self {
        self.silence_strategy = Some(strategy);
        self
    }

    pub fn build(self) -> Result<LyricAligner, AlignError> {
        let backend = self
            .backend
            .ok_or_else(|| AlignError::invalid_input("an emission backend is required"))?;
        let lexicon = match self.general_dictionary {
            Some(path) => Lexicon::with_general_dictionary(&path)?,
            None => self.lexicon.unwrap_or_default(),
        };
        Ok(LyricAligner::from_parts(
            backend,
            lexicon,
            self.config.unwrap_or_default(),
            self.silence_strategy.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Emission;
    use std::collections::HashMap;

    struct MockBackend {
        vocab: HashMap<char, usize>,
    }

    impl MockBackend {
        fn new() -> Self {
            let mut vocab = HashMap::new();
            vocab.insert('A', 1);
            Self { vocab }
        }
    }

    impl EmissionBackend for MockBackend {
        fn emit(&self, samples: &[f32], _sample_rate_hz: u32) -> Result<Emission, AlignError> {
            let frames = samples.len() / 160;
            Ok(Emission::new(vec![vec![0.5f32.ln(); 2]; frames]))
        }

        fn vocab(&self) -> &HashMap<char, usize> {
            &self.vocab
        }
    }

    #[test]
    fn build_without_backend_fails() {
        let err = LyricAlignerBuilder::new().build().unwrap_err();
        assert!(matches!(err, AlignError::InvalidInput { .. }));
    }

    #[test]
    fn defaults_fill_in() {
        let aligner = LyricAlignerBuilder::new()
            .with_backend(Box::new(MockBackend::new()))
            .build()
            .unwrap();
        assert!(aligner.config().refine.enforce_vowels);
    }

    #[test]
    fn explicit_config_wins() {
        let mut config = AlignerConfig::default();
        config.chunking.max_chunk_s = 12.0;
        let aligner = LyricAlignerBuilder::new()
            .with_config(config)
            .with_backend(Box::new(MockBackend::new()))
            .build()
            .unwrap();
        assert_eq!(aligner.config().chunking.max_chunk_s, 12.0);
    }

    #[test]
    fn missing_dictionary_file_surfaces_io_error() {
        let err = LyricAlignerBuilder::new()
            .with_backend(Box::new(MockBackend::new()))
            .with_general_dictionary("/nonexistent/cmudict.txt")
            .build()
            .unwrap_err();
        assert!(matches!(err, AlignError::Io { .. }));
    }
}
