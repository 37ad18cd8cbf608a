use std::collections::HashMap;

use vocal_align::{AlignError, BackendInitConfig, Emission, EmissionBackend};

/// Frame RMS threshold separating voiced frames from background.
const VOICED_RMS_THRESHOLD: f32 = 0.01;

/// Emission frame length in seconds.
const FRAME_S: f64 = 0.02;

/// Acoustic stand-in that derives CTC emissions from frame energy.
///
/// Voiced frames spread probability mass evenly over the letter classes
/// and quiet frames concentrate it on the blank, which is enough for
/// the decoder to distribute a transcript over the sung stretches of a
/// track without any model weights on disk.
pub struct EnergyEmissionBackend {
    vocab: HashMap<char, usize>,
}

impl EnergyEmissionBackend {
    /// Blank, the word separator and `A`..`Z`.
    const CLASSES: usize = 28;

    pub fn new(cfg: &BackendInitConfig) -> Self {
        tracing::debug!(
            device = %cfg.device,
            intra_op_threads = ?cfg.intra_op_threads,
            "initializing energy emission backend"
        );
        let mut vocab = HashMap::new();
        vocab.insert('|', 1);
        for (offset, ch) in ('A'..='Z').enumerate() {
            vocab.insert(ch, 2 + offset);
        }
        Self { vocab }
    }
}

impl EmissionBackend for EnergyEmissionBackend {
    fn emit(&self, samples: &[f32], sample_rate_hz: u32) -> Result<Emission, AlignError> {
        if sample_rate_hz == 0 {
            return Err(AlignError::invalid_input("sample rate must be positive"));
        }

        let frame_len = ((sample_rate_hz as f64 * FRAME_S).round() as usize).max(1);
        let letters = (Self::CLASSES - 1) as f32;
        let mut rows = Vec::with_capacity(samples.len() / frame_len + 1);
        for frame in samples.chunks(frame_len) {
            let energy =
                (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt();
            let (blank, spread) = if energy < VOICED_RMS_THRESHOLD {
                (0.9_f32, 0.1_f32)
            } else {
                (0.1_f32, 0.9_f32)
            };
            let mut row = vec![(spread / letters).ln(); Self::CLASSES];
            row[0] = blank.ln();
            rows.push(row);
        }
        Ok(Emission::new(rows))
    }

    fn vocab(&self) -> &HashMap<char, usize> {
        &self.vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> EnergyEmissionBackend {
        EnergyEmissionBackend::new(&BackendInitConfig::default())
    }

    #[test]
    fn vocab_covers_the_ctc_alphabet() {
        let backend = backend();
        assert_eq!(backend.vocab().len(), 27);
        assert_eq!(backend.vocab()[&'|'], 1);
        assert_eq!(backend.vocab()[&'A'], 2);
        assert_eq!(backend.vocab()[&'Z'], 27);
        assert_eq!(backend.blank_id(), 0);
    }

    #[test]
    fn quiet_and_voiced_frames_get_opposite_blank_mass() {
        let sr = 8_000;
        let mut samples = vec![0.0_f32; sr / 10];
        samples.extend((0..sr / 10).map(|i| {
            0.3 * (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sr as f32).sin()
        }));

        let emission = backend().emit(&samples, sr as u32).expect("emits");
        assert_eq!(emission.frames(), 10);
        assert_eq!(emission.classes(), 28);

        let quiet = &emission.log_probs[0];
        let voiced = &emission.log_probs[9];
        assert!((quiet[0] - 0.9_f32.ln()).abs() < 1e-6);
        assert!((voiced[0] - 0.1_f32.ln()).abs() < 1e-6);
        assert!(voiced[2] > quiet[2]);
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let err = backend().emit(&[0.1, 0.2], 0).expect_err("rejects");
        assert!(matches!(err, AlignError::InvalidInput { .. }));
    }
}
