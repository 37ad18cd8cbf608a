use std::path::Path;

use crate::error::FeatureError;

/// Read a WAV file as mono f32 samples in `[-1, 1]`, averaging channels.
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32), FeatureError> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| FeatureError::wav("opening file", e))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(FeatureError::invalid_input("WAV file reports 0 channels"));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| FeatureError::wav("reading float samples", e))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| FeatureError::wav("reading int samples", e))?
        }
    };

    let channels = spec.channels as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    tracing::debug!(
        sample_rate_hz = spec.sample_rate,
        channels,
        sample_count = samples.len(),
        "loaded WAV file"
    );
    Ok((samples, spec.sample_rate))
}
