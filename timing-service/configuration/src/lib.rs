//! Service configuration: serde defaults, an optional TOML file, and
//! `TIMING_SERVICE_`-prefixed environment overrides for the handful of
//! values that change between deployments.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vocal_align::AlignerConfig;
use vocal_features::StructureConfig;

/// Environment variable naming the TOML file to load.
pub const CONFIG_PATH_VAR: &str = "TIMING_SERVICE_CONFIG";

pub type AppConfig = TimingConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {message}")]
    InvalidOverride { var: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub logging: LoggingConfig,
    pub timing: TimingRuntimeConfig,
    pub aligner: AlignerConfig,
    pub structure: StructureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter; `RUST_LOG` still wins when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingRuntimeConfig {
    /// Sample rate assumed when a request does not carry one.
    pub default_sample_rate_hz: u32,
    /// Optional CMU-format dictionary layered over the built-in lexicon.
    pub dictionary_path: Option<String>,
    /// Device label handed to the emission backend.
    pub device: String,
    /// Thread budget handed to the emission backend; `None` lets it decide.
    pub intra_op_threads: Option<usize>,
}

impl Default for TimingRuntimeConfig {
    fn default() -> Self {
        Self {
            default_sample_rate_hz: 16_000,
            dictionary_path: None,
            device: "cpu".to_string(),
            intra_op_threads: None,
        }
    }
}

/// Load configuration: defaults, then the TOML file named by
/// [`CONFIG_PATH_VAR`] (if any), then environment overrides.
///
/// An unset [`CONFIG_PATH_VAR`] means defaults; a set one naming an
/// unreadable file is an error, since the operator asked for that file.
pub fn load_config() -> Result<TimingConfig, ConfigError> {
    let mut config = match env::var(CONFIG_PATH_VAR) {
        Ok(path) => load_from_file(Path::new(&path))?,
        Err(_) => TimingConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

pub fn load_from_file(path: &Path) -> Result<TimingConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded configuration file");
    Ok(config)
}

fn apply_env_overrides(config: &mut TimingConfig) -> Result<(), ConfigError> {
    if let Ok(level) = env::var("TIMING_SERVICE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(rate) = env::var("TIMING_SERVICE_SAMPLE_RATE_HZ") {
        config.timing.default_sample_rate_hz =
            rate.parse().map_err(|_| ConfigError::InvalidOverride {
                var: "TIMING_SERVICE_SAMPLE_RATE_HZ".to_string(),
                message: format!("`{rate}` is not a valid sample rate"),
            })?;
    }
    if let Ok(device) = env::var("TIMING_SERVICE_DEVICE") {
        config.timing.device = device;
    }
    if let Ok(path) = env::var("TIMING_SERVICE_DICTIONARY_PATH") {
        config.timing.dictionary_path = Some(path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_usable_without_any_file() {
        let config = TimingConfig::default();
        assert_eq!(config.timing.default_sample_rate_hz, 16_000);
        assert_eq!(config.timing.device, "cpu");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.aligner.chunking.max_chunk_s, 30.0);
        assert_eq!(config.structure.hop, 4096);
    }

    #[test]
    fn toml_file_overrides_selected_fields_only() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[timing]\ndefault_sample_rate_hz = 44100\n\n[aligner.refine]\nmin_vowel_share = 0.5\n"
        )
        .expect("write config");

        let config = load_from_file(file.path()).expect("parses");
        assert_eq!(config.timing.default_sample_rate_hz, 44_100);
        assert_eq!(config.aligner.refine.min_vowel_share, 0.5);
        // Untouched sections keep their defaults.
        assert_eq!(config.aligner.chunking.max_chunk_s, 30.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_from_file(Path::new("/nonexistent/timing.toml")).expect_err("fails");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "timing = \"not a table\"").expect("write config");
        let err = load_from_file(file.path()).expect_err("fails");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn full_config_round_trips_through_toml() {
        let config = TimingConfig::default();
        let text = toml::to_string(&config).expect("serializes");
        let back: TimingConfig = toml::from_str(&text).expect("parses");
        assert_eq!(
            back.timing.default_sample_rate_hz,
            config.timing.default_sample_rate_hz
        );
        assert_eq!(back.aligner.refine.min_vowel_share, 0.35);
    }
}
