use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("WAV decode error while {context}: {message}")]
    Wav {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl FeatureError {
    pub(crate) fn wav(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Wav {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
