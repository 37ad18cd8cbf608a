use thiserror::Error;

/// Errors surfaced by the alignment pipeline.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("io failure while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("acoustic backend failed while {context}: {message}")]
    Backend {
        context: &'static str,
        message: String,
    },
}

impl AlignError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn backend(context: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            context,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = AlignError::io(
            "reading dictionary",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("reading dictionary"));

        let err = AlignError::invalid_input("transcript is empty");
        assert!(err.to_string().contains("transcript is empty"));

        let err = AlignError::backend("computing emissions", "model not loaded");
        assert!(err.to_string().contains("computing emissions"));
    }
}
