//! Domain error types.

/// Top-level error type for sto.
#[derive(Debug, thiserror::Error)]
pub enum StoError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid price input at index {index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    #[error("price file error: {reason}")]
    PriceFile { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoError {
    pub fn invalid_input(index: usize, reason: impl Into<String>) -> Self {
        StoError::InvalidInput {
            index,
            reason: reason.into(),
        }
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            StoError::Io(_) | StoError::PriceFile { .. } => 1,
            StoError::ConfigParse { .. } | StoError::ConfigInvalid { .. } => 2,
            StoError::InvalidInput { .. } => 4,
        }
    }
}

impl From<&StoError> for std::process::ExitCode {
    fn from(err: &StoError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
