//! Domain error types.

/// Top-level error type for tribar.
#[derive(Debug, thiserror::Error)]
pub enum TribarError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("invalid config {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TribarError> for std::process::ExitCode {
    fn from(err: &TribarError) -> Self {
        let code: u8 = match err {
            TribarError::Io(_) => 1,
            TribarError::ConfigParse { .. }
            | TribarError::ConfigMissing { .. }
            | TribarError::ConfigInvalid { .. } => 2,
            TribarError::Data { .. } => 3,
            TribarError::InvalidInput { .. } | TribarError::InvalidConfig { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
