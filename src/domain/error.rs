//! Domain error types.
//!
//! Fatal errors only. Recoverable, reported conditions live in
//! [`crate::domain::condition`] and never abort a run.

/// Top-level error type for smacross.
#[derive(Debug, thiserror::Error)]
pub enum SmacrossError {
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

    #[error("malformed price data: {reason}")]
    Data { reason: String },

    #[error("no price data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SmacrossError> for std::process::ExitCode {
    fn from(err: &SmacrossError) -> Self {
        let code: u8 = match err {
            SmacrossError::Io(_) => 1,
            SmacrossError::ConfigParse { .. }
            | SmacrossError::ConfigMissing { .. }
            | SmacrossError::ConfigInvalid { .. } => 2,
            SmacrossError::Data { .. } => 3,
            SmacrossError::NoData { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
