//! Error types shared across Recut crates.

/// Errors raised while loading or saving the app configuration.
///
/// Live editing never produces errors: impossible edits are clamped or
/// become no-ops. Project files report through `ProjectError`.
#[derive(Debug, thiserror::Error)]
pub enum RecutError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using RecutError.
pub type RecutResult<T> = Result<T, RecutError>;

impl RecutError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
