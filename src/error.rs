use std::path::PathBuf;
use thiserror::Error;

/// Stray's error types. Anything that escapes the library boundary is one of
/// these; per-file trouble during a scan never surfaces here, it is logged and
/// counted instead.
#[derive(Debug, Error)]
pub enum StrayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filename filter '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("Invalid signature pattern '{pattern}': {message}")]
    InvalidSignature { pattern: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, StrayError>;

impl StrayError {
    pub fn invalid_filter<S1: Into<String>, S2: Into<String>>(pattern: S1, message: S2) -> Self {
        Self::InvalidFilter { pattern: pattern.into(), message: message.into() }
    }

    pub fn invalid_signature<S1: Into<String>, S2: Into<String>>(pattern: S1, message: S2) -> Self {
        Self::InvalidSignature { pattern: pattern.into(), message: message.into() }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn path_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    pub fn not_a_directory<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    /// Returns true when the error means the caller handed us bad settings
    /// rather than the scan itself going wrong.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::InvalidFilter { .. } | Self::InvalidSignature { .. }
        )
    }
}
