use std::path::PathBuf;

/// Errors that can occur in the text surface system.
#[derive(Debug, Clone)]
pub enum TextError {
    /// No rendering context was current when GPU resources had to be created.
    InvalidContext,

    /// A construction argument was out of range (zero-sized surface, texture too large).
    InvalidArgument(String),

    /// No font at all could be resolved for the requested name.
    FontNotFound(String),

    /// A font file was missing or could not be parsed.
    FontLoadFailure { path: PathBuf, reason: String },
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::InvalidContext => {
                write!(f, "No rendering context is current on this thread")
            }
            TextError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            TextError::FontNotFound(name) => write!(f, "No font available for '{}'", name),
            TextError::FontLoadFailure { path, reason } => {
                write!(f, "Failed to load font {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for TextError {}

/// Result type for text operations.
pub type TextResult<T> = Result<T, TextError>;
