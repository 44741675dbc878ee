//! Crate error type.
//!
//! Only the resource-loading path (catalog, phrase banks, config files) can
//! fail. Per-turn decisions never return an error: "no suggestion" is `None`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestError {
    /// Filesystem failure while reading a resource file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON resource could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catalog parsed but violates a structural rule (duplicate id, value out of range...).
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Configuration or phrase bank is unusable.
    #[error("Configuration error: {0}")]
    Config(String),
}

// For command-boundary compatibility (`Result<T, String>`)
impl From<SuggestError> for String {
    fn from(e: SuggestError) -> String {
        e.to_string()
    }
}

pub type SuggestResult<T> = Result<T, SuggestError>;
