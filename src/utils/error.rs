use thiserror::Error;

/// Errors raised while building an extractor.
///
/// Extraction itself never fails; only a broken dictionary or config can.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Invalid dictionary: {0}")]
    InvalidDictionary(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Dictionary load error: {0}")]
    DictionaryLoad(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
