//! Error types for vidlearn.

use thiserror::Error;

/// Library-level error type for vidlearn operations.
#[derive(Error, Debug)]
pub enum VidlearnError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Video service error: {0}")]
    VideoService(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Indexing failed: {0}")]
    Indexing(String),

    #[error("Transcript unavailable: {0}")]
    Transcript(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No video selected. Upload or select a video first.")]
    NoVideoSelected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for vidlearn operations.
pub type Result<T> = std::result::Result<T, VidlearnError>;
