//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),

    #[error("Failed to parse story data: {0}")]
    StoryParse(String),

    #[error("Provider request failed: {0}")]
    ProviderRequest(String),

    #[error("Image generation not supported: {0}")]
    ImageGenerationUnsupported(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ProviderRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
