use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Text cannot be empty")]
    EmptyInput,

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Upstream error (status {status}): {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Upstream model did not become ready within {elapsed:?}")]
    UpstreamTimeout { elapsed: Duration },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Transcripts are disabled: {0}")]
    TranscriptsDisabled(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True for faults caused by the caller's input rather than by upstream services.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::InvalidFileType(_)
                | Error::InvalidInput(_)
                | Error::InvalidUrl(_)
                | Error::Pdf(_)
        )
    }
}
