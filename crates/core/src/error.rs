use thiserror::Error;

/// Failures of the transcript extraction pipeline.
///
/// The display strings are what the caller shows to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Not a YouTube video page.")]
    NotVideoPage,

    #[error("Error: Transcript data not found on page.")]
    DataNotFound,

    #[error("Error: No captions available for this video.")]
    NoCaptions,

    #[error("Network response was not ok, status: {status}")]
    NetworkError { status: u16 },

    #[error("Could not parse transcript. The format is not recognized.")]
    UnrecognizedFormat,

    #[error("Failed to process transcript: {0}")]
    ProcessingError(String),
}

impl From<reqwest::Error> for TranscriptError {
    fn from(err: reqwest::Error) -> Self {
        TranscriptError::ProcessingError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("{message}")]
    Backend { message: String },

    #[error("Failed to connect to the backend server. Is it running? ({0})")]
    Connect(#[from] reqwest::Error),

    #[error("Failed to set up the HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Invalid backend response: {reason}")]
    InvalidResponse { reason: String },
}

pub type Result<T> = std::result::Result<T, TranscriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_carries_status() {
        let err = TranscriptError::NetworkError { status: 404 };
        assert_eq!(err.to_string(), "Network response was not ok, status: 404");
    }

    #[test]
    fn processing_error_wraps_message() {
        let err = TranscriptError::ProcessingError("connection reset".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to process transcript: connection reset"
        );
    }
}
