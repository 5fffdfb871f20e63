use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SummaryError, TranscriptError};

/// One caption track as listed in the player response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    #[serde(rename = "languageCode", default)]
    pub language_code: String,
    /// Opaque vendor id. Auto-generated tracks start with `.`.
    #[serde(rename = "vssId", default)]
    pub track_id: String,
    #[serde(rename = "baseUrl", default)]
    pub source_url: String,
}

impl CaptionTrack {
    pub fn is_auto_generated(&self) -> bool {
        self.track_id.starts_with('.')
    }
}

/// Flattened, whitespace-normalized transcript text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Reply to a "transcript for this page" request.
///
/// Serializes as exactly `{"transcript": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptResponse {
    Transcript { transcript: String },
    Error { error: String },
}

impl From<Result<Transcript, TranscriptError>> for TranscriptResponse {
    fn from(result: Result<Transcript, TranscriptError>) -> Self {
        match result {
            Ok(transcript) => TranscriptResponse::Transcript {
                transcript: transcript.text,
            },
            Err(err) => TranscriptResponse::Error {
                error: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    Summary(String),
    Failed(String),
}

impl From<Result<String, SummaryError>> for SummaryResult {
    fn from(result: Result<String, SummaryError>) -> Self {
        match result {
            Ok(text) => SummaryResult::Summary(text),
            Err(err) => SummaryResult::Failed(err.to_string()),
        }
    }
}
