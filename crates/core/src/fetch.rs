use reqwest::Client;

use crate::{
    error::{Result, TranscriptError},
    parse::{TranscriptStage, parse_transcript},
    types::Transcript,
};

/// Retrieves caption payloads and turns them into transcripts.
#[derive(Clone)]
pub struct TranscriptFetcher {
    client: Client,
}

impl TranscriptFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and return the body of a successful response.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!(stage = %TranscriptStage::Fetching, %url, "requesting");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "request failed");
            return Err(TranscriptError::NetworkError {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch a caption track and run the payload through the parsing tiers.
    pub async fn fetch_transcript(&self, source_url: &str) -> Result<Transcript> {
        let body = self.fetch_text(source_url).await?;
        parse_transcript(&body)
    }
}
