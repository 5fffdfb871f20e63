use crate::{
    config::DigestConfig,
    error::{Result, TranscriptError},
    fetch::TranscriptFetcher,
    page::PageInspector,
    types::{Transcript, TranscriptResponse},
    video::watch_video_id,
};

/// Answers "give me the transcript of this page" requests.
pub struct TranscriptExtractor {
    config: DigestConfig,
    fetcher: TranscriptFetcher,
    inspector: PageInspector,
}

impl TranscriptExtractor {
    pub fn new(config: DigestConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self {
            config,
            fetcher: TranscriptFetcher::new(client),
            inspector: PageInspector::new(),
        })
    }

    /// Fetch the watch page behind `page_url` and pull its transcript.
    pub async fn extract(&self, page_url: &str) -> Result<Transcript> {
        let video_id = watch_video_id(page_url).ok_or(TranscriptError::NotVideoPage)?;
        let watch_url = self
            .config
            .watch_url(&video_id)
            .map_err(|e| TranscriptError::ProcessingError(e.to_string()))?;

        tracing::info!(%video_id, "inspecting watch page");
        let html = self.fetcher.fetch_text(&watch_url).await?;

        self.extract_from_html(&html).await
    }

    /// Run caption discovery on an already loaded page.
    pub async fn extract_from_html(&self, html: &str) -> Result<Transcript> {
        let track = self.inspector.inspect(html)?;
        self.fetcher.fetch_transcript(&track.source_url).await
    }

    /// [`Self::extract`] folded into the `{transcript}` / `{error}` reply.
    pub async fn respond(&self, page_url: &str) -> TranscriptResponse {
        let result = self.extract(page_url).await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, %page_url, "transcript extraction failed");
        }
        result.into()
    }
}
