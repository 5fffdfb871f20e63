//! Watch page inspection: find the embedded player response and pick a
//! caption track from it.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::{
    error::{Result, TranscriptError},
    types::CaptionTrack,
};

pub const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";
pub const CAPTION_TRACKS_POINTER: &str = "/captions/playerCaptionsTracklistRenderer/captionTracks";
pub const PREFERRED_LANGUAGE: &str = "en";

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").expect("script pattern is valid")
});

/// Strategy for pulling the embedded JSON blob out of a page.
pub trait BlobLocator {
    /// Raw JSON text of the blob, if the page carries one.
    fn locate<'a>(&self, html: &'a str) -> Option<&'a str>;
}

/// Finds the first inline script mentioning a marker and takes the text
/// between its first `{` and last `}`.
#[derive(Debug, Clone)]
pub struct ScriptMarkerLocator {
    marker: String,
}

impl ScriptMarkerLocator {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for ScriptMarkerLocator {
    fn default() -> Self {
        Self::new(PLAYER_RESPONSE_MARKER)
    }
}

impl BlobLocator for ScriptMarkerLocator {
    fn locate<'a>(&self, html: &'a str) -> Option<&'a str> {
        let script = script_bodies(html).find(|body| body.contains(self.marker.as_str()))?;
        let start = script.find('{')?;
        let end = script.rfind('}')?;
        if end < start {
            return None;
        }
        Some(&script[start..=end])
    }
}

/// Inline script contents in document order.
pub fn script_bodies(html: &str) -> impl Iterator<Item = &str> {
    SCRIPT_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Prefer manual English captions, otherwise take the first listed track.
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|track| track.language_code == PREFERRED_LANGUAGE && !track.is_auto_generated())
        .or_else(|| tracks.first())
}

pub fn caption_tracks(player_response: &Value) -> Result<Vec<CaptionTrack>> {
    let Some(list) = player_response.pointer(CAPTION_TRACKS_POINTER) else {
        return Err(TranscriptError::NoCaptions);
    };

    let tracks: Vec<CaptionTrack> = serde_json::from_value(list.clone()).map_err(|e| {
        tracing::warn!(error = %e, "caption track list has an unexpected shape");
        TranscriptError::NoCaptions
    })?;

    if tracks.is_empty() {
        return Err(TranscriptError::NoCaptions);
    }

    Ok(tracks)
}

pub struct PageInspector<L = ScriptMarkerLocator> {
    locator: L,
}

impl PageInspector {
    pub fn new() -> Self {
        Self::with_locator(ScriptMarkerLocator::default())
    }
}

impl Default for PageInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: BlobLocator> PageInspector<L> {
    pub fn with_locator(locator: L) -> Self {
        Self { locator }
    }

    pub fn player_response(&self, html: &str) -> Result<Value> {
        let blob = self.locator.locate(html).ok_or_else(|| {
            tracing::debug!("no script carries the player response marker");
            TranscriptError::DataNotFound
        })?;

        serde_json::from_str(blob).map_err(|e| {
            tracing::debug!(error = %e, "embedded player response is not valid JSON");
            TranscriptError::DataNotFound
        })
    }

    /// The caption track the transcript should be fetched from.
    pub fn inspect(&self, html: &str) -> Result<CaptionTrack> {
        let player_response = self.player_response(html)?;
        let tracks = caption_tracks(&player_response)?;

        let track = select_track(&tracks)
            .cloned()
            .ok_or(TranscriptError::NoCaptions)?;

        if track.source_url.is_empty() {
            tracing::warn!(track_id = %track.track_id, "selected caption track has no url");
            return Err(TranscriptError::NoCaptions);
        }

        tracing::info!(
            language = %track.language_code,
            track_id = %track.track_id,
            candidates = tracks.len(),
            "selected caption track"
        );

        Ok(track)
    }
}
