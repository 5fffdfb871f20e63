//! ytdigest core library
//!
//! Caption discovery on YouTube watch pages, caption payload parsing and the
//! client for the summarization backend.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod page;
pub mod parse;
pub mod summary;
pub mod types;
pub mod video;

// Re-export commonly used items at crate root
pub use config::DigestConfig;
pub use error::{Result, SummaryError, TranscriptError};
pub use extract::TranscriptExtractor;
pub use fetch::TranscriptFetcher;
pub use page::{BlobLocator, PageInspector, ScriptMarkerLocator, select_track};
pub use parse::{TIERS, TranscriptStage, parse_transcript};
pub use summary::SummaryClient;
pub use types::{CaptionTrack, SummaryResult, Transcript, TranscriptResponse};
pub use video::{video_id_from_url, watch_video_id};
