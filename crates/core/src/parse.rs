//! Caption payload parsing.
//!
//! A payload's format is not known up front, so it is run through an ordered
//! list of tiers (JSON events, XML markup, raw text). The first tier that
//! yields non-empty text wins.

use std::{fmt, sync::LazyLock};

use quick_xml::{Reader, events::Event};
use regex::Regex;
use serde::Deserialize;

use crate::{
    error::{Result, TranscriptError},
    types::Transcript,
};

/// Element whose text content carries the captions in markup payloads.
pub const TEXT_ELEMENT: &[u8] = b"text";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptStage {
    Fetching,
    ParsingJson,
    ParsingMarkup,
    ParsingRaw,
}

impl fmt::Display for TranscriptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TranscriptStage::Fetching => "fetching",
            TranscriptStage::ParsingJson => "parsing_json",
            TranscriptStage::ParsingMarkup => "parsing_markup",
            TranscriptStage::ParsingRaw => "parsing_raw",
        };
        f.write_str(name)
    }
}

/// A parsing tier returns normalized, non-empty text or nothing.
pub type Tier = fn(&str) -> Option<String>;

pub const TIERS: [(TranscriptStage, Tier); 3] = [
    (TranscriptStage::ParsingJson, parse_json_events),
    (TranscriptStage::ParsingMarkup, parse_markup),
    (TranscriptStage::ParsingRaw, parse_raw),
];

/// Run the tiers in order and stop at the first one producing text.
pub fn parse_transcript(body: &str) -> Result<Transcript> {
    for (stage, tier) in TIERS {
        tracing::debug!(%stage, bytes = body.len(), "trying transcript tier");
        if let Some(text) = tier(body) {
            tracing::info!(%stage, chars = text.chars().count(), "transcript parsed");
            return Ok(Transcript::new(text));
        }
    }

    tracing::warn!(bytes = body.len(), "no tier recognized the caption payload");
    Err(TranscriptError::UnrecognizedFormat)
}

#[derive(Deserialize)]
struct EventsPayload {
    events: Vec<CaptionEvent>,
}

#[derive(Deserialize)]
struct CaptionEvent {
    segs: Option<Vec<CaptionSegment>>,
}

#[derive(Deserialize)]
struct CaptionSegment {
    utf8: Option<String>,
}

/// `{"events": [{"segs": [{"utf8": ...}]}]}` payloads.
pub fn parse_json_events(body: &str) -> Option<String> {
    let payload: EventsPayload = serde_json::from_str(body).ok()?;

    let joined = payload
        .events
        .iter()
        .filter_map(|event| event.segs.as_ref())
        .map(|segs| {
            segs.iter()
                .filter_map(|seg| seg.utf8.as_deref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ");

    non_empty(normalize_whitespace(&joined))
}

/// XML documents with the captions in `<text>` elements.
///
/// Only well-formed documents count: text outside the root element, a second
/// root or elements left open at the end make this tier decline.
pub fn parse_markup(body: &str) -> Option<String> {
    let mut reader = Reader::from_str(body);
    let mut parts: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut depth: usize = 0;
    let mut root_closed = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 && root_closed {
                    return declined("more than one root element");
                }
                depth += 1;
                if e.name().as_ref() == TEXT_ELEMENT {
                    open.push(parts.len());
                    parts.push(String::new());
                }
            }
            Ok(Event::Empty(_)) => {
                if depth == 0 {
                    if root_closed {
                        return declined("more than one root element");
                    }
                    root_closed = true;
                }
            }
            Ok(Event::End(e)) => {
                if depth == 0 {
                    return declined("closing tag without an open element");
                }
                if e.name().as_ref() == TEXT_ELEMENT {
                    open.pop();
                }
                depth -= 1;
                if depth == 0 {
                    root_closed = true;
                }
            }
            Ok(Event::Text(t)) => {
                if depth == 0 {
                    if t.iter().any(|b| !b.is_ascii_whitespace()) {
                        return declined("text outside the root element");
                    }
                    continue;
                }
                if open.is_empty() {
                    continue;
                }
                let text = match t.unescape() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::debug!(error = %e, "markup text could not be unescaped");
                        return None;
                    }
                };
                for &i in &open {
                    parts[i].push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if depth == 0 {
                    return declined("character data outside the root element");
                }
                let text = String::from_utf8_lossy(&c);
                for &i in &open {
                    parts[i].push_str(&text);
                }
            }
            Ok(Event::Eof) => {
                if depth > 0 {
                    return declined("elements left open at end of input");
                }
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    position = reader.buffer_position(),
                    "payload is not well-formed markup"
                );
                return None;
            }
        }
    }

    let joined = parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    non_empty(normalize_whitespace(&decode_entities(&joined)))
}

/// Last resort: strip anything tag-shaped and keep the rest.
pub fn parse_raw(body: &str) -> Option<String> {
    let stripped = TAG_RE.replace_all(body, " ");
    non_empty(normalize_whitespace(&decode_entities(&stripped)))
}

/// Decode the entities caption payloads commonly leave escaped.
pub fn decode_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn declined(reason: &str) -> Option<String> {
    tracing::debug!(reason, "payload is not a single well-formed document");
    None
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}
