use crate::types::{PostId, PostSummary};
use chrono::{DateTime, Utc};
use feed_rs::parser;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Upstream listings are newest-first; anything past this is old news.
pub const MAX_SUMMARIES: usize = 10;

/// Native timestamp layout used by the platform, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const NATIVE_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const TIMELINE_KEYS: [&str; 4] = ["timeline", "tweets", "data", "items"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// RSS or Atom
    Feed,
    /// JSON timeline with explicit id fields
    Json,
}

impl SourceFormat {
    pub fn infer_from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        let path = lower.split(['?', '#']).next().unwrap_or_default();
        if path.contains("rss") || path.ends_with(".xml") || path.ends_with(".atom") {
            SourceFormat::Feed
        } else {
            SourceFormat::Json
        }
    }
}

/// Turns a raw provider body into post summaries, newest first.
///
/// Never fails: a body that cannot be parsed simply yields no candidates,
/// which lets the chain move on to the next provider.
pub fn extract_post_ids(body: &str, format: SourceFormat) -> Vec<PostSummary> {
    let candidates = match format {
        SourceFormat::Feed => feed_candidates(body),
        SourceFormat::Json => json_candidates(body),
    };

    let mut seen = HashSet::new();
    let summaries: Vec<PostSummary> = candidates
        .into_iter()
        .filter(|summary| seen.insert(summary.id.clone()))
        .take(MAX_SUMMARIES)
        .collect();

    debug!("Extracted {} post ids ({:?})", summaries.len(), format);
    summaries
}

fn feed_candidates(body: &str) -> Vec<PostSummary> {
    let feed = match parser::parse(body.as_bytes()) {
        Ok(feed) => feed,
        Err(e) => {
            debug!("Feed body did not parse: {}", e);
            return Vec::new();
        }
    };

    feed.entries
        .into_iter()
        .filter_map(|entry| {
            let id = match entry.links.first() {
                Some(link) => PostId::from_permalink(&link.href),
                None => PostId::from_permalink(&entry.id),
            }?;
            Some(PostSummary {
                id,
                published_at: entry.published.or(entry.updated),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn to_post_id(&self) -> Option<PostId> {
        match self {
            RawId::Text(text) => PostId::parse(text),
            RawId::Number(number) => PostId::parse(&number.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimelineEntry {
    tweet_id: Option<RawId>,
    id_str: Option<RawId>,
    id: Option<RawId>,
    created_at: Option<String>,
}

impl TimelineEntry {
    fn into_summary(self) -> Option<PostSummary> {
        let id = [&self.tweet_id, &self.id_str, &self.id]
            .into_iter()
            .flatten()
            .find_map(RawId::to_post_id)?;
        let published_at = self.created_at.as_deref().and_then(parse_native_timestamp);
        Some(PostSummary { id, published_at })
    }
}

fn json_candidates(body: &str) -> Vec<PostSummary> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!("JSON body did not parse: {}", e);
            return Vec::new();
        }
    };

    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => TIMELINE_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<TimelineEntry>(entry).ok())
        .filter_map(TimelineEntry::into_summary)
        .collect()
}

/// Parses the platform's native date format, falling back to RFC 3339.
pub fn parse_native_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, NATIVE_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
