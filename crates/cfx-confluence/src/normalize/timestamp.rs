//! ISO-8601 timestamp parsing for server documents.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use super::document::{Document, Extracted};
use crate::types::Timestamp;

/// Layouts accepted for timestamps without an offset (read as UTC).
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp as sent by Confluence.
///
/// A trailing `Z` is rewritten to `+00:00` before parsing. Timestamps
/// without an offset are taken as UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = match raw.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_owned(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed);
    }

    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(&normalized, format)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// Extract a timestamp field. Empty strings count as absent.
pub(crate) fn timestamp_at(doc: Document<'_>) -> Extracted<Timestamp> {
    match doc.raw() {
        None => Extracted::Absent,
        Some(Value::String(s)) if s.trim().is_empty() => Extracted::Absent,
        Some(Value::String(s)) => {
            parse_timestamp(s).map_or_else(|| Extracted::Malformed(s.clone()), Extracted::Value)
        }
        Some(other) => Extracted::Malformed(other.to_string()),
    }
}
