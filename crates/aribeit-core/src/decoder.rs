//! Analyzer payload decoding
//!
//! Turns the analyzer's JSON report into [`NormalizedMetadata`]. Only a
//! syntactically broken document (or one whose root is not an object) is an
//! error; every individual field falls back quietly when it is missing or
//! has the wrong type.

use crate::error::DecodeError;
use crate::metadata::NormalizedMetadata;
use crate::payload::{kind_name, ValueExt};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Title used when a program is reported without one
pub const UNKNOWN_TITLE: &str = "Unknown Title";

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const LOCAL_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Decode analyzer stdout into normalized metadata
pub fn decode(stdout: &str) -> Result<NormalizedMetadata, DecodeError> {
    let root: Value = serde_json::from_str(stdout.trim_start_matches('\u{feff}'))?;
    let root = match root {
        Value::Object(map) => map,
        other => return Err(DecodeError::NotAnObject(kind_name(&other))),
    };

    let mut metadata = NormalizedMetadata::default();

    if let Some(name) = root.object("channel").and_then(|c| c.non_empty_str("channel_name")) {
        metadata.tags.push(name.to_string());
    }

    let Some(program) = root.object("program") else {
        return Ok(metadata);
    };

    metadata.title = Some(program.str_field("title").unwrap_or(UNKNOWN_TITLE).to_string());
    metadata.description = Some(compose_description(program));
    metadata.start_date = program.str_field("start_time").and_then(parse_start_time);
    metadata.genres = program.array("genre").map(|g| map_genres(g)).unwrap_or_default();

    Ok(metadata)
}

/// Program description followed by every `detail` entry as a labelled block
fn compose_description(program: &Map<String, Value>) -> String {
    let mut description = program.str_or_empty("description").to_string();

    if let Some(detail) = program.object("detail") {
        for (label, text) in detail {
            description.push_str("\n\n【");
            description.push_str(label);
            description.push_str("】\n");
            description.push_str(text.as_str().unwrap_or(""));
        }
    }

    description
}

/// `major` or `major/middle` per entry; entries without a major genre are dropped
fn map_genres(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| {
            let major = entry.str_or_empty("major");
            if major.is_empty() {
                return None;
            }
            match entry.str_or_empty("middle") {
                "" => Some(major.to_string()),
                middle => Some(format!("{}/{}", major, middle)),
            }
        })
        .collect()
}

/// Parse an analyzer timestamp, keeping the wall-clock time it states.
///
/// Accepts RFC 3339, ISO-like `date[T ]time` with or without seconds,
/// fractions and offset, `/` date separators, and bare dates (midnight).
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in LOCAL_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
