// The append-only event log and its wire format.
//
// Wire format: a JSON array of `{"n": <pitch id>, "t": <duration ms>}`
// objects, pitch id 0 meaning silence. No envelope, no timestamps, no
// version field; this is exactly the payload the transport serves.
//
// Two ways to accumulate events:
// - `EventLog`, an in-memory buffer the engine pushes records into. It is
//   serialized once, at the transport hand-off (`to_json`).
// - `append_json`, which appends one record to an already-serialized log.
//   It handles three input shapes: empty (or `[]`) starts a new array; a
//   well-formed array gets the record spliced in before its closing bracket
//   with every prior byte kept; anything else is logged and discarded, and
//   the array restarts with only the new record. Losing a corrupted prefix
//   is preferred over refusing to record the rest of the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::Result;
use crate::pitch::Note;

/// One emitted note or rest. Immutable once appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "n")]
    pub note: Note,
    #[serde(rename = "t")]
    pub duration_ms: u32,
}

impl EventRecord {
    pub fn new(note: Note, duration_ms: u32) -> Self {
        Self { note, duration_ms }
    }

    pub fn rest(duration_ms: u32) -> Self {
        Self::new(Note::Rest, duration_ms)
    }
}

/// Compact wire form, identical to the serde output.
impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"n\":{},\"t\":{}}}", self.note.id(), self.duration_ms)
    }
}

/// Ordered, append-only sequence of records for one recording session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EventRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Drop every record; used when a new recording session starts.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Summed duration of all records.
    pub fn total_duration_ms(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.duration_ms)).sum()
    }

    /// Serialize to the wire format.
    pub fn to_json(&self) -> String {
        let mut out = String::with_capacity(2 + self.records.len() * 20);
        out.push('[');
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&record.to_string());
        }
        out.push(']');
        out
    }

    /// Strict parse of the wire format.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<Vec<EventRecord>> for EventLog {
    fn from(records: Vec<EventRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Append `record` to a serialized log, returning the new serialized log.
pub fn append_json(previous: &str, record: &EventRecord) -> String {
    let trimmed = previous.trim();
    if trimmed.is_empty() {
        return format!("[{record}]");
    }
    match serde_json::from_str::<Vec<EventRecord>>(trimmed) {
        Ok(prior) if prior.is_empty() => format!("[{record}]"),
        Ok(_) => {
            // A successfully parsed array always ends in ']'.
            let body = &trimmed[..trimmed.len() - 1];
            format!("{body},{record}]")
        }
        Err(err) => {
            warn!(%err, len = previous.len(), "discarding malformed event log");
            format!("[{record}]")
        }
    }
}
