// Shared store for the latest finished note payload.
//
// The recorder writes a payload once per session, when recording stops; a
// transport layer (the device's HTTP endpoint, or a test) reads it at any
// time from another thread. `NoteStore` is a cheap cloneable handle over a
// single mutex, and a payload is swapped in whole under that lock, so a
// reader sees either the previous payload or the new one, never a mix.
//
// Before the first session finishes the payload is `[]`, a valid empty log.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

/// The stored payload and when it was last replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNotes {
    /// Serialized event log.
    pub payload: String,
    /// Device clock at the last `replace`, `None` until then.
    pub updated_at_ms: Option<u64>,
}

impl Default for StoredNotes {
    fn default() -> Self {
        Self {
            payload: "[]".to_string(),
            updated_at_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    inner: Arc<Mutex<StoredNotes>>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new payload, returning the one it replaced.
    pub fn replace(&self, payload: String, now_ms: u64) -> String {
        let mut stored = self.inner.lock();
        debug!(bytes = payload.len(), now_ms, "replacing note payload");
        stored.updated_at_ms = Some(now_ms);
        std::mem::replace(&mut stored.payload, payload)
    }

    /// Copy of the current payload.
    pub fn latest(&self) -> String {
        self.inner.lock().payload.clone()
    }

    /// Copy of the payload together with its update time.
    pub fn snapshot(&self) -> StoredNotes {
        self.inner.lock().clone()
    }
}
