// dancepro_session: recording sessions and payload hand-off for the
// DancePro note engine.
//
// The engine crate maps samples to events; this crate supplies the device
// flow around it. A single button starts and stops a recording, sensor
// polls are forwarded while recording, and the finished log is published
// to a store that a transport thread serves from.
//
// Module overview:
// - `recorder.rs`: `Recorder`, owning an `Engine` and the session's
//                  `EventLog`; start / poll / stop / toggle.
// - `store.rs`:    `NoteStore`, a cloneable mutex-guarded handle to the
//                  latest finished payload, safe to read from any thread.
//
// No networking here; whatever serves the payload holds a `NoteStore` clone.

pub mod recorder;
pub mod store;

pub use recorder::Recorder;
pub use store::{NoteStore, StoredNotes};
