// DancePro Note Engine
//
// Turns a stream of wrist-worn orientation samples into a note sequence that
// follows a fixed 48-measure composition (sections A, B, C and an outro),
// with the dancer's tilt and movement speed bending pitch register and note
// length. Each call consumes one sample and emits at most one event; events
// accumulate in a log that is served to a companion app as JSON.
//
// Architecture:
// - pitch.rs: Frequency-identified pitches, registers, the mid and high scales
// - composition.rs: Sections, chord progressions, rhythm patterns, rest measures
// - orientation.rs: Sensor sample type and the tilt / heading / intensity scalars
// - random.rs: Injectable random source (seeded PRNG or scripted picks)
// - sequencer.rs: Position and Idle/Running state, spacing and idle gates
// - arrangement.rs: Chord-tone and duration choice per beat, section accents
// - modulator.rs: Sensor rules (register flips, duration changes, anti-repeat)
// - engine.rs: The per-sample pipeline and its two entry points
// - event_log.rs: Event records, the in-memory log, JSON append with recovery
// - config.rs: Tunable timing constants and thresholds
// - midi.rs: MIDI file output from event logs
// - error.rs: Error type for config loading, log parsing, file output
//
// The engine is deterministic given a seed and a timestamped sample stream.

pub mod arrangement;
pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod event_log;
pub mod midi;
pub mod modulator;
pub mod orientation;
pub mod pitch;
pub mod random;
pub mod sequencer;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use event_log::{EventLog, EventRecord, append_json};
pub use orientation::{MotionReadings, OrientationSample, Vec3};
pub use pitch::{Note, Pitch};
pub use random::{RandomSource, ScriptedSource};
