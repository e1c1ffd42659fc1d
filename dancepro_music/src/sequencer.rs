// Sequencer position and playback liveness, carried across mapping calls.
//
// `SequencerState` is owned by exactly one `Engine` and mutated only through
// the methods below, in this order per call:
//
//   gate()    decide whether this call starts a run, advances, or holds
//   restart() on a start: back to section A, measure 0, beat 0
//   record()  after the event is built: remember its time and pitch
//   advance() step one beat, rolling into the next measure / wrapping the piece
//
// States are `Idle` (`active == false`) and `Running`. Idle -> Running
// happens on the first call, on the first call after `deactivate()`, and
// on any call that arrives after the idle timeout or with a timestamp
// earlier than the last emitted event. Running -> Running happens when at
// least `min_spacing_ms` has passed since the last emitted event; sooner
// calls hold. There is no explicit stop: a stalled session is restarted by
// the idle check on its next call.
//
// Invariants maintained here:
// - `measure < TOTAL_MEASURES`, and `section == Section::for_measure(measure)`
// - `beat` is below the beat count of the current measure's rhythm
// - `last_note` is the last *sounding* note; rests do not overwrite it, so
//   the anti-repetition rule compares across a rest

use serde::{Deserialize, Serialize};

use crate::composition::{Section, TOTAL_MEASURES};
use crate::config::EngineConfig;
use crate::pitch::Note;

/// Why a call began a fresh run from the top of the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartReason {
    /// Nothing has been emitted yet.
    FirstCall,
    /// The previous session was ended explicitly.
    Resumed,
    /// Nothing was emitted for longer than the idle timeout.
    IdleTimeout,
    /// The sample clock went backwards past the last emitted event.
    ClockReset,
}

/// What a call is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Restart at A/0/0 and emit.
    Start(StartReason),
    /// Emit the event at the current position.
    Advance,
    /// Too soon after the previous event; emit nothing.
    Hold,
}

/// Where in the piece the next event falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub section: Section,
    pub measure: usize,
    pub beat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequencerState {
    last_event_ms: Option<u64>,
    last_note: Note,
    measure: usize,
    beat: usize,
    section: Section,
    active: bool,
}

impl SequencerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self, now_ms: u64, config: &EngineConfig) -> Gate {
        let Some(last) = self.last_event_ms else {
            return Gate::Start(StartReason::FirstCall);
        };
        if !self.active {
            return Gate::Start(StartReason::Resumed);
        }
        let Some(elapsed) = now_ms.checked_sub(last) else {
            return Gate::Start(StartReason::ClockReset);
        };
        if elapsed > config.idle_timeout_ms {
            Gate::Start(StartReason::IdleTimeout)
        } else if elapsed < config.min_spacing_ms {
            Gate::Hold
        } else {
            Gate::Advance
        }
    }

    /// Jump to the top of the piece and mark the sequencer running.
    pub fn restart(&mut self) {
        self.measure = 0;
        self.beat = 0;
        self.section = Section::A;
        self.active = true;
    }

    /// Mark the session over. Timing and the last note are kept.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn record(&mut self, note: Note, now_ms: u64) {
        self.last_event_ms = Some(now_ms);
        if !note.is_rest() {
            self.last_note = note;
        }
    }

    /// Step one beat within a measure of `beat_count` beats.
    pub fn advance(&mut self, beat_count: usize) {
        self.beat += 1;
        if self.beat >= beat_count {
            self.beat = 0;
            self.measure += 1;
            if self.measure >= TOTAL_MEASURES {
                self.measure = 0;
            }
            self.section = Section::for_measure(self.measure);
        }
    }

    pub fn position(&self) -> Position {
        Position {
            section: self.section,
            measure: self.measure,
            beat: self.beat,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_event_ms(&self) -> Option<u64> {
        self.last_event_ms
    }

    pub fn last_note(&self) -> Note {
        self.last_note
    }
}
