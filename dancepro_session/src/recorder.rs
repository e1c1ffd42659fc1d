// Recording sessions: the single-button start/stop flow around the engine.
//
// The wrist unit has one button on its recording page. Pressing it while
// idle starts a session; pressing it again stops it. While a session runs,
// every sensor poll is handed to the engine, whose events accumulate in the
// session's `EventLog`. Stopping serializes the log and swaps it into the
// `NoteStore`, where the transport picks it up.
//
// Starting a session clears the log and ends the engine's previous run, so
// the first polled sample always begins at section A, measure 0, beat 0 no
// matter how recently the last session ended. Polls while not recording
// are ignored and do not touch the engine.

use dancepro_music::random::RandomSource;
use dancepro_music::{Engine, EventLog, EventRecord, OrientationSample};
use dancepro_prng::SeqRng;
use tracing::info;

use crate::store::NoteStore;

pub struct Recorder<R: RandomSource = SeqRng> {
    engine: Engine<R>,
    log: EventLog,
    store: NoteStore,
    /// Device clock when the current session started; `None` when idle.
    started_at_ms: Option<u64>,
}

impl<R: RandomSource> Recorder<R> {
    pub fn new(engine: Engine<R>, store: NoteStore) -> Self {
        Self {
            engine,
            log: EventLog::new(),
            store,
            started_at_ms: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Begin a session. Restarting a running session discards its events.
    pub fn start(&mut self, now_ms: u64) {
        self.log.clear();
        self.engine.end_session();
        self.started_at_ms = Some(now_ms);
        info!(now_ms, "recording started");
    }

    /// Feed one sensor sample. Returns the emitted event, if any.
    pub fn poll(&mut self, sample: &OrientationSample) -> Option<EventRecord> {
        if !self.is_recording() {
            return None;
        }
        self.engine.map_sample(sample, &mut self.log)
    }

    /// End the session and publish its log. Returns the number of events
    /// published, or `None` if no session was running.
    pub fn stop(&mut self, now_ms: u64) -> Option<usize> {
        let started = self.started_at_ms.take()?;
        self.engine.end_session();
        let events = self.log.len();
        self.store.replace(self.log.to_json(), now_ms);
        info!(
            events,
            elapsed_ms = now_ms.saturating_sub(started),
            "recording stopped"
        );
        Some(events)
    }

    /// The button: start when idle, stop when recording. Returns whether a
    /// session is running afterwards.
    pub fn toggle(&mut self, now_ms: u64) -> bool {
        if self.is_recording() {
            self.stop(now_ms);
        } else {
            self.start(now_ms);
        }
        self.is_recording()
    }

    /// Time since the session started, or `None` when idle.
    pub fn elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        self.started_at_ms.map(|start| now_ms.saturating_sub(start))
    }

    /// Events of the current (or last stopped) session.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dancepro_music::{EngineConfig, Vec3};

    fn sample(timestamp_ms: u64) -> OrientationSample {
        OrientationSample {
            timestamp_ms,
            accel: Vec3::new(0.643, 0.0, 0.766),
            gyro: Vec3::new(100.0, 0.0, 0.0),
            ..Default::default()
        }
    }

    fn recorder() -> Recorder {
        Recorder::new(
            Engine::with_seed(EngineConfig::default(), 11),
            NoteStore::new(),
        )
    }

    #[test]
    fn idle_polls_are_ignored() {
        let mut rec = recorder();
        assert!(rec.poll(&sample(0)).is_none());
        assert!(rec.log().is_empty());
        assert_eq!(rec.engine().state().last_event_ms(), None);
    }

    #[test]
    fn toggle_flips_recording() {
        let mut rec = recorder();
        assert!(rec.toggle(0));
        assert!(rec.is_recording());
        assert!(!rec.toggle(1_000));
        assert!(!rec.is_recording());
    }

    #[test]
    fn elapsed_tracks_session_clock() {
        let mut rec = recorder();
        assert_eq!(rec.elapsed_ms(500), None);
        rec.start(1_000);
        assert_eq!(rec.elapsed_ms(4_250), Some(3_250));
        rec.stop(5_000);
        assert_eq!(rec.elapsed_ms(6_000), None);
    }

    #[test]
    fn stop_without_start_publishes_nothing() {
        let mut rec = recorder();
        assert_eq!(rec.stop(10), None);
        assert_eq!(rec.store().snapshot().updated_at_ms, None);
    }

    #[test]
    fn stop_publishes_log() {
        let mut rec = recorder();
        rec.start(0);
        for i in 0..5 {
            rec.poll(&sample(i * 300));
        }
        assert_eq!(rec.stop(2_000), Some(5));
        assert_eq!(rec.store().latest(), rec.log().to_json());
        // polling after stop records nothing
        assert!(rec.poll(&sample(3_000)).is_none());
        assert_eq!(rec.log().len(), 5);
    }
}
