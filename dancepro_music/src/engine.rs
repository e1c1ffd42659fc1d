// The note engine: one orientation sample in, at most one event out.
//
// `Engine` owns the sequencer state, the config and the random source, and
// runs the per-call pipeline:
//
//   gate        hold if too soon; on a (re)start jump to A/0/0
//   readings    tilt, heading, intensity from the sample
//   lookup      chord and rhythm for the current measure
//   resolve     base chord tone and duration, with section accents
//   modulate    tilt / motion / anti-repetition rules
//   record      remember event time and last sounding note
//   advance     step the beat, rolling measures and wrapping the piece
//
// A held call changes nothing at all, not even the rng. Mapping never fails:
// bad sensor values flow through as NaN and fire no rule.
//
// Two entry points share the pipeline. `map_sample` pushes into an in-memory
// `EventLog`; `map_sample_json` appends to a serialized log and returns the
// new serialization, recovering from malformed input (see event_log.rs).

use dancepro_prng::SeqRng;
use tracing::{debug, trace};

use crate::arrangement::resolve_beat;
use crate::composition::lookup;
use crate::config::EngineConfig;
use crate::event_log::{EventLog, EventRecord, append_json};
use crate::modulator::modulate;
use crate::orientation::{MotionReadings, OrientationSample};
use crate::random::RandomSource;
use crate::sequencer::{Gate, SequencerState};

#[derive(Debug, Clone)]
pub struct Engine<R: RandomSource = SeqRng> {
    config: EngineConfig,
    state: SequencerState,
    rng: R,
}

impl Engine<SeqRng> {
    /// Engine on the default generator with the given seed.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::new(config, SeqRng::new(seed))
    }
}

impl<R: RandomSource> Engine<R> {
    pub fn new(config: EngineConfig, rng: R) -> Self {
        Self {
            config,
            state: SequencerState::new(),
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Go idle. The next emitted event starts the piece over from A/0/0.
    pub fn end_session(&mut self) {
        self.state.deactivate();
    }

    /// Run the pipeline for one sample without touching any log.
    pub fn step(&mut self, sample: &OrientationSample) -> Option<EventRecord> {
        let now = sample.timestamp_ms;
        match self.state.gate(now, &self.config) {
            Gate::Hold => return None,
            Gate::Advance => {}
            Gate::Start(reason) => {
                debug!(?reason, now, "starting piece from the top");
                self.state.restart();
            }
        }

        let position = self.state.position();
        let readings = MotionReadings::from_sample(sample);
        let plan = lookup(position.section, position.measure);
        let beat = resolve_beat(position, &plan, &self.config, &mut self.rng);
        let record = modulate(
            beat,
            &readings,
            position.section,
            self.state.last_note(),
            &self.config,
            &mut self.rng,
        );

        trace!(
            section = ?position.section,
            measure = position.measure,
            beat = position.beat,
            tilt = readings.tilt_deg,
            heading = readings.heading_deg,
            intensity = readings.intensity_dps,
            note = record.note.id(),
            duration = record.duration_ms,
            "emit"
        );

        self.state.record(record.note, now);
        self.state.advance(plan.rhythm.beat_count());
        Some(record)
    }

    /// Map one sample, appending any emitted event to `log`.
    pub fn map_sample(
        &mut self,
        sample: &OrientationSample,
        log: &mut EventLog,
    ) -> Option<EventRecord> {
        let record = self.step(sample)?;
        log.push(record);
        Some(record)
    }

    /// Map one sample against a serialized log and return the new
    /// serialization. A held call returns `previous` unchanged.
    pub fn map_sample_json(&mut self, sample: &OrientationSample, previous: &str) -> String {
        match self.step(sample) {
            Some(record) => append_json(previous, &record),
            None => previous.to_string(),
        }
    }
}
