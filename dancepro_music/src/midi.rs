// MIDI output from event logs.
//
// Converts an EventLog into a Standard MIDI File (SMF) so a recorded
// session can be auditioned in any player. Everything goes on one track,
// channel 0, at a fixed 120 BPM, so one quarter note is 500 ms and event
// durations convert to ticks directly. Rests emit nothing and simply push
// the next note-on later.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 0.

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

use crate::error::Result;
use crate::event_log::EventLog;
use crate::pitch::Note;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u32 = 480;

/// Microseconds per quarter note (120 BPM).
const TEMPO_MICROSECONDS: u32 = 500_000;

/// Milliseconds per quarter note at that tempo.
const MS_PER_QUARTER: u32 = TEMPO_MICROSECONDS / 1_000;

const CHANNEL: u8 = 0;
const VELOCITY: u8 = 90;

/// Convert a duration in milliseconds to ticks.
fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = u64::from(ms) * u64::from(TICKS_PER_QUARTER) / u64::from(MS_PER_QUARTER);
    // u28 max; a single event this long is not a real recording
    ticks.min(0x0FFF_FFFF) as u32
}

/// Convert an EventLog to MIDI and write to a file.
pub fn write_midi(log: &EventLog, path: &Path) -> Result<()> {
    let smf = log_to_smf(log);
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Convert an EventLog to an in-memory SMF.
pub fn log_to_smf(log: &EventLog) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER as u16)),
    ));

    let channel = u4::new(CHANNEL);
    let mut track: Track<'static> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(b"dancepro")),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(TEMPO_MICROSECONDS))),
        },
    ];

    // Ticks of silence accumulated since the last emitted MIDI event.
    let mut pending: u32 = 0;
    for record in log {
        let ticks = ms_to_ticks(record.duration_ms);
        match record.note {
            Note::Rest => pending = pending.saturating_add(ticks).min(0x0FFF_FFFF),
            Note::Pitch(pitch) => {
                let key = u7::new(pitch.midi_key());
                track.push(TrackEvent {
                    delta: u28::new(pending),
                    kind: TrackEventKind::Midi {
                        channel,
                        message: MidiMessage::NoteOn {
                            key,
                            vel: u7::new(VELOCITY),
                        },
                    },
                });
                track.push(TrackEvent {
                    delta: u28::new(ticks),
                    kind: TrackEventKind::Midi {
                        channel,
                        message: MidiMessage::NoteOff {
                            key,
                            vel: u7::new(0),
                        },
                    },
                });
                pending = 0;
            }
        }
    }

    track.push(TrackEvent {
        delta: u28::new(pending),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);
    smf
}
