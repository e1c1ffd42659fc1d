// Sensor modulation: bending a resolved beat with the dancer's motion.
//
// Applied to every sounding beat after arrangement.rs has picked it, in a
// fixed order; rests pass through untouched.
//
//   1. tilt above `tilt_high_deg` and the note is high:
//        redraw from MID_SCALE
//   2. otherwise, tilt below `tilt_low_deg` and the note is mid or low:
//        redraw from HIGH_SCALE
//   3. angular rate above `fast_motion_dps` and the note is longer than a
//        beat: cut to two thirds of a beat
//   4. otherwise, angular rate below `slow_motion_dps` in the outro:
//        stretch by `outro_stretch_percent`
//   5. the pitch equals the previous sounding note: redraw from the
//        section's register (A mid, B and C high, outro either by coin
//        flip), excluding the previous note
//
// Rule 5 runs last so it sees the result of the tilt rules; the final pitch
// therefore never repeats the previous sounding note. Heading is derived
// upstream but no rule consumes it.

use tracing::trace;

use crate::arrangement::ResolvedBeat;
use crate::composition::Section;
use crate::config::EngineConfig;
use crate::event_log::EventRecord;
use crate::orientation::MotionReadings;
use crate::pitch::{HIGH_SCALE, MID_SCALE, Note, Register};
use crate::random::RandomSource;

/// The register anti-repetition redraws from in `section`.
fn repeat_register<R: RandomSource>(section: Section, rng: &mut R) -> Register {
    match section {
        Section::A => Register::Mid,
        Section::B | Section::C => Register::High,
        Section::Outro => {
            if rng.coin_flip() {
                Register::Mid
            } else {
                Register::High
            }
        }
    }
}

/// Apply the motion rules to `beat`, producing the event to emit.
pub fn modulate<R: RandomSource>(
    beat: ResolvedBeat,
    readings: &MotionReadings,
    section: Section,
    last_note: Note,
    config: &EngineConfig,
    rng: &mut R,
) -> EventRecord {
    let Note::Pitch(mut pitch) = beat.note else {
        return EventRecord::rest(beat.duration_ms);
    };
    let mut duration_ms = beat.duration_ms;

    if readings.tilt_deg > config.tilt_high_deg {
        if pitch.register() == Register::High {
            pitch = rng.choose(&MID_SCALE);
            trace!(tilt = readings.tilt_deg, to = pitch.hz(), "tilt pulled note down");
        }
    } else if readings.tilt_deg < config.tilt_low_deg && pitch.register() != Register::High {
        pitch = rng.choose(&HIGH_SCALE);
        trace!(tilt = readings.tilt_deg, to = pitch.hz(), "tilt lifted note up");
    }

    if readings.intensity_dps > config.fast_motion_dps {
        if duration_ms > config.beat_unit_ms {
            duration_ms = config.short_note_ms();
        }
    } else if readings.intensity_dps < config.slow_motion_dps && section == Section::Outro {
        duration_ms = duration_ms.saturating_mul(config.outro_stretch_percent) / 100;
    }

    if Note::Pitch(pitch) == last_note {
        let register = repeat_register(section, rng);
        pitch = rng.choose_excluding(register.scale(), pitch);
        trace!(to = pitch.hz(), ?register, "broke a repeated note");
    }

    EventRecord::new(Note::Pitch(pitch), duration_ms)
}
