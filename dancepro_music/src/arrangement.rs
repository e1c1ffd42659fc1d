// Beat arrangement: turning a table position into a concrete note.
//
// Given the sequencer position and the measure's plan from composition.rs,
// pick a chord tone and a duration before any sensor input is considered.
// Two layers:
//
// 1. Base chord-tone choice, by section:
//    - A:     beat mod 3 for the first 8 measures, beat mod 4 afterwards,
//             so the melody widens to the full chord halfway through
//    - B:     root on beat 0, chord tone 3 on beat 2, random elsewhere
//    - C:     chord tone 3 on beat 0, random elsewhere
//    - Outro: root on beat 0; from measure 44 climb the chord
//             (tone beat+1); random before that
//
// 2. Section accents on top of that choice:
//    - A:     downbeat of every fourth measure takes chord tone 3, held 5/3
//    - B:     odd sub-beats of syncopated measures jump to a random
//             high-scale tone; beat 3 of measures 23 and 31 takes the top
//             chord tone, held 5/3
//    - C:     the triplet beats of triplet measures take random high-scale
//             tones
//    - Outro: the last beat of the piece is a long high C
//
// Rest measures short-circuit all of this: their downbeat is silence for
// exactly one beat unit.

use crate::composition::{MeasurePlan, Rhythm, Section, TOTAL_MEASURES};
use crate::config::EngineConfig;
use crate::pitch::{C5, HIGH_SCALE, Note};
use crate::random::RandomSource;
use crate::sequencer::Position;

/// The table's choice for one beat, before sensor modulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBeat {
    pub note: Note,
    pub duration_ms: u32,
}

pub fn resolve_beat<R: RandomSource>(
    position: Position,
    plan: &MeasurePlan,
    config: &EngineConfig,
    rng: &mut R,
) -> ResolvedBeat {
    let Position {
        section,
        measure,
        beat,
    } = position;

    if plan.rest_on_downbeat && beat == 0 {
        return ResolvedBeat {
            note: Note::Rest,
            duration_ms: config.beat_unit_ms,
        };
    }

    let chord = plan.chord;
    let size = section.chord_size();
    let mut duration_ms = plan.rhythm.duration_ms(beat, config.beat_unit_ms);

    let index = match section {
        Section::A if measure < 8 => beat % 3,
        Section::A => beat % 4,
        Section::B => match beat {
            0 => 0,
            2 => 3,
            _ => rng.index(size),
        },
        Section::C if beat == 0 => 3usize.min(size - 1),
        Section::C => rng.index(size),
        Section::Outro if beat == 0 => 0,
        Section::Outro if measure >= 44 => (beat + 1).min(size - 1),
        Section::Outro => rng.index(size),
    };
    let mut pitch = chord.tone(index);

    match section {
        Section::A => {
            if measure % 4 == 3 && beat == 0 {
                pitch = chord.tone(3usize.min(size - 1));
                duration_ms = config.accent_ms();
            }
        }
        Section::B => {
            if plan.rhythm == Rhythm::Syncopated && beat % 2 == 1 {
                pitch = rng.choose(&HIGH_SCALE);
            }
            if (measure == 23 || measure == 31) && beat == 3 {
                pitch = chord.top();
                duration_ms = config.accent_ms();
            }
        }
        Section::C => {
            if plan.rhythm == Rhythm::Triplet && beat >= 1 {
                pitch = rng.choose(&HIGH_SCALE);
            }
        }
        Section::Outro => {
            if measure == TOTAL_MEASURES - 1 && beat + 1 == plan.rhythm.beat_count() {
                pitch = C5;
                duration_ms = config.beat_unit_ms.saturating_mul(10) / 3;
            }
        }
    }

    ResolvedBeat {
        note: Note::Pitch(pitch),
        duration_ms,
    }
}
