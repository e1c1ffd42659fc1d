// The fixed composition template: sections, chord progressions, rhythms.
//
// A piece is 48 measures long and wraps around forever:
//
//   A      measures  0..16   4-note chords, low/mid register
//   B      measures 16..32   5-note chords reaching into the high register
//   C      measures 32..40
//   Outro  measures 40..48   ends on a ritardando measure
//
// Each section owns an ordered progression of chords and an ordered list of
// rhythm patterns, one entry per measure slot, indexed by the measure's
// offset into the section. Rhythm patterns are stored as multiples of the
// base beat unit so a different unit (see config.rs) rescales every pattern
// uniformly.
//
// A fixed list of absolute measures are "rest measures": beat 0 of those
// measures is silence for exactly one beat unit.
//
// Everything in this module is a pure lookup. Chord-tone selection and the
// per-section accents that consume these tables live in arrangement.rs.

use serde::{Deserialize, Serialize};

use crate::pitch::{A3, A4, B3, B4, C4, C5, D4, E4, E5, F3, F4, G3, G4, Pitch};

/// Length of the whole piece in measures.
pub const TOTAL_MEASURES: usize = 48;

/// Absolute measure indices whose first beat is a rest.
pub const REST_MEASURES: [usize; 6] = [7, 15, 23, 31, 35, 39];

/// One of the four macro sections of the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Section {
    #[default]
    A,
    B,
    C,
    Outro,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::A, Section::B, Section::C, Section::Outro];

    /// The section an absolute measure index falls in. Indices past the end
    /// of the piece are treated as the outro.
    pub fn for_measure(measure: usize) -> Section {
        match measure {
            0..16 => Section::A,
            16..32 => Section::B,
            32..40 => Section::C,
            _ => Section::Outro,
        }
    }

    /// First absolute measure of this section.
    pub fn first_measure(self) -> usize {
        match self {
            Section::A => 0,
            Section::B => 16,
            Section::C => 32,
            Section::Outro => 40,
        }
    }

    /// Number of measures in this section.
    pub fn measure_count(self) -> usize {
        match self {
            Section::A | Section::B => 16,
            Section::C | Section::Outro => 8,
        }
    }

    /// Chord tones available per chord in this section.
    pub fn chord_size(self) -> usize {
        match self {
            Section::A => 4,
            Section::B | Section::C | Section::Outro => 5,
        }
    }

    /// Chord per measure slot.
    pub fn progression(self) -> &'static [Chord] {
        match self {
            Section::A => &A_PROGRESSION,
            Section::B => &B_PROGRESSION,
            Section::C => &C_PROGRESSION,
            Section::Outro => &OUTRO_PROGRESSION,
        }
    }

    /// Rhythm pattern per measure slot.
    pub fn rhythms(self) -> &'static [Rhythm] {
        match self {
            Section::A => &A_RHYTHMS,
            Section::B => &B_RHYTHMS,
            Section::C => &C_RHYTHMS,
            Section::Outro => &OUTRO_RHYTHMS,
        }
    }
}

/// A named set of chord tones, lowest first. Index 0 is the root.
#[derive(Debug, PartialEq, Eq)]
pub struct Chord {
    pub name: &'static str,
    pub tones: &'static [Pitch],
}

impl Chord {
    pub fn root(&self) -> Pitch {
        self.tones[0]
    }

    /// Highest chord tone.
    pub fn top(&self) -> Pitch {
        self.tones[self.tones.len() - 1]
    }

    /// Chord tone by index, wrapping cyclically.
    pub fn tone(&self, index: usize) -> Pitch {
        self.tones[index % self.tones.len()]
    }
}

const C_MAJOR: Chord = Chord {
    name: "C",
    tones: &[C4, E4, G4, C5],
};
const G_MAJOR: Chord = Chord {
    name: "G",
    tones: &[G3, B3, D4, G4],
};
const A_MINOR: Chord = Chord {
    name: "Am",
    tones: &[A3, C4, E4, A4],
};
const F_MAJOR: Chord = Chord {
    name: "F",
    tones: &[F3, A3, C4, F4],
};

const C_MAJOR_WIDE: Chord = Chord {
    name: "C",
    tones: &[C4, E4, G4, C5, E5],
};
const G_MAJOR_WIDE: Chord = Chord {
    name: "G",
    tones: &[G3, B3, D4, G4, B4],
};
const A_MINOR_WIDE: Chord = Chord {
    name: "Am",
    tones: &[A3, C4, E4, A4, C5],
};
const F_MAJOR_WIDE: Chord = Chord {
    name: "F",
    tones: &[F3, A3, C4, F4, A4],
};

#[rustfmt::skip]
static A_PROGRESSION: [Chord; 16] = [
    C_MAJOR, G_MAJOR, A_MINOR, F_MAJOR,
    C_MAJOR, G_MAJOR, A_MINOR, F_MAJOR,
    C_MAJOR, G_MAJOR, A_MINOR, F_MAJOR,
    C_MAJOR, G_MAJOR, A_MINOR, F_MAJOR,
];

#[rustfmt::skip]
static B_PROGRESSION: [Chord; 16] = [
    F_MAJOR_WIDE, C_MAJOR_WIDE, G_MAJOR_WIDE, A_MINOR_WIDE,
    F_MAJOR_WIDE, C_MAJOR_WIDE, G_MAJOR_WIDE, A_MINOR_WIDE,
    F_MAJOR_WIDE, C_MAJOR_WIDE, G_MAJOR_WIDE, A_MINOR_WIDE,
    F_MAJOR_WIDE, C_MAJOR_WIDE, G_MAJOR_WIDE, A_MINOR_WIDE,
];

#[rustfmt::skip]
static C_PROGRESSION: [Chord; 8] = [
    C_MAJOR_WIDE, A_MINOR_WIDE, F_MAJOR_WIDE, G_MAJOR_WIDE,
    C_MAJOR_WIDE, A_MINOR_WIDE, F_MAJOR_WIDE, G_MAJOR_WIDE,
];

#[rustfmt::skip]
static OUTRO_PROGRESSION: [Chord; 8] = [
    F_MAJOR_WIDE, G_MAJOR_WIDE, A_MINOR_WIDE, C_MAJOR_WIDE,
    F_MAJOR_WIDE, G_MAJOR_WIDE, A_MINOR_WIDE, C_MAJOR_WIDE,
];

/// A fixed sequence of beat durations, expressed against the beat unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rhythm {
    /// Four even beats.
    Basic,
    /// Four beats, the first held to 5/3.
    Accented,
    /// Six sub-beats: short-short-long, short-short-long.
    Syncopated,
    /// A beat, a triplet of 2/3 beats, a beat.
    Triplet,
    /// Four beats, the last held to 5/3; closes a section.
    SectionEnd,
    /// Four beats slowing to double and triple length; closes the piece.
    OutroRitardando,
}

use Rhythm::{Accented as Ac, Basic as Bs, OutroRitardando as Rit, SectionEnd as End};
use Rhythm::{Syncopated as Syn, Triplet as Tri};

#[rustfmt::skip]
static A_RHYTHMS: [Rhythm; 16] = [
    Bs, Bs, Bs, Ac,
    Bs, Bs, Syn, Syn,
    Bs, Bs, Bs, Ac,
    Bs, Bs, Bs, End,
];

#[rustfmt::skip]
static B_RHYTHMS: [Rhythm; 16] = [
    Ac, Bs, Bs, Tri,
    Tri, Bs, Syn, Syn,
    Syn, Syn, Bs, Ac,
    Bs, Bs, Bs, End,
];

#[rustfmt::skip]
static C_RHYTHMS: [Rhythm; 8] = [
    Ac, Bs, Tri, Bs,
    Bs, Tri, Bs, End,
];

#[rustfmt::skip]
static OUTRO_RHYTHMS: [Rhythm; 8] = [
    Ac, Tri, Bs, Bs,
    Bs, Bs, Bs, Rit,
];

impl Rhythm {
    /// Beat lengths as `(numerator, denominator)` multiples of the beat unit.
    fn factors(self) -> &'static [(u32, u32)] {
        match self {
            Rhythm::Basic => &[(1, 1), (1, 1), (1, 1), (1, 1)],
            Rhythm::Accented => &[(5, 3), (1, 1), (1, 1), (1, 1)],
            Rhythm::Syncopated => &[(1, 2), (1, 2), (1, 1), (1, 2), (1, 2), (1, 1)],
            Rhythm::Triplet => &[(1, 1), (2, 3), (2, 3), (2, 3), (1, 1)],
            Rhythm::SectionEnd => &[(1, 1), (1, 1), (1, 1), (5, 3)],
            Rhythm::OutroRitardando => &[(1, 1), (1, 1), (2, 1), (3, 1)],
        }
    }

    /// Number of beats in one measure of this pattern.
    pub fn beat_count(self) -> usize {
        self.factors().len()
    }

    /// Duration of `beat` in milliseconds for the given beat unit. Beats
    /// past the end of the pattern wrap around.
    pub fn duration_ms(self, beat: usize, beat_unit_ms: u32) -> u32 {
        let factors = self.factors();
        let (num, den) = factors[beat % factors.len()];
        beat_unit_ms.saturating_mul(num) / den
    }
}

/// What the table prescribes for one measure.
#[derive(Debug, Clone, Copy)]
pub struct MeasurePlan {
    pub section: Section,
    /// Absolute measure index.
    pub measure: usize,
    pub chord: &'static Chord,
    pub rhythm: Rhythm,
    /// Whether beat 0 of this measure is silenced.
    pub rest_on_downbeat: bool,
}

/// Look up the chord and rhythm for a measure. Bounds-safe for any input:
/// the slot index wraps cyclically through the section's tables.
pub fn lookup(section: Section, measure: usize) -> MeasurePlan {
    let slot = measure.saturating_sub(section.first_measure()) % section.measure_count();
    let progression = section.progression();
    let rhythms = section.rhythms();
    MeasurePlan {
        section,
        measure,
        chord: &progression[slot % progression.len()],
        rhythm: rhythms[slot % rhythms.len()],
        rest_on_downbeat: is_rest_measure(measure),
    }
}

pub fn is_rest_measure(measure: usize) -> bool {
    REST_MEASURES.contains(&measure)
}
