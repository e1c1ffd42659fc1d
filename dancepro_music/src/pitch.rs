// Pitch identifiers, registers, and the two substitution scales.
//
// A pitch is identified by its rounded equal-tempered frequency in Hz, the
// same integers the device's tone generator and the upload payload use
// (C4 = 262, A4 = 440, ...). Zero is reserved for silence, so a `Note` is
// either `Rest` or a `Pitch` and serializes as the bare integer.
//
// Registers split the range at C4 and C5. The sensor modulator only ever
// asks two questions of a pitch: "is it high?" (tilt rule 1) and "is it mid
// or below?" (tilt rule 2), and it substitutes from `MID_SCALE` or
// `HIGH_SCALE`, two octaves of C major.
//
// Used by composition.rs for chord voicings, modulator.rs for register
// substitution, and midi.rs for key conversion.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A sounding pitch, identified by its frequency in Hz (never zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pitch(u16);

pub const F3: Pitch = Pitch(175);
pub const G3: Pitch = Pitch(196);
pub const A3: Pitch = Pitch(220);
pub const B3: Pitch = Pitch(247);
pub const C4: Pitch = Pitch(262);
pub const D4: Pitch = Pitch(294);
pub const E4: Pitch = Pitch(330);
pub const F4: Pitch = Pitch(349);
pub const G4: Pitch = Pitch(392);
pub const A4: Pitch = Pitch(440);
pub const B4: Pitch = Pitch(494);
pub const C5: Pitch = Pitch(523);
pub const D5: Pitch = Pitch(587);
pub const E5: Pitch = Pitch(659);
pub const F5: Pitch = Pitch(698);
pub const G5: Pitch = Pitch(784);
pub const A5: Pitch = Pitch(880);
pub const B5: Pitch = Pitch(988);

/// C major, C4 through B4.
pub const MID_SCALE: [Pitch; 7] = [C4, D4, E4, F4, G4, A4, B4];

/// C major, C5 through B5.
pub const HIGH_SCALE: [Pitch; 7] = [C5, D5, E5, F5, G5, A5, B5];

/// Pitch-height band used by the substitution rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    /// Below C4.
    Low,
    /// C4 up to B4.
    Mid,
    /// C5 and above.
    High,
}

impl Register {
    /// The scale a substitution into this register draws from. `Low` has no
    /// scale of its own and borrows the mid one.
    pub fn scale(self) -> &'static [Pitch] {
        match self {
            Register::Low | Register::Mid => &MID_SCALE,
            Register::High => &HIGH_SCALE,
        }
    }
}

impl Pitch {
    /// Wrap a frequency id. Returns `None` for 0, which means silence.
    pub const fn from_hz(hz: u16) -> Option<Pitch> {
        if hz == 0 { None } else { Some(Pitch(hz)) }
    }

    pub const fn hz(self) -> u16 {
        self.0
    }

    pub fn register(self) -> Register {
        if self >= C5 {
            Register::High
        } else if self >= C4 {
            Register::Mid
        } else {
            Register::Low
        }
    }

    /// Nearest MIDI key number (A4 = 440 Hz = key 69), clamped to 0..=127.
    pub fn midi_key(self) -> u8 {
        let semis = 12.0 * (f32::from(self.0) / 440.0).log2();
        (69.0 + semis).round().clamp(0.0, 127.0) as u8
    }
}

/// One emitted note value: a pitch or silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Note {
    #[default]
    Rest,
    Pitch(Pitch),
}

impl Note {
    /// Wire id: 0 for a rest, otherwise the pitch frequency.
    pub fn id(self) -> u16 {
        match self {
            Note::Rest => 0,
            Note::Pitch(p) => p.hz(),
        }
    }

    pub fn from_id(id: u16) -> Note {
        Pitch::from_hz(id).map_or(Note::Rest, Note::Pitch)
    }

    pub fn is_rest(self) -> bool {
        matches!(self, Note::Rest)
    }

    pub fn pitch(self) -> Option<Pitch> {
        match self {
            Note::Rest => None,
            Note::Pitch(p) => Some(p),
        }
    }
}

impl From<Pitch> for Note {
    fn from(p: Pitch) -> Self {
        Note::Pitch(p)
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.id())
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u16::deserialize(deserializer).map(Note::from_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_boundaries() {
        assert_eq!(B3.register(), Register::Low);
        assert_eq!(C4.register(), Register::Mid);
        assert_eq!(B4.register(), Register::Mid);
        assert_eq!(C5.register(), Register::High);
        assert_eq!(B5.register(), Register::High);
    }

    #[test]
    fn scales_sit_in_their_registers() {
        assert!(MID_SCALE.iter().all(|p| p.register() == Register::Mid));
        assert!(HIGH_SCALE.iter().all(|p| p.register() == Register::High));
    }

    #[test]
    fn zero_is_rest() {
        assert_eq!(Note::from_id(0), Note::Rest);
        assert_eq!(Note::from_id(440), Note::Pitch(A4));
        assert_eq!(Note::Rest.id(), 0);
        assert!(Pitch::from_hz(0).is_none());
    }

    #[test]
    fn midi_keys() {
        assert_eq!(A4.midi_key(), 69);
        assert_eq!(C4.midi_key(), 60);
        assert_eq!(C5.midi_key(), 72);
        assert_eq!(F3.midi_key(), 53);
    }

    #[test]
    fn note_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Note::Pitch(C5)).unwrap(), "523");
        assert_eq!(serde_json::to_string(&Note::Rest).unwrap(), "0");
        let n: Note = serde_json::from_str("262").unwrap();
        assert_eq!(n, Note::Pitch(C4));
    }
}
