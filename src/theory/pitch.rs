//! Pitch classes: octave-free pitches in modulo-12 arithmetic.

use std::fmt;

use serde::{Deserialize, Serialize};

const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];
const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A pitch with no octave. The wrapped value is always in `0..12`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "u8", into = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);
    pub const DB: PitchClass = PitchClass(1);
    pub const D: PitchClass = PitchClass(2);
    pub const EB: PitchClass = PitchClass(3);
    pub const E: PitchClass = PitchClass(4);
    pub const F: PitchClass = PitchClass(5);
    pub const GB: PitchClass = PitchClass(6);
    pub const G: PitchClass = PitchClass(7);
    pub const AB: PitchClass = PitchClass(8);
    pub const A: PitchClass = PitchClass(9);
    pub const BB: PitchClass = PitchClass(10);
    pub const B: PitchClass = PitchClass(11);

    /// Build a pitch class from any integer, wrapping into `0..12`.
    pub fn new(value: i32) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones)
    }

    /// Ascending interval in semitones from `self` up to `other` (0..=11).
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + 12 - self.0) % 12
    }

    /// Shortest circular distance in either direction (0..=6).
    pub fn distance(self, other: PitchClass) -> u8 {
        let up = self.interval_to(other);
        up.min(12 - up)
    }

    /// Flat spelling, the usual jazz lead-sheet convention (Bb7, Db7, Ab).
    pub fn name(self) -> &'static str {
        FLAT_NAMES[self.0 as usize]
    }

    pub fn sharp_name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }

    /// Parse a pitch name such as `C`, `F#`, `Bb` or an enharmonic like `Cb`.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.trim().chars();
        let base = letter_value(chars.next()?)?;
        let accidental = match chars.next() {
            None => 0,
            Some('#') => 1,
            Some('b') => -1,
            Some(_) => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Self::new(base + accidental))
    }

    /// MIDI note number of this pitch class in the given octave (C4 = 60).
    pub fn midi_note(self, octave: i32) -> Option<u8> {
        let midi = (octave + 1) * 12 + self.0 as i32;
        if (0..=127).contains(&midi) {
            Some(midi as u8)
        } else {
            None
        }
    }
}

pub(crate) fn letter_value(letter: char) -> Option<i32> {
    match letter {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

impl From<u8> for PitchClass {
    fn from(value: u8) -> Self {
        Self(value % 12)
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> Self {
        pc.0
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
