//! Chord qualities and their interval formulas.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of chord qualities the generator works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    MajorSeventh,
    MinorSeventh,
    DominantSeventh,
    HalfDiminished,
    DiminishedSeventh,
    Augmented,
    MinorMajorSeventh,
    MajorSixth,
    MinorSixth,
    Sus4,
    Sus2,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 11] = [
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::DominantSeventh,
        ChordQuality::HalfDiminished,
        ChordQuality::DiminishedSeventh,
        ChordQuality::Augmented,
        ChordQuality::MinorMajorSeventh,
        ChordQuality::MajorSixth,
        ChordQuality::MinorSixth,
        ChordQuality::Sus4,
        ChordQuality::Sus2,
    ];

    /// Semitone offsets from the root, lowest first.
    ///
    /// This is the single source of truth for guide tones, fifths and
    /// pitch-class sets.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::MajorSeventh => &[0, 4, 7, 11],
            ChordQuality::MinorSeventh => &[0, 3, 7, 10],
            ChordQuality::DominantSeventh => &[0, 4, 7, 10],
            ChordQuality::HalfDiminished => &[0, 3, 6, 10],
            ChordQuality::DiminishedSeventh => &[0, 3, 6, 9],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::MinorMajorSeventh => &[0, 3, 7, 11],
            ChordQuality::MajorSixth => &[0, 4, 7, 9],
            ChordQuality::MinorSixth => &[0, 3, 7, 9],
            ChordQuality::Sus4 => &[0, 5, 7, 10],
            ChordQuality::Sus2 => &[0, 2, 7, 10],
        }
    }

    /// Suffix used in chord names (`maj7`, `m7`, `7`, ...).
    pub fn symbol(self) -> &'static str {
        match self {
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::MinorSeventh => "m7",
            ChordQuality::DominantSeventh => "7",
            ChordQuality::HalfDiminished => "m7b5",
            ChordQuality::DiminishedSeventh => "dim7",
            ChordQuality::Augmented => "aug",
            ChordQuality::MinorMajorSeventh => "mMaj7",
            ChordQuality::MajorSixth => "6",
            ChordQuality::MinorSixth => "m6",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Sus2 => "sus2",
        }
    }

    /// Look up a grammar quality label (`maj7`, `min7`, `7`, `maj6`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "maj7" => Some(ChordQuality::MajorSeventh),
            "min7" | "m7" => Some(ChordQuality::MinorSeventh),
            "7" | "dom7" => Some(ChordQuality::DominantSeventh),
            "m7b5" => Some(ChordQuality::HalfDiminished),
            "dim7" => Some(ChordQuality::DiminishedSeventh),
            "aug" => Some(ChordQuality::Augmented),
            "mMaj7" => Some(ChordQuality::MinorMajorSeventh),
            "maj6" | "6" => Some(ChordQuality::MajorSixth),
            "min6" | "m6" => Some(ChordQuality::MinorSixth),
            "sus4" => Some(ChordQuality::Sus4),
            "sus2" => Some(ChordQuality::Sus2),
            _ => None,
        }
    }

    pub fn is_minor(self) -> bool {
        matches!(
            self,
            ChordQuality::MinorSeventh
                | ChordQuality::HalfDiminished
                | ChordQuality::MinorSixth
                | ChordQuality::MinorMajorSeventh
        )
    }

    pub fn is_dominant(self) -> bool {
        self == ChordQuality::DominantSeventh
    }

    /// Tonic-function qualities: major seventh and major sixth.
    pub fn is_tonic(self) -> bool {
        matches!(self, ChordQuality::MajorSeventh | ChordQuality::MajorSixth)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
