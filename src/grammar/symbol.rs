//! Grammar alphabet: functional categories, chord-function terminals and
//! the key context attached to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::theory::{ChordQuality, PitchClass};

/// Harmonic-function categories the grammar expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NonTerminal {
    Start,
    Tonic,
    Dominant,
    Subdominant,
    Prolongation,
    Preparation,
    Phrase,
}

impl NonTerminal {
    pub fn label(self) -> &'static str {
        match self {
            NonTerminal::Start => "S",
            NonTerminal::Tonic => "T",
            NonTerminal::Dominant => "D",
            NonTerminal::Subdominant => "SD",
            NonTerminal::Prolongation => "Prol",
            NonTerminal::Preparation => "Prep",
            NonTerminal::Phrase => "Phrase",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a production rule does musically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Prolongation,
    Preparation,
    Substitution,
    Terminal,
    Structural,
}

/// A chord-function leaf: scale degree plus quality label, e.g. `V/V` `7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Terminal {
    pub degree: String,
    pub quality: String,
    /// When false the degree is measured from C rather than the active key.
    pub key_relative: bool,
}

impl Terminal {
    pub fn new(degree: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            degree: degree.into(),
            quality: quality.into(),
            key_relative: true,
        }
    }

    pub fn absolute(degree: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            key_relative: false,
            ..Self::new(degree, quality)
        }
    }

    /// For a secondary dominant `V/X`, the target degree `X`.
    pub fn secondary_target(&self) -> Option<&str> {
        self.degree
            .split_once('/')
            .filter(|(head, target)| *head == "V" && !target.is_empty())
            .map(|(_, target)| target)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.degree, self.quality)
    }
}

/// Grammar symbol: an expandable category with optional key override, or a
/// terminal chord function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Symbol {
    NonTerminal {
        category: NonTerminal,
        /// `None` inherits the enclosing derivation key.
        key: Option<PitchClass>,
    },
    Terminal(Terminal),
}

impl Symbol {
    pub fn nt(category: NonTerminal) -> Self {
        Symbol::NonTerminal {
            category,
            key: None,
        }
    }

    pub fn nt_in(category: NonTerminal, key: PitchClass) -> Self {
        Symbol::NonTerminal {
            category,
            key: Some(key),
        }
    }

    pub fn terminal(degree: &str, quality: &str) -> Self {
        Symbol::Terminal(Terminal::new(degree, quality))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::NonTerminal {
                category,
                key: Some(key),
            } => write!(f, "{category}[{key}]"),
            Symbol::NonTerminal { category, key: None } => write!(f, "{category}"),
            Symbol::Terminal(t) => write!(f, "{t}"),
        }
    }
}

/// Semitones above the key for a Roman-numeral degree label.
///
/// Shared by derivation (secondary-dominant modulation) and terminal-to-chord
/// conversion. Secondary labels (`V/X`) map to the root of the secondary
/// dominant itself, a fifth above `X`.
pub fn degree_semitones(degree: &str) -> Option<u8> {
    let semitones = match degree {
        "I" | "i" => 0,
        "bII" | "bii" => 1,
        "II" | "ii" => 2,
        "bIII" | "biii" => 3,
        "III" | "iii" => 4,
        "IV" | "iv" => 5,
        "#IV" | "#iv" | "bV" => 6,
        "V" | "v" => 7,
        "bVI" | "bvi" => 8,
        "VI" | "vi" => 9,
        "bVII" | "bvii" => 10,
        "VII" | "vii" => 11,
        "V/V" => 2,
        "V/ii" => 9,
        "V/iii" => 11,
        "V/IV" => 0,
        "V/vi" => 4,
        _ => return None,
    };
    Some(semitones)
}

/// Semitone offset of a degree label, falling back to the tonic for labels
/// outside the table.
pub fn degree_offset(degree: &str) -> u8 {
    degree_semitones(degree).unwrap_or_else(|| {
        log::warn!("unknown scale degree '{degree}', using tonic");
        0
    })
}

/// Chord quality for a grammar label, falling back to dominant seventh.
pub fn quality_for_label(label: &str) -> ChordQuality {
    ChordQuality::from_label(label).unwrap_or_else(|| {
        log::warn!("unknown chord quality '{label}', using dominant seventh");
        ChordQuality::DominantSeventh
    })
}
