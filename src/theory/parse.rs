//! Chord-name parsing: "Dm7", "Bb7b9", "F#m7b5", "C7(9,13)/E".
//!
//! Parsing is how hand-edited chords enter a progression. A chord produced
//! here satisfies the same invariants as a derived one; a rejected edit never
//! touches the chord it was meant to replace.

use std::str::FromStr;

use thiserror::Error;

use super::chord::{Accidental, ChordSymbol, Extension};
use super::pitch::{letter_value, PitchClass};
use super::quality::ChordQuality;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordParseError {
    #[error("empty chord name")]
    Empty,
    #[error("invalid chord root in '{0}'")]
    InvalidRoot(String),
    #[error("invalid bass note '{0}'")]
    InvalidBass(String),
    #[error("unrecognized chord suffix '{0}'")]
    UnrecognizedSuffix(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("chord index {index} out of range for progression of {len}")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Parse(#[from] ChordParseError),
}

/// Quality spellings, longest and most specific first.
const QUALITY_PREFIXES: &[(&str, ChordQuality)] = &[
    ("maj7", ChordQuality::MajorSeventh),
    ("Maj7", ChordQuality::MajorSeventh),
    ("M7", ChordQuality::MajorSeventh),
    ("mMaj7", ChordQuality::MinorMajorSeventh),
    ("m7b5", ChordQuality::HalfDiminished),
    ("m7-5", ChordQuality::HalfDiminished),
    ("ø", ChordQuality::HalfDiminished),
    ("dim7", ChordQuality::DiminishedSeventh),
    ("min7", ChordQuality::MinorSeventh),
    ("m7", ChordQuality::MinorSeventh),
    ("-7", ChordQuality::MinorSeventh),
    ("min6", ChordQuality::MinorSixth),
    ("m6", ChordQuality::MinorSixth),
    ("6", ChordQuality::MajorSixth),
    ("aug", ChordQuality::Augmented),
    ("+", ChordQuality::Augmented),
    ("sus4", ChordQuality::Sus4),
    ("sus2", ChordQuality::Sus2),
    ("sus", ChordQuality::Sus4),
    ("7", ChordQuality::DominantSeventh),
    ("maj", ChordQuality::MajorSeventh),
    ("dim", ChordQuality::DiminishedSeventh),
    ("min", ChordQuality::MinorSeventh),
    ("m", ChordQuality::MinorSeventh),
    ("-", ChordQuality::MinorSeventh),
];

impl FromStr for ChordSymbol {
    type Err = ChordParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChordParseError::Empty);
        }

        let (body, bass) = match text.split_once('/') {
            Some((body, bass)) => {
                let pc = PitchClass::from_name(bass)
                    .ok_or_else(|| ChordParseError::InvalidBass(bass.to_string()))?;
                (body, Some(pc))
            }
            None => (text, None),
        };

        let (root, rest) = split_root(body)?;
        let (quality, rest) = split_quality(rest);

        let mut chord = ChordSymbol::new(root, quality);
        chord.bass = bass;
        parse_tensions(rest, &mut chord)?;
        Ok(chord)
    }
}

fn split_root(body: &str) -> Result<(PitchClass, &str), ChordParseError> {
    let mut chars = body.char_indices();
    let base = chars
        .next()
        .and_then(|(_, c)| letter_value(c))
        .ok_or_else(|| ChordParseError::InvalidRoot(body.to_string()))?;
    match chars.next() {
        Some((i, '#')) => Ok((PitchClass::new(base + 1), &body[i + 1..])),
        Some((i, 'b')) => Ok((PitchClass::new(base - 1), &body[i + 1..])),
        Some((i, _)) => Ok((PitchClass::new(base), &body[i..])),
        None => Ok((PitchClass::new(base), "")),
    }
}

/// Bare roots and unknown spellings read as dominant sevenths.
fn split_quality(rest: &str) -> (ChordQuality, &str) {
    QUALITY_PREFIXES
        .iter()
        .find(|(prefix, _)| rest.starts_with(prefix))
        .map(|(prefix, quality)| (*quality, &rest[prefix.len()..]))
        .unwrap_or((ChordQuality::DominantSeventh, rest))
}

fn parse_tensions(rest: &str, chord: &mut ChordSymbol) -> Result<(), ChordParseError> {
    let unrecognized = || ChordParseError::UnrecognizedSuffix(rest.to_string());
    let chars: Vec<char> = rest.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if matches!(chars[i], '(' | ')' | ',' | ' ') {
            i += 1;
            continue;
        }

        let accidental = match chars[i] {
            'b' => Some(Accidental::Flat),
            '#' => Some(Accidental::Sharp),
            _ => None,
        };
        if accidental.is_some() {
            i += 1;
        }

        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let digits: String = chars[start..i].iter().collect();
        let degree: u8 = digits.parse().map_err(|_| unrecognized())?;

        match (accidental, degree) {
            (Some(acc), 5 | 9 | 11 | 13) => {
                chord.set_alteration(degree, acc);
            }
            (None, _) => {
                let ext = Extension::from_degree(degree).ok_or_else(unrecognized)?;
                chord.extensions.insert(ext);
            }
            _ => return Err(unrecognized()),
        }
    }
    Ok(())
}

/// Replace the chord at `index` with one parsed from `text`, keeping the old
/// chord's duration. On error the progression is left exactly as it was.
pub fn edit_chord(
    progression: &mut [ChordSymbol],
    index: usize,
    text: &str,
) -> Result<(), EditError> {
    let len = progression.len();
    let slot = progression
        .get_mut(index)
        .ok_or(EditError::OutOfRange { index, len })?;
    let mut chord: ChordSymbol = text.parse()?;
    chord.duration = slot.duration;
    *slot = chord;
    Ok(())
}
