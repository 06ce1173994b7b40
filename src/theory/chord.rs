//! Chord symbols: root, quality, tensions, slash bass and duration.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::pitch::PitchClass;
use super::quality::ChordQuality;

/// Default chord length in beats (half a 4/4 bar).
pub const DEFAULT_DURATION_BEATS: f64 = 2.0;

const ALTERABLE_DEGREES: [u8; 6] = [3, 5, 7, 9, 11, 13];

/// Upper-structure tensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extension {
    Ninth,
    Eleventh,
    Thirteenth,
}

impl Extension {
    pub fn from_degree(degree: u8) -> Option<Self> {
        match degree {
            9 => Some(Extension::Ninth),
            11 => Some(Extension::Eleventh),
            13 => Some(Extension::Thirteenth),
            _ => None,
        }
    }

    pub fn degree(self) -> u8 {
        match self {
            Extension::Ninth => 9,
            Extension::Eleventh => 11,
            Extension::Thirteenth => 13,
        }
    }

    /// Unaltered interval above the root, reduced to one octave.
    pub fn natural_interval(self) -> u8 {
        match self {
            Extension::Ninth => 2,
            Extension::Eleventh => 5,
            Extension::Thirteenth => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accidental {
    Flat,
    Sharp,
}

impl Accidental {
    pub fn offset(self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Sharp => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Flat => "b",
            Accidental::Sharp => "#",
        }
    }
}

/// A single chord in a progression. Each progression owns its chords by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSymbol {
    pub root: PitchClass,
    pub quality: ChordQuality,
    #[serde(default)]
    pub extensions: BTreeSet<Extension>,
    #[serde(default)]
    pub alterations: BTreeMap<u8, Accidental>,
    #[serde(default)]
    pub bass: Option<PitchClass>,
    #[serde(default = "default_duration")]
    pub duration: f64,
}

fn default_duration() -> f64 {
    DEFAULT_DURATION_BEATS
}

impl ChordSymbol {
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self {
            root,
            quality,
            extensions: BTreeSet::new(),
            alterations: BTreeMap::new(),
            bass: None,
            duration: DEFAULT_DURATION_BEATS,
        }
    }

    pub fn with_duration(mut self, beats: f64) -> Self {
        self.duration = beats;
        self
    }

    pub fn with_bass(mut self, bass: PitchClass) -> Self {
        self.bass = Some(bass);
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.insert(extension);
        self
    }

    /// Alter a chord degree. Only 3, 5, 7, 9, 11 and 13 can be altered;
    /// returns `false` and leaves the chord untouched for anything else.
    pub fn set_alteration(&mut self, degree: u8, accidental: Accidental) -> bool {
        if !ALTERABLE_DEGREES.contains(&degree) {
            return false;
        }
        self.alterations.insert(degree, accidental);
        true
    }

    fn altered(&self, degree: u8, interval: u8) -> PitchClass {
        let shift = self.alterations.get(&degree).map_or(0, |a| a.offset());
        self.root.transpose(interval as i32 + shift)
    }

    pub fn third(&self) -> PitchClass {
        let interval = self.quality.intervals().get(1).copied().unwrap_or(4);
        self.altered(3, interval)
    }

    pub fn fifth(&self) -> PitchClass {
        let interval = self.quality.intervals().get(2).copied().unwrap_or(7);
        self.altered(5, interval)
    }

    /// The seventh, or a minor seventh above the root for triadic qualities.
    pub fn seventh(&self) -> PitchClass {
        let interval = self.quality.intervals().get(3).copied().unwrap_or(10);
        self.altered(7, interval)
    }

    /// Third and seventh, the pair that carries the chord's function.
    pub fn guide_tones(&self) -> (PitchClass, PitchClass) {
        (self.third(), self.seventh())
    }

    /// Tensions sounding above the chord: natural extensions plus any
    /// altered 9/11/13, as `(degree, semitones above root)`.
    pub fn tensions(&self) -> Vec<(u8, u8)> {
        let mut degrees: BTreeSet<u8> = self.extensions.iter().map(|e| e.degree()).collect();
        degrees.extend(self.alterations.keys().copied().filter(|d| *d >= 9));
        degrees
            .into_iter()
            .filter_map(|degree| {
                let ext = Extension::from_degree(degree)?;
                let shift = self.alterations.get(&degree).map_or(0, |a| a.offset());
                let interval = (ext.natural_interval() as i32 + shift).rem_euclid(12) as u8;
                Some((degree, interval))
            })
            .collect()
    }

    /// Distinct pitch classes sounded by the chord, root first.
    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        let intervals = self.quality.intervals();
        let mut pcs: Vec<PitchClass> = Vec::with_capacity(intervals.len() + 3);
        for (index, &interval) in intervals.iter().enumerate() {
            let pc = match index {
                1 => self.third(),
                2 => self.fifth(),
                3 => self.seventh(),
                _ => self.root.transpose(interval as i32),
            };
            if !pcs.contains(&pc) {
                pcs.push(pc);
            }
        }
        for (_, interval) in self.tensions() {
            let pc = self.root.transpose(interval as i32);
            if !pcs.contains(&pc) {
                pcs.push(pc);
            }
        }
        pcs
    }

    /// MIDI notes for a close-position voicing with the root in `base_octave`.
    /// Tensions sit an octave above the chord tones; notes past 127 are dropped.
    pub fn midi_notes(&self, base_octave: i32) -> Vec<u8> {
        let base = (base_octave + 1) * 12 + self.root.value() as i32;
        let mut notes = Vec::new();
        if let Some(bass) = self.bass.filter(|b| *b != self.root) {
            push_midi(&mut notes, base - 12 + self.root.interval_to(bass) as i32);
        }
        for (index, &interval) in self.quality.intervals().iter().enumerate() {
            let degree = match index {
                1 => 3,
                2 => 5,
                3 => 7,
                _ => 1,
            };
            let shift = self.alterations.get(&degree).map_or(0, |a| a.offset());
            push_midi(&mut notes, base + interval as i32 + shift);
        }
        for (_, interval) in self.tensions() {
            push_midi(&mut notes, base + 12 + interval as i32);
        }
        notes
    }

    pub fn transpose(&self, semitones: i32) -> Self {
        let mut chord = self.clone();
        chord.root = self.root.transpose(semitones);
        chord.bass = self.bass.map(|b| b.transpose(semitones));
        chord
    }

    /// Same quality and tensions, root moved a tritone away. Slash bass is
    /// kept where it was.
    pub fn tritone_substitute(&self) -> Self {
        let mut chord = self.clone();
        chord.root = self.root.transpose(6);
        chord
    }

    pub fn is_dominant(&self) -> bool {
        self.quality.is_dominant()
    }

    pub fn is_tonic(&self) -> bool {
        self.quality.is_tonic()
    }

    /// Roman numeral relative to `key`, e.g. `iim7` or `bVII7`.
    pub fn roman_numeral(&self, key: PitchClass) -> String {
        const NUMERALS: [&str; 12] = [
            "I", "bII", "II", "bIII", "III", "IV", "#IV", "V", "bVI", "VI", "bVII", "VII",
        ];
        let numeral = NUMERALS[key.interval_to(self.root) as usize];
        let numeral = if self.quality.is_minor() {
            numeral.to_lowercase()
        } else {
            numeral.to_string()
        };
        format!("{numeral}{}", self.quality.symbol())
    }
}

fn push_midi(notes: &mut Vec<u8>, note: i32) {
    if (0..=127).contains(&note) {
        notes.push(note as u8);
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.symbol())?;
        for (degree, accidental) in &self.alterations {
            write!(f, "{}{}", accidental.symbol(), degree)?;
        }
        let natural: Vec<String> = self
            .extensions
            .iter()
            .filter(|e| !self.alterations.contains_key(&e.degree()))
            .map(|e| e.degree().to_string())
            .collect();
        if !natural.is_empty() {
            write!(f, "({})", natural.join(","))?;
        }
        if let Some(bass) = self.bass {
            write!(f, "/{bass}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(root: PitchClass, quality: ChordQuality) -> ChordSymbol {
        ChordSymbol::new(root, quality)
    }

    #[test]
    fn guide_tones_follow_formula() {
        let g7 = chord(PitchClass::G, ChordQuality::DominantSeventh);
        assert_eq!(g7.guide_tones(), (PitchClass::B, PitchClass::F));
        let dm7 = chord(PitchClass::D, ChordQuality::MinorSeventh);
        assert_eq!(dm7.guide_tones(), (PitchClass::F, PitchClass::C));
    }

    #[test]
    fn triad_seventh_falls_back_to_minor_seventh() {
        let caug = chord(PitchClass::C, ChordQuality::Augmented);
        assert_eq!(caug.seventh(), PitchClass::BB);
        assert_eq!(caug.fifth(), PitchClass::AB);
    }

    #[test]
    fn alterations_shift_derived_tones() {
        let mut g7 = chord(PitchClass::G, ChordQuality::DominantSeventh);
        assert!(g7.set_alteration(5, Accidental::Sharp));
        assert_eq!(g7.fifth(), PitchClass::EB);
        assert!(!g7.set_alteration(6, Accidental::Flat));
    }

    #[test]
    fn pitch_classes_include_tensions() {
        let mut c7 = chord(PitchClass::C, ChordQuality::DominantSeventh);
        c7.set_alteration(9, Accidental::Flat);
        let pcs = c7.pitch_classes();
        assert_eq!(
            pcs,
            vec![
                PitchClass::C,
                PitchClass::E,
                PitchClass::G,
                PitchClass::BB,
                PitchClass::DB
            ]
        );
    }

    #[test]
    fn midi_notes_from_base_octave() {
        let cmaj7 = chord(PitchClass::C, ChordQuality::MajorSeventh);
        assert_eq!(cmaj7.midi_notes(4), vec![60, 64, 67, 71]);
        let d9 = chord(PitchClass::D, ChordQuality::DominantSeventh).with_extension(Extension::Ninth);
        assert_eq!(d9.midi_notes(3), vec![50, 54, 57, 60, 64]);
    }

    #[test]
    fn tritone_substitute_twice_is_identity() {
        let g7 = chord(PitchClass::G, ChordQuality::DominantSeventh);
        let db7 = g7.tritone_substitute();
        assert_eq!(db7.root, PitchClass::DB);
        assert_eq!(db7.quality, ChordQuality::DominantSeventh);
        assert_eq!(db7.tritone_substitute(), g7);
    }

    #[test]
    fn tritone_substitute_shares_guide_tones() {
        let g7 = chord(PitchClass::G, ChordQuality::DominantSeventh);
        let (t1, s1) = g7.guide_tones();
        let (t2, s2) = g7.tritone_substitute().guide_tones();
        assert_eq!((t1, s1), (s2, t2));
    }

    #[test]
    fn roman_numerals_relative_to_key() {
        let key = PitchClass::C;
        assert_eq!(
            chord(PitchClass::D, ChordQuality::MinorSeventh).roman_numeral(key),
            "iim7"
        );
        assert_eq!(
            chord(PitchClass::BB, ChordQuality::DominantSeventh).roman_numeral(key),
            "bVII7"
        );
        assert_eq!(
            chord(PitchClass::F, ChordQuality::MajorSeventh).roman_numeral(PitchClass::F),
            "Imaj7"
        );
    }

    #[test]
    fn display_renders_tensions_and_bass() {
        let mut c7 = chord(PitchClass::C, ChordQuality::DominantSeventh)
            .with_extension(Extension::Thirteenth)
            .with_bass(PitchClass::E);
        c7.set_alteration(9, Accidental::Flat);
        assert_eq!(c7.to_string(), "C7b9(13)/E");
        assert_eq!(
            chord(PitchClass::BB, ChordQuality::HalfDiminished).to_string(),
            "Bbm7b5"
        );
    }

    #[test]
    fn default_duration_is_two_beats() {
        assert_eq!(
            chord(PitchClass::C, ChordQuality::MajorSeventh).duration,
            DEFAULT_DURATION_BEATS
        );
    }
}
