//! Major-third cycle ("Coltrane changes") over a ii-V-I.
//!
//! The ii is kept, the V-I is replaced by a trip through the tonal centres a
//! major third apart, each reached through its own dominant, landing back on
//! the original I:
//!
//! ```text
//! Dm7 G7 Cmaj7  ->  Dm7 B7 Emaj7 Eb7 Abmaj7 Cmaj7
//! ```
//!
//! A lone tonic can be expanded the same way into the full seven-chord
//! cycle, and the module also carries the other post-bop sequences built
//! from equal divisions: cycles of major thirds and chromatically
//! descending dominants.

use rand::RngCore;

use crate::theory::{ChordQuality, ChordSymbol, PitchClass};

use super::{roll, Rewrite, Substitution, SubstitutionKind};

/// Minor-seventh ii, dominant V and tonic-quality I with ii-V-I roots.
pub fn is_ii_v_i(ii: &ChordSymbol, v: &ChordSymbol, i: &ChordSymbol) -> bool {
    let tonic = i.root;
    ii.quality == ChordQuality::MinorSeventh
        && v.is_dominant()
        && i.is_tonic()
        && ii.root == tonic.transpose(2)
        && v.root == tonic.transpose(7)
}

/// Six-chord cycle replacing a matched ii-V-I.
pub fn expand(ii: &ChordSymbol, v: &ChordSymbol, i: &ChordSymbol) -> Vec<ChordSymbol> {
    let tonic = i.root;
    let centre = |offset: i32, quality: ChordQuality| {
        ChordSymbol::new(tonic.transpose(offset), quality).with_duration(v.duration)
    };
    vec![
        ii.clone(),
        centre(11, ChordQuality::DominantSeventh),
        centre(4, ChordQuality::MajorSeventh),
        centre(3, ChordQuality::DominantSeventh),
        centre(8, ChordQuality::MajorSeventh),
        i.clone(),
    ]
}

/// The full cycle from a tonic back to itself through the centres a major
/// third apart: in C, Cmaj7 B7 Emaj7 Eb7 Abmaj7 G7 Cmaj7.
pub fn tonic_cycle(tonic: &ChordSymbol) -> Vec<ChordSymbol> {
    let centre = |offset: i32, quality: ChordQuality| {
        ChordSymbol::new(tonic.root.transpose(offset), quality).with_duration(tonic.duration)
    };
    vec![
        tonic.clone(),
        centre(11, ChordQuality::DominantSeventh),
        centre(4, ChordQuality::MajorSeventh),
        centre(3, ChordQuality::DominantSeventh),
        centre(8, ChordQuality::MajorSeventh),
        centre(7, ChordQuality::DominantSeventh),
        tonic.clone(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThirdsDirection {
    Up,
    Down,
}

/// `steps` chords of `start`'s quality, each a major third from the last.
pub fn thirds_cycle(
    start: &ChordSymbol,
    direction: ThirdsDirection,
    steps: usize,
) -> Vec<ChordSymbol> {
    let interval = match direction {
        ThirdsDirection::Up => 4,
        ThirdsDirection::Down => -4,
    };
    std::iter::successors(Some(start.clone()), |prev| {
        let next = ChordSymbol::new(prev.root.transpose(interval), prev.quality);
        Some(next.with_duration(prev.duration))
    })
    .take(steps)
    .collect()
}

/// Dominant sevenths falling a half step at a time from `start`.
pub fn chromatic_dominant_descent(start: PitchClass, steps: usize) -> Vec<ChordSymbol> {
    (0..steps)
        .map(|i| ChordSymbol::new(start.transpose(-(i as i32)), ChordQuality::DominantSeventh))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColtraneSubstitution {
    pub probability: f64,
}

impl ColtraneSubstitution {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Fill `bars` chords from one tonic. With at least four bars and an
    /// accepted roll this is the [`tonic_cycle`], cut to fit and held on the
    /// tonic beyond its seven chords; otherwise the tonic repeated.
    pub fn maybe_expand_tonic(
        &self,
        tonic: &ChordSymbol,
        bars: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<ChordSymbol> {
        if bars < 4 || !roll(rng, self.probability) {
            return vec![tonic.clone(); bars];
        }
        let mut chords = tonic_cycle(tonic);
        chords.resize(bars, tonic.clone());
        chords
    }
}

impl Substitution for ColtraneSubstitution {
    fn kind(&self) -> SubstitutionKind {
        SubstitutionKind::Coltrane
    }

    /// Every start position is tried. An accepted window is consumed whole;
    /// a non-match or a declined roll moves on by one chord.
    fn apply(&self, chords: &[ChordSymbol], rng: &mut dyn RngCore) -> Rewrite {
        let mut out = Vec::with_capacity(chords.len());
        let mut sites = Vec::new();
        let mut i = 0;
        while i < chords.len() {
            if let [ii, v, tonic, ..] = &chords[i..] {
                if is_ii_v_i(ii, v, tonic) && roll(rng, self.probability) {
                    sites.push(out.len());
                    out.extend(expand(ii, v, tonic));
                    i += 3;
                    continue;
                }
            }
            out.push(chords[i].clone());
            i += 1;
        }
        Rewrite { chords: out, sites }
    }
}
