//! Backdoor dominant: V7 -> I becomes bVII7 -> I.
//!
//! The bVII7 is the dominant of the borrowed minor iv, so the full backdoor
//! approach is iv7 -> bVII7 -> I.

use rand::RngCore;

use crate::theory::{ChordQuality, ChordSymbol};

use super::{roll, Rewrite, Substitution, SubstitutionKind};

/// `dominant` is a V7 resolving to a major-seventh or major-sixth `target`.
pub fn applies(dominant: &ChordSymbol, target: &ChordSymbol) -> bool {
    dominant.is_dominant() && target.is_tonic() && dominant.root == target.root.transpose(7)
}

/// The dominant rebuilt on the target's flat seventh degree.
pub fn substitute(dominant: &ChordSymbol, target: &ChordSymbol) -> ChordSymbol {
    let mut chord = dominant.clone();
    chord.root = target.root.transpose(10);
    chord.bass = None;
    chord
}

/// The bVII7 that resolves up a whole step to `tonic`.
pub fn dominant_for(tonic: &ChordSymbol) -> ChordSymbol {
    ChordSymbol::new(tonic.root.transpose(10), ChordQuality::DominantSeventh)
}

/// `dominant` is a dominant seventh a whole step below `target`.
pub fn is_resolution(dominant: &ChordSymbol, target: &ChordSymbol) -> bool {
    dominant.is_dominant() && dominant.root.interval_to(target.root) == 2
}

/// The backdoor ii-V into `tonic`: the borrowed iv minor seventh and its
/// dominant, the bVII7.
pub fn ii_v(tonic: &ChordSymbol) -> (ChordSymbol, ChordSymbol) {
    let iv = ChordSymbol::new(tonic.root.transpose(5), ChordQuality::MinorSeventh);
    (iv, dominant_for(tonic))
}

/// iv7 -> bVII7 -> `tonic`.
pub fn approach(tonic: &ChordSymbol) -> Vec<ChordSymbol> {
    let (iv, bvii) = ii_v(tonic);
    vec![iv, bvii, tonic.clone()]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdoorSubstitution {
    pub probability: f64,
}

impl BackdoorSubstitution {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl Substitution for BackdoorSubstitution {
    fn kind(&self) -> SubstitutionKind {
        SubstitutionKind::Backdoor
    }

    fn apply(&self, chords: &[ChordSymbol], rng: &mut dyn RngCore) -> Rewrite {
        let mut out = chords.to_vec();
        let mut sites = Vec::new();
        for i in 0..chords.len().saturating_sub(1) {
            if applies(&chords[i], &chords[i + 1]) && roll(rng, self.probability) {
                out[i] = substitute(&chords[i], &chords[i + 1]);
                sites.push(i);
            }
        }
        Rewrite { chords: out, sites }
    }
}
