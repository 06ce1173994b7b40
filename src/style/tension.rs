//! Tension colouring: upper extensions and altered ninths drawn from the
//! style's extension level and alteration probability.

use rand::{Rng, RngCore};

use crate::substitution::roll;
use crate::theory::{Accidental, ChordQuality, ChordSymbol, Extension};

use super::vector::StyleVector;

/// Colour one chord in place. Guide tones are never touched, so voice-leading
/// cost is unchanged.
pub fn colour_chord(chord: &mut ChordSymbol, style: &StyleVector, rng: &mut dyn RngCore) {
    let level = style.extension_level;

    if roll(rng, level) {
        chord.extensions.insert(Extension::Ninth);
    }
    if chord.is_dominant() && roll(rng, level * 0.5) {
        chord.extensions.insert(Extension::Thirteenth);
    }
    if chord.quality == ChordQuality::MinorSeventh && roll(rng, level * 0.3) {
        chord.extensions.insert(Extension::Eleventh);
    }
    if chord.is_dominant() && roll(rng, style.alteration_prob) {
        let accidental = if rng.gen_bool(0.5) {
            Accidental::Flat
        } else {
            Accidental::Sharp
        };
        chord.set_alteration(9, accidental);
    }
}

pub fn add_tensions(chords: &mut [ChordSymbol], style: &StyleVector, rng: &mut dyn RngCore) {
    for chord in chords.iter_mut() {
        colour_chord(chord, style, rng);
    }
}
