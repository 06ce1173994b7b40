//! Objective quality metrics for a progression, after the MusDr family:
//! entropies for variety, irregularity and repetition for structure,
//! guide-tone cost for smoothness.

pub mod metrics;

use std::fmt;

use serde::Serialize;

use crate::theory::{ChordSymbol, PitchClass};
use crate::voice_leading::{average_cost, voice_leading_cost, SMOOTH_THRESHOLD};

pub use metrics::{
    chord_bigram_entropy, chord_progression_irregularity, entropy, functional_coherence,
    pitch_class_entropy, quality_variety, root_movement_entropy, structureness_indicator,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// Number of chords evaluated.
    pub chord_count: usize,
    pub pitch_class_entropy: f64,
    pub root_entropy: f64,
    pub chord_progression_irregularity: f64,
    pub bigram_entropy: f64,
    pub structureness_indicator: f64,
    pub functional_coherence: f64,
    pub voice_leading_cost: f64,
    pub smooth_ratio: f64,
    pub variety_score: f64,
    pub coherence_score: f64,
}

impl EvaluationResult {
    /// Weighted blend of the composite scores, 0..=1. Zero when nothing was
    /// evaluated.
    pub fn overall_score(&self) -> f64 {
        if self.chord_count == 0 {
            return 0.0;
        }
        0.2 * self.variety_score
            + 0.3 * self.coherence_score
            + 0.2 * (self.pitch_class_entropy / 3.0).min(1.0)
            + 0.15 * (1.0 - (self.voice_leading_cost / 4.0).min(1.0))
            + 0.15 * self.smooth_ratio
    }

    /// Named metrics in report order, overall last.
    pub fn metrics(&self) -> [(&'static str, f64); 11] {
        [
            ("pitch_class_entropy", self.pitch_class_entropy),
            ("root_entropy", self.root_entropy),
            ("cpi", self.chord_progression_irregularity),
            ("bigram_entropy", self.bigram_entropy),
            ("structureness", self.structureness_indicator),
            ("functional_coherence", self.functional_coherence),
            ("voice_leading_cost", self.voice_leading_cost),
            ("smooth_ratio", self.smooth_ratio),
            ("variety", self.variety_score),
            ("coherence", self.coherence_score),
            ("overall", self.overall_score()),
        ]
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.metrics() {
            writeln!(f, "{name:<22} {value:.3}")?;
        }
        Ok(())
    }
}

fn smooth_ratio(chords: &[ChordSymbol]) -> f64 {
    if chords.len() < 2 {
        return 1.0;
    }
    let smooth = chords
        .windows(2)
        .filter(|w| voice_leading_cost(&w[0], &w[1]) <= SMOOTH_THRESHOLD)
        .count();
    smooth as f64 / (chords.len() - 1) as f64
}

/// Evaluate `chords` in `key`, or in the first chord's root when no key is
/// given. An empty progression scores zero everywhere.
pub fn evaluate_progression(chords: &[ChordSymbol], key: Option<PitchClass>) -> EvaluationResult {
    let Some(first) = chords.first() else {
        return EvaluationResult::default();
    };
    let key = key.unwrap_or(first.root);

    let h = pitch_class_entropy(chords);
    let bigram = chord_bigram_entropy(chords);
    let cpi = chord_progression_irregularity(chords);
    let si = structureness_indicator(chords);
    let fc = functional_coherence(chords, key);

    let variety = 0.4 * (h / 2.5).min(1.0)
        + 0.3 * quality_variety(chords)
        + 0.3 * (bigram / 3.0).min(1.0);
    let coherence = 0.5 * fc + 0.3 * (1.0 - cpi) + 0.2 * si;

    EvaluationResult {
        chord_count: chords.len(),
        pitch_class_entropy: h,
        root_entropy: root_movement_entropy(chords),
        chord_progression_irregularity: cpi,
        bigram_entropy: bigram,
        structureness_indicator: si,
        functional_coherence: fc,
        voice_leading_cost: average_cost(chords),
        smooth_ratio: smooth_ratio(chords),
        variety_score: variety,
        coherence_score: coherence,
    }
}

/// Side-by-side metrics: `(name, first, second)`.
pub fn compare_progressions(
    first: &[ChordSymbol],
    second: &[ChordSymbol],
    key: Option<PitchClass>,
) -> Vec<(&'static str, f64, f64)> {
    let a = evaluate_progression(first, key).metrics();
    let b = evaluate_progression(second, key).metrics();
    a.iter()
        .zip(b.iter())
        .map(|(&(name, x), &(_, y))| (name, x, y))
        .collect()
}
