//! Individual progression metrics. Entropies are in bits.

use std::collections::BTreeMap;

use crate::theory::{ChordQuality, ChordSymbol, PitchClass};

/// Shannon entropy of the empirical distribution of `items`.
pub fn entropy<K: Ord>(items: impl IntoIterator<Item = K>) -> f64 {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    let mut total = 0usize;
    for item in items {
        *counts.entry(item).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

fn root_steps(chords: &[ChordSymbol]) -> impl Iterator<Item = u8> + '_ {
    chords.windows(2).map(|w| w[0].root.interval_to(w[1].root))
}

/// Entropy of chord roots; log2(12) at most.
pub fn pitch_class_entropy(chords: &[ChordSymbol]) -> f64 {
    entropy(chords.iter().map(|c| c.root))
}

/// Entropy of the ascending intervals between consecutive roots.
pub fn root_movement_entropy(chords: &[ChordSymbol]) -> f64 {
    entropy(root_steps(chords))
}

/// Entropy of (root interval, quality, quality) transitions.
pub fn chord_bigram_entropy(chords: &[ChordSymbol]) -> f64 {
    entropy(
        chords
            .windows(2)
            .map(|w| (w[0].root.interval_to(w[1].root), w[0].quality, w[1].quality)),
    )
}

/// How idiomatic a root movement is, 0.3 for anything unlisted.
fn interval_regularity(interval: u8) -> f64 {
    match interval {
        5 => 1.0,
        7 => 0.9,
        2 => 0.8,
        10 => 0.7,
        3 => 0.6,
        4 => 0.5,
        _ => 0.3,
    }
}

/// Mean irregularity of root movements, 0 (all fourths) to 0.7.
pub fn chord_progression_irregularity(chords: &[ChordSymbol]) -> f64 {
    if chords.len() < 2 {
        return 0.0;
    }
    let sum: f64 = root_steps(chords).map(|i| 1.0 - interval_regularity(i)).sum();
    sum / (chords.len() - 1) as f64
}

/// Repetition of 2, 4 and 8 chord spans, capped at 1.
pub fn structureness_indicator(chords: &[ChordSymbol]) -> f64 {
    let n = chords.len();
    if n < 4 {
        return 0.0;
    }
    let pattern: Vec<(PitchClass, ChordQuality)> =
        chords.iter().map(|c| (c.root, c.quality)).collect();

    let mut score = 0.0;
    for span in [2usize, 4, 8] {
        if n < span * 2 {
            continue;
        }
        let mut counts: BTreeMap<&[(PitchClass, ChordQuality)], usize> = BTreeMap::new();
        for window in pattern.windows(span) {
            *counts.entry(window).or_default() += 1;
        }
        score += counts
            .values()
            .filter(|&&c| c > 1)
            .map(|&c| (c - 1) as f64 * span as f64 / n as f64)
            .sum::<f64>();
    }
    score.min(1.0)
}

fn is_functional_move(from: &ChordSymbol, to: &ChordSymbol, key: PitchClass) -> bool {
    let interval = from.root.interval_to(to.root);
    let dominant = from.quality == ChordQuality::DominantSeventh;
    let minor = from.quality == ChordQuality::MinorSeventh;

    (dominant && interval == 5)
        || (dominant && interval == 11)
        || (minor && to.quality == ChordQuality::DominantSeventh && interval == 5)
        || (minor && to.quality == ChordQuality::MinorSeventh && interval == 5)
        || (interval == 7 && to.root == key)
        || (from.root == key && interval == 9)
}

/// Fraction of transitions that are cadential, plagal, tritone resolutions
/// or standard diatonic moves. A single chord is fully coherent.
pub fn functional_coherence(chords: &[ChordSymbol], key: PitchClass) -> f64 {
    if chords.len() < 2 {
        return 1.0;
    }
    let coherent = chords
        .windows(2)
        .filter(|w| is_functional_move(&w[0], &w[1], key))
        .count();
    coherent as f64 / (chords.len() - 1) as f64
}

/// 0 for a single quality, 1 for five or more.
pub fn quality_variety(chords: &[ChordSymbol]) -> f64 {
    let mut qualities: Vec<ChordQuality> = chords.iter().map(|c| c.quality).collect();
    qualities.sort();
    qualities.dedup();
    if qualities.is_empty() {
        return 0.0;
    }
    ((qualities.len() - 1) as f64 / 4.0).min(1.0)
}
