//! Style engine: derivation, length fitting, substitution, voice leading and
//! colouring in one seeded pass.

use rand::RngCore;
use serde::Serialize;

use crate::derivation::{chords_from_tree, depth_for_length, DerivationNode, Deriver};
use crate::grammar::Pcfg;
use crate::substitution::{roll, tritone, AppliedSubstitution, SubstitutionKind, SubstitutionPipeline};
use crate::theory::{ChordQuality, ChordSymbol, PitchClass};
use crate::voice_leading::{progression_cost, VoiceLeadingOptimizer, DEFAULT_MAX_ITERATIONS};

use super::params::style_to_pcfg;
use super::presets::{style_by_id, StylePreset};
use super::tension::add_tensions;
use super::vector::StyleVector;

/// Above this extension level the engine also smooths voice leading.
pub const OPTIMIZE_ABOVE_EXTENSION_LEVEL: f64 = 0.5;

/// Beats per chord for blues changes: one chord per bar.
const BLUES_BAR_BEATS: f64 = 4.0;

/// Everything one `generate` call produced, for inspection and export.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProgression {
    pub key: PitchClass,
    pub style: StyleVector,
    pub chords: Vec<ChordSymbol>,
    pub tree: DerivationNode,
    pub substitutions: Vec<AppliedSubstitution>,
    pub optimizer_moves: Vec<(usize, SubstitutionKind)>,
    pub cost_before: u32,
    pub cost_after: u32,
}

#[derive(Debug, Clone)]
pub struct StyleEngine {
    style: StyleVector,
    grammar: Pcfg,
    seed: Option<u64>,
    optimizer: VoiceLeadingOptimizer,
}

impl Default for StyleEngine {
    fn default() -> Self {
        Self::new(StylePreset::Bebop.vector())
    }
}

impl StyleEngine {
    pub fn new(style: StyleVector) -> Self {
        let style = style.validated();
        Self {
            grammar: style_to_pcfg(&style),
            style,
            seed: None,
            optimizer: VoiceLeadingOptimizer::new(DEFAULT_MAX_ITERATIONS),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_seed(seed);
        self
    }

    /// Fix the seed. Every later generation call restarts from it.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
        self.grammar.set_seed(seed);
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn style(&self) -> &StyleVector {
        &self.style
    }

    pub fn grammar(&self) -> &Pcfg {
        &self.grammar
    }

    pub fn set_style(&mut self, style: StyleVector) {
        self.style = style.validated();
        self.rebuild_grammar();
    }

    pub fn set_style_by_id(&mut self, id: u8) {
        self.set_style(style_by_id(id));
    }

    pub fn set_preset(&mut self, preset: StylePreset) {
        self.set_style(preset.vector());
    }

    pub fn set_tritone_sub_prob(&mut self, value: f64) {
        self.style.tritone_sub_prob = value;
        self.style.validate();
        self.rebuild_grammar();
    }

    pub fn set_ii_v_preference(&mut self, value: f64) {
        self.style.ii_v_preference = value;
        self.style.validate();
        self.rebuild_grammar();
    }

    pub fn set_modal_interchange(&mut self, value: f64) {
        self.style.modal_interchange = value;
        self.style.validate();
        self.rebuild_grammar();
    }

    /// Only affects post-processing, so the grammar is kept.
    pub fn set_extension_level(&mut self, value: f64) {
        self.style.extension_level = value;
        self.style.validate();
    }

    fn rebuild_grammar(&mut self) {
        self.grammar = style_to_pcfg(&self.style);
        if let Some(seed) = self.seed {
            self.grammar.set_seed(seed);
        }
    }

    fn reseed(&mut self) {
        if let Some(seed) = self.seed {
            self.grammar.set_seed(seed);
        }
    }

    /// Exactly `length` chords in `key`.
    pub fn generate(&mut self, length: usize, key: PitchClass) -> Vec<ChordSymbol> {
        self.generate_report(length, key).chords
    }

    pub fn generate_report(&mut self, length: usize, key: PitchClass) -> GeneratedProgression {
        self.reseed();

        let depth = depth_for_length(length);
        let tree = Deriver::new(&mut self.grammar, depth).run(key);
        let derived = chords_from_tree(&tree);
        log::debug!(
            "derived {} chords at depth {} ({} nodes)",
            derived.len(),
            depth,
            tree.node_count()
        );

        let style = &self.style;
        let rng: &mut dyn RngCore = self.grammar.rng_mut();

        let mut chords = adjust_length(derived, length, key, style.turnaround_prob, rng);

        let outcome = SubstitutionPipeline::for_style(style).apply(&chords, rng);
        chords = outcome.chords;
        // Coltrane expansion can overshoot.
        chords.truncate(length);

        let cost_before = progression_cost(&chords);
        let mut optimizer_moves = Vec::new();
        if style.extension_level > OPTIMIZE_ABOVE_EXTENSION_LEVEL {
            let result = self.optimizer.optimize(&chords);
            log::debug!(
                "optimizer: {} iterations, cost {} -> {}",
                result.iterations,
                result.initial_cost,
                result.final_cost
            );
            chords = result.chords;
            optimizer_moves = result.moves;
        }

        add_tensions(&mut chords, style, rng);
        let cost_after = progression_cost(&chords);

        let beats = style.beats_per_chord();
        for chord in &mut chords {
            chord.duration = beats;
        }

        GeneratedProgression {
            key,
            style: style.clone(),
            chords,
            tree,
            substitutions: outcome.applied,
            optimizer_moves,
            cost_before,
            cost_after,
        }
    }

    /// I vi ii V with style-driven colouring: a passing #Idim7 in place of
    /// vi, a tritone-substituted V, and a bVI7 approach before the V.
    pub fn generate_turnaround(&mut self, key: PitchClass) -> Vec<ChordSymbol> {
        self.reseed();
        let style = &self.style;
        let rng: &mut dyn RngCore = self.grammar.rng_mut();

        let mut turnaround = vec![
            ChordSymbol::new(key, ChordQuality::MajorSeventh),
            ChordSymbol::new(key.transpose(9), ChordQuality::MinorSeventh),
            ChordSymbol::new(key.transpose(2), ChordQuality::MinorSeventh),
            ChordSymbol::new(key.transpose(7), ChordQuality::DominantSeventh),
        ];

        if roll(rng, style.diminished_approach) {
            turnaround[1] = ChordSymbol::new(key.transpose(1), ChordQuality::DiminishedSeventh);
        }
        if roll(rng, style.tritone_sub_prob) {
            turnaround[3] = tritone::substitute(&turnaround[3]);
        }
        if roll(rng, style.chromatic_approach) {
            turnaround.insert(
                3,
                ChordSymbol::new(key.transpose(8), ChordQuality::DominantSeventh),
            );
        }
        turnaround
    }

    /// Dominant blues, the twelve-bar pattern repeated to fill `bars`.
    /// Each dominant may be tritone-substituted; otherwise a IV7 may turn
    /// into a minor iv.
    pub fn generate_blues_changes(&mut self, key: PitchClass, bars: usize) -> Vec<ChordSymbol> {
        const PATTERN: [i32; 12] = [0, 5, 0, 0, 5, 5, 0, 0, 7, 5, 0, 7];

        self.reseed();
        let style = &self.style;
        let rng: &mut dyn RngCore = self.grammar.rng_mut();

        PATTERN
            .iter()
            .cycle()
            .take(bars)
            .map(|&offset| {
                let chord = ChordSymbol::new(key.transpose(offset), ChordQuality::DominantSeventh)
                    .with_duration(BLUES_BAR_BEATS);
                if roll(rng, style.tritone_sub_prob) {
                    tritone::substitute(&chord)
                } else if offset == 5 && roll(rng, style.minor_iv_prob) {
                    ChordSymbol::new(chord.root, ChordQuality::MinorSeventh)
                        .with_duration(BLUES_BAR_BEATS)
                } else {
                    chord
                }
            })
            .collect()
    }
}

/// Fit a derived sequence to `target` chords: truncate, or pad with a ii-V
/// (at `turnaround_prob`, when two slots remain) or the tonic.
pub fn adjust_length(
    mut chords: Vec<ChordSymbol>,
    target: usize,
    key: PitchClass,
    turnaround_prob: f64,
    rng: &mut dyn RngCore,
) -> Vec<ChordSymbol> {
    if chords.len() >= target {
        chords.truncate(target);
        return chords;
    }

    log::debug!("padding {} chords to {}", chords.len(), target);
    while chords.len() < target {
        if target - chords.len() >= 2 && roll(rng, turnaround_prob) {
            chords.push(ChordSymbol::new(key.transpose(2), ChordQuality::MinorSeventh));
            chords.push(ChordSymbol::new(key.transpose(7), ChordQuality::DominantSeventh));
        } else {
            chords.push(ChordSymbol::new(key, ChordQuality::MajorSeventh));
        }
    }
    chords
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quiet() -> StyleVector {
        StyleVector {
            tritone_sub_prob: 0.0,
            backdoor_prob: 0.0,
            coltrane_prob: 0.0,
            chromatic_approach: 0.0,
            diminished_approach: 0.0,
            minor_iv_prob: 0.0,
            extension_level: 0.0,
            alteration_prob: 0.0,
            ..StyleVector::default()
        }
    }

    #[test]
    fn length_contract_holds_for_every_preset() {
        for preset in StylePreset::ALL {
            let mut engine = StyleEngine::new(preset.vector()).with_seed(11);
            for length in 1..=24 {
                assert_eq!(engine.generate(length, PitchClass::F).len(), length, "{preset}");
            }
        }
    }

    #[test]
    fn zero_length_is_empty() {
        let mut engine = StyleEngine::default().with_seed(1);
        assert!(engine.generate(0, PitchClass::C).is_empty());
    }

    #[test]
    fn same_seed_same_output() {
        let mut engine = StyleEngine::new(StylePreset::PostBop.vector()).with_seed(99);
        let first = engine.generate(8, PitchClass::EB);
        let second = engine.generate(8, PitchClass::EB);
        assert_eq!(first, second);

        let mut other = StyleEngine::new(StylePreset::PostBop.vector()).with_seed(99);
        assert_eq!(other.generate(8, PitchClass::EB), first);
    }

    #[test]
    fn rebuild_keeps_seed() {
        let mut engine = StyleEngine::default().with_seed(5);
        engine.set_ii_v_preference(0.2);
        assert_eq!(engine.seed(), Some(5));
        let a = engine.generate(6, PitchClass::G);
        engine.set_ii_v_preference(0.2);
        assert_eq!(engine.generate(6, PitchClass::G), a);
    }

    #[test]
    fn setters_clamp() {
        let mut engine = StyleEngine::default();
        engine.set_tritone_sub_prob(2.0);
        engine.set_modal_interchange(-1.0);
        engine.set_extension_level(7.0);
        assert_eq!(engine.style().tritone_sub_prob, 1.0);
        assert_eq!(engine.style().modal_interchange, 0.0);
        assert_eq!(engine.style().extension_level, 1.0);
    }

    #[test]
    fn unknown_style_id_falls_back_to_bebop() {
        let mut engine = StyleEngine::new(StylePreset::Modal.vector());
        engine.set_style_by_id(200);
        assert_eq!(engine.style(), &StylePreset::Bebop.vector());
    }

    #[test]
    fn durations_follow_rhythm_density() {
        let mut engine = StyleEngine::new(StyleVector {
            rhythm_density: 0.1,
            ..quiet()
        })
        .with_seed(2);
        assert!(engine.generate(5, PitchClass::C).iter().all(|c| c.duration == 4.0));
    }

    #[test]
    fn quiet_style_reports_no_substitutions() {
        let mut engine = StyleEngine::new(quiet()).with_seed(8);
        let report = engine.generate_report(8, PitchClass::D);
        assert!(report.substitutions.is_empty());
        assert!(report.optimizer_moves.is_empty());
        assert_eq!(report.cost_before, report.cost_after);
        assert_eq!(report.key, PitchClass::D);
    }

    #[test]
    fn reported_costs_describe_returned_chords() {
        let style = StyleVector {
            coltrane_prob: 1.0,
            backdoor_prob: 0.5,
            extension_level: 0.9,
            ..StyleVector::default()
        };
        for seed in 0..40 {
            let mut engine = StyleEngine::new(style.clone()).with_seed(seed);
            for length in [3, 5, 8, 12] {
                let report = engine.generate_report(length, PitchClass::C);
                assert_eq!(report.chords.len(), length);
                assert_eq!(report.cost_after, progression_cost(&report.chords), "seed {seed}");
                assert!(report.cost_after <= report.cost_before, "seed {seed}");
            }
        }
    }

    #[test]
    fn padding_uses_tonic_or_ii_v() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tonic_only = adjust_length(Vec::new(), 3, PitchClass::C, 0.0, &mut rng);
        assert_eq!(tonic_only.len(), 3);
        assert!(tonic_only.iter().all(|c| c.to_string() == "Cmaj7"));

        let turnarounds = adjust_length(Vec::new(), 5, PitchClass::C, 1.0, &mut rng);
        let names: Vec<String> = turnarounds.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["Dm7", "G7", "Dm7", "G7", "Cmaj7"]);
    }

    #[test]
    fn truncates_long_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let chords = vec![ChordSymbol::new(PitchClass::C, ChordQuality::MajorSeventh); 6];
        assert_eq!(adjust_length(chords, 2, PitchClass::C, 1.0, &mut rng).len(), 2);
    }

    #[test]
    fn plain_turnaround() {
        let mut engine = StyleEngine::new(quiet());
        let names: Vec<String> = engine
            .generate_turnaround(PitchClass::F)
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names, vec!["Fmaj7", "Dm7", "Gm7", "C7"]);
    }

    #[test]
    fn fully_coloured_turnaround() {
        let mut engine = StyleEngine::new(StyleVector {
            diminished_approach: 1.0,
            tritone_sub_prob: 1.0,
            chromatic_approach: 1.0,
            ..quiet()
        });
        let names: Vec<String> = engine
            .generate_turnaround(PitchClass::C)
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names, vec!["Cmaj7", "Dbdim7", "Dm7", "Ab7", "Db7"]);
    }

    #[test]
    fn plain_blues_follows_the_form() {
        let mut engine = StyleEngine::new(quiet());
        let names: Vec<String> = engine
            .generate_blues_changes(PitchClass::BB, 12)
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Bb7", "Eb7", "Bb7", "Bb7", "Eb7", "Eb7", "Bb7", "Bb7", "F7", "Eb7", "Bb7", "F7"]
        );
    }

    #[test]
    fn blues_repeats_past_twelve_bars() {
        let mut engine = StyleEngine::new(quiet());
        let changes = engine.generate_blues_changes(PitchClass::C, 16);
        assert_eq!(changes.len(), 16);
        assert_eq!(changes[12], changes[0]);
        assert_eq!(changes[13], changes[1]);
        assert!(changes.iter().all(|c| c.duration == 4.0));
    }

    #[test]
    fn blues_minor_iv() {
        let mut engine = StyleEngine::new(StyleVector {
            minor_iv_prob: 1.0,
            ..quiet()
        });
        let changes = engine.generate_blues_changes(PitchClass::C, 12);
        assert_eq!(changes[1].to_string(), "Fm7");
        assert_eq!(changes[0].to_string(), "C7");
        assert_eq!(changes[8].to_string(), "G7");
    }
}
