//! Greedy first-improvement search over chord substitutions, plus passing
//! chord suggestions.

use serde::Serialize;

use crate::substitution::{backdoor, tritone, SubstitutionKind};
use crate::theory::{ChordQuality, ChordSymbol};

use super::guide_tone::{progression_cost, voice_leading_cost, SMOOTH_THRESHOLD};

/// Default iteration cap used by the style engine.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub chords: Vec<ChordSymbol>,
    pub iterations: usize,
    /// Accepted moves in the order they were taken.
    pub moves: Vec<(usize, SubstitutionKind)>,
    pub initial_cost: u32,
    pub final_cost: u32,
}

/// Deterministic local search. No randomness is involved: the same input
/// always yields the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceLeadingOptimizer {
    pub max_iterations: usize,
    /// Also try bVII7 for a V7 resolving to its tonic.
    pub backdoor_moves: bool,
}

impl Default for VoiceLeadingOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl VoiceLeadingOptimizer {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            backdoor_moves: true,
        }
    }

    pub fn tritone_only(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            backdoor_moves: false,
        }
    }

    /// Candidate replacements for the chord at `i`, in the order they are tried.
    fn candidates(&self, chords: &[ChordSymbol], i: usize) -> Vec<(SubstitutionKind, ChordSymbol)> {
        let chord = &chords[i];
        let mut out = Vec::new();
        if chord.is_dominant() {
            out.push((SubstitutionKind::Tritone, tritone::substitute(chord)));
        }
        if self.backdoor_moves {
            if let Some(next) = chords.get(i + 1) {
                if backdoor::applies(chord, next) {
                    out.push((SubstitutionKind::Backdoor, backdoor::substitute(chord, next)));
                }
            }
        }
        out
    }

    /// Repeatedly accept the first substitution that strictly lowers total
    /// cost, rescanning from the start after each one. Stops when a full scan
    /// finds nothing or after `max_iterations` scans.
    pub fn optimize(&self, chords: &[ChordSymbol]) -> OptimizationResult {
        let mut current = chords.to_vec();
        let initial_cost = progression_cost(&current);
        let mut cost = initial_cost;
        let mut moves = Vec::new();
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            let mut improved = false;

            'scan: for i in 0..current.len() {
                for (kind, candidate) in self.candidates(&current, i) {
                    let previous = std::mem::replace(&mut current[i], candidate);
                    let trial = progression_cost(&current);
                    if trial < cost {
                        log::debug!("optimizer: {kind} at {i} lowers cost {cost} -> {trial}");
                        cost = trial;
                        moves.push((i, kind));
                        improved = true;
                        break 'scan;
                    }
                    current[i] = previous;
                }
            }

            if !improved {
                break;
            }
        }

        OptimizationResult {
            chords: current,
            iterations,
            moves,
            initial_cost,
            final_cost: cost,
        }
    }
}

/// A passing chord between `from` and `to`, when their direct connection is
/// not already smooth and some candidate makes the two-hop path cheaper.
///
/// Candidates, in tie-break order: a diminished seventh a half step above
/// `from`, the dominant of `to`, the ii of `to`.
pub fn suggest_connecting_chord(from: &ChordSymbol, to: &ChordSymbol) -> Option<ChordSymbol> {
    let direct = voice_leading_cost(from, to);
    if direct <= SMOOTH_THRESHOLD {
        return None;
    }

    let candidates = [
        ChordSymbol::new(from.root.transpose(1), ChordQuality::DiminishedSeventh),
        ChordSymbol::new(to.root.transpose(7), ChordQuality::DominantSeventh),
        ChordSymbol::new(to.root.transpose(2), ChordQuality::MinorSeventh),
    ];

    let mut best: Option<(u32, ChordSymbol)> = None;
    for candidate in candidates {
        let cost = voice_leading_cost(from, &candidate) + voice_leading_cost(&candidate, to);
        if cost >= direct {
            continue;
        }
        if best.as_ref().map_or(true, |(b, _)| cost < *b) {
            best = Some((cost, candidate));
        }
    }
    best.map(|(_, chord)| chord)
}

/// Insert a suggested passing chord into every transition that has one.
pub fn insert_passing_chords(chords: &[ChordSymbol]) -> Vec<ChordSymbol> {
    let mut out = Vec::with_capacity(chords.len() * 2);
    for (i, chord) in chords.iter().enumerate() {
        out.push(chord.clone());
        if let Some(next) = chords.get(i + 1) {
            if let Some(passing) = suggest_connecting_chord(chord, next) {
                out.push(passing);
            }
        }
    }
    out
}
