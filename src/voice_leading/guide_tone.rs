//! Guide-tone voice-leading cost.
//!
//! Only thirds and sevenths are tracked. Moving from one chord to the next
//! costs the smaller of the straight pairing (3->3, 7->7) and the voice
//! exchange (3->7, 7->3), each measured in circular semitones.

use serde::Serialize;

use crate::theory::{ChordSymbol, PitchClass};

/// Transitions at or below this cost count as smooth.
pub const SMOOTH_THRESHOLD: u32 = 2;
/// Transitions above this cost count as rough.
pub const ROUGH_THRESHOLD: u32 = 4;

/// Shortest distance between two pitch classes, 0..=6.
pub fn min_interval(a: PitchClass, b: PitchClass) -> u32 {
    a.distance(b) as u32
}

pub fn voice_leading_cost(from: &ChordSymbol, to: &ChordSymbol) -> u32 {
    let (t1, s1) = from.guide_tones();
    let (t2, s2) = to.guide_tones();
    let straight = min_interval(t1, t2) + min_interval(s1, s2);
    let exchange = min_interval(t1, s2) + min_interval(s1, t2);
    straight.min(exchange)
}

/// Sum of pairwise costs over consecutive chords.
pub fn progression_cost(chords: &[ChordSymbol]) -> u32 {
    chords
        .windows(2)
        .map(|w| voice_leading_cost(&w[0], &w[1]))
        .sum()
}

pub fn average_cost(chords: &[ChordSymbol]) -> f64 {
    if chords.len() < 2 {
        return 0.0;
    }
    progression_cost(chords) as f64 / (chords.len() - 1) as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    CommonTone,
    Step,
    Skip,
    Leap,
}

impl MotionKind {
    pub fn classify(semitones: u32) -> Self {
        match semitones {
            0 => MotionKind::CommonTone,
            1..=2 => MotionKind::Step,
            3..=4 => MotionKind::Skip,
            _ => MotionKind::Leap,
        }
    }

    /// Cost multiplier: skips and leaps are penalized.
    pub fn weight(self) -> f64 {
        match self {
            MotionKind::CommonTone | MotionKind::Step => 1.0,
            MotionKind::Skip | MotionKind::Leap => 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideTone {
    Third,
    Seventh,
}

/// One guide tone moving to one guide tone of the next chord.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceConnection {
    pub from_role: GuideTone,
    pub from: PitchClass,
    pub to_role: GuideTone,
    pub to: PitchClass,
    pub semitones: u32,
    pub motion: MotionKind,
    pub weighted_cost: f64,
}

/// All four guide-tone connections between two chords, third-first.
pub fn analyze_voice_leading(from: &ChordSymbol, to: &ChordSymbol) -> Vec<VoiceConnection> {
    let (t1, s1) = from.guide_tones();
    let (t2, s2) = to.guide_tones();
    let sources = [(GuideTone::Third, t1), (GuideTone::Seventh, s1)];
    let targets = [(GuideTone::Third, t2), (GuideTone::Seventh, s2)];

    let mut connections = Vec::with_capacity(4);
    for (from_role, from_pc) in sources {
        for (to_role, to_pc) in targets {
            let semitones = min_interval(from_pc, to_pc);
            let motion = MotionKind::classify(semitones);
            connections.push(VoiceConnection {
                from_role,
                from: from_pc,
                to_role,
                to: to_pc,
                semitones,
                motion,
                weighted_cost: semitones as f64 * motion.weight(),
            });
        }
    }
    connections
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionAnalysis {
    pub transition_costs: Vec<u32>,
    pub total_cost: u32,
    pub average_cost: f64,
    pub smooth_transitions: usize,
    pub rough_transitions: usize,
}

impl ProgressionAnalysis {
    /// Fraction of transitions that are smooth; 0 for fewer than two chords.
    pub fn smooth_ratio(&self) -> f64 {
        if self.transition_costs.is_empty() {
            0.0
        } else {
            self.smooth_transitions as f64 / self.transition_costs.len() as f64
        }
    }
}

pub fn analyze_progression(chords: &[ChordSymbol]) -> ProgressionAnalysis {
    let transition_costs: Vec<u32> = chords
        .windows(2)
        .map(|w| voice_leading_cost(&w[0], &w[1]))
        .collect();
    let total_cost = transition_costs.iter().sum();
    ProgressionAnalysis {
        smooth_transitions: transition_costs
            .iter()
            .filter(|c| **c <= SMOOTH_THRESHOLD)
            .count(),
        rough_transitions: transition_costs
            .iter()
            .filter(|c| **c > ROUGH_THRESHOLD)
            .count(),
        average_cost: average_cost(chords),
        total_cost,
        transition_costs,
    }
}

/// Order `chord`'s guide tones (upper voice first) to sit closest to the
/// previous pair. Ties keep third-then-seventh.
pub fn smoothest_voicing(
    chord: &ChordSymbol,
    previous: (PitchClass, PitchClass),
) -> (PitchClass, PitchClass) {
    let (third, seventh) = chord.guide_tones();
    let (p1, p2) = previous;
    let straight = min_interval(p1, third) + min_interval(p2, seventh);
    let exchange = min_interval(p1, seventh) + min_interval(p2, third);
    if straight <= exchange {
        (third, seventh)
    } else {
        (seventh, third)
    }
}

/// 0-100 score, 100 meaning every transition keeps both guide tones.
pub fn voice_leading_quality(chords: &[ChordSymbol]) -> f64 {
    (100.0 - average_cost(chords) * 16.67).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn chord(name: &str) -> ChordSymbol {
        name.parse().unwrap()
    }

    fn chords(names: &[&str]) -> Vec<ChordSymbol> {
        names.iter().map(|n| chord(n)).collect()
    }

    #[test]
    fn ii_v_i_is_smooth() {
        // Dm7 (F, C) -> G7 (B, F): F stays, C falls to B.
        assert_eq!(voice_leading_cost(&chord("Dm7"), &chord("G7")), 1);
        // G7 (B, F) -> Cmaj7 (E, B): B stays, F falls to E.
        assert_eq!(voice_leading_cost(&chord("G7"), &chord("Cmaj7")), 1);
        assert_eq!(progression_cost(&chords(&["Dm7", "G7", "Cmaj7"])), 2);
    }

    #[test]
    fn cost_is_zero_for_shared_guide_tones() {
        assert_eq!(voice_leading_cost(&chord("G7"), &chord("G7")), 0);
        // Tritone partners share the pair, exchanged.
        assert_eq!(voice_leading_cost(&chord("G7"), &chord("Db7")), 0);
        assert!(voice_leading_cost(&chord("Cmaj7"), &chord("F#maj7")) > 0);
    }

    #[test]
    fn cost_is_symmetric_and_bounded() {
        let pool = chords(&["Cmaj7", "Dm7", "G7", "Bm7b5", "Ebdim7", "Abaug", "Fm6", "Bbsus4"]);
        for a in &pool {
            for b in &pool {
                let c = voice_leading_cost(a, b);
                assert_eq!(c, voice_leading_cost(b, a));
                assert!(c <= 12);
            }
        }
    }

    #[test]
    fn motion_classification() {
        assert_eq!(MotionKind::classify(0), MotionKind::CommonTone);
        assert_eq!(MotionKind::classify(2), MotionKind::Step);
        assert_eq!(MotionKind::classify(4), MotionKind::Skip);
        assert_eq!(MotionKind::classify(5), MotionKind::Leap);
    }

    #[test]
    fn four_connections_with_penalties() {
        let conns = analyze_voice_leading(&chord("Dm7"), &chord("G7"));
        assert_eq!(conns.len(), 4);
        // third F -> seventh F is a common tone
        let common = conns
            .iter()
            .find(|c| c.from_role == GuideTone::Third && c.to_role == GuideTone::Seventh)
            .unwrap();
        assert_eq!(common.motion, MotionKind::CommonTone);
        // third F -> third B is a tritone leap, weighted 1.5
        let leap = conns
            .iter()
            .find(|c| c.from_role == GuideTone::Third && c.to_role == GuideTone::Third)
            .unwrap();
        assert_eq!(leap.semitones, 6);
        assert_approx_eq!(leap.weighted_cost, 9.0);
    }

    #[test]
    fn progression_analysis_counts() {
        let analysis = analyze_progression(&chords(&["Dm7", "G7", "Cmaj7", "Ebm7"]));
        assert_eq!(analysis.transition_costs.len(), 3);
        assert_eq!(analysis.smooth_transitions, 2);
        assert_eq!(analysis.total_cost, analysis.transition_costs.iter().sum::<u32>());
        assert_approx_eq!(analysis.average_cost, analysis.total_cost as f64 / 3.0);
        assert_approx_eq!(analysis.smooth_ratio(), 2.0 / 3.0);
    }

    #[test]
    fn single_chord_has_no_cost() {
        assert_eq!(progression_cost(&chords(&["C7"])), 0);
        assert_eq!(average_cost(&[]), 0.0);
        assert_eq!(voice_leading_quality(&chords(&["C7"])), 100.0);
    }

    #[test]
    fn smoothest_voicing_prefers_exchange_when_closer() {
        // From Dm7 voiced (F, C): G7 is closer as (F, B) than (B, F).
        let voicing = smoothest_voicing(&chord("G7"), (PitchClass::F, PitchClass::C));
        assert_eq!(voicing, (PitchClass::F, PitchClass::B));
    }

    #[test]
    fn quality_drops_with_cost() {
        let smooth = voice_leading_quality(&chords(&["Dm7", "G7", "Cmaj7"]));
        let rough = voice_leading_quality(&chords(&["Cmaj7", "F#maj7", "Cmaj7"]));
        assert!(smooth > rough);
        assert!(rough >= 0.0);
    }
}
