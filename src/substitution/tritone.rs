//! Tritone substitution: a dominant resolving by fifth is replaced by the
//! dominant a tritone away, which shares its guide tones.

use rand::RngCore;

use crate::theory::ChordSymbol;

use super::{roll, Rewrite, Substitution, SubstitutionKind};

/// The tritone substitute of a dominant; any other chord comes back as is.
pub fn substitute(chord: &ChordSymbol) -> ChordSymbol {
    if chord.is_dominant() {
        chord.tritone_substitute()
    } else {
        chord.clone()
    }
}

/// True when `next` lies a fourth above or a fifth above `chord`'s root.
pub fn resolves_by_fifth(chord: &ChordSymbol, next: &ChordSymbol) -> bool {
    matches!(chord.root.interval_to(next.root), 5 | 7)
}

pub fn applies(chord: &ChordSymbol, next: &ChordSymbol) -> bool {
    chord.is_dominant() && resolves_by_fifth(chord, next)
}

/// ii-V with the V swapped for its tritone substitute (Dm7 G7 -> Dm7 Db7).
/// The ii is never touched; a non-dominant V leaves the pair as is.
pub fn apply_to_ii_v(ii: &ChordSymbol, v: &ChordSymbol) -> (ChordSymbol, ChordSymbol) {
    (ii.clone(), substitute(v))
}

/// Substitute the dominants at `indices` in a chain, e.g. G7 C7 F7 with
/// `[1]` becomes G7 Gb7 F7. Out-of-range indices and non-dominants are
/// skipped.
pub fn substitute_chain(chain: &[ChordSymbol], indices: &[usize]) -> Vec<ChordSymbol> {
    chain
        .iter()
        .enumerate()
        .map(|(i, chord)| {
            if indices.contains(&i) {
                substitute(chord)
            } else {
                chord.clone()
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TritoneSubstitution {
    pub probability: f64,
}

impl TritoneSubstitution {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl Substitution for TritoneSubstitution {
    fn kind(&self) -> SubstitutionKind {
        SubstitutionKind::Tritone
    }

    fn apply(&self, chords: &[ChordSymbol], rng: &mut dyn RngCore) -> Rewrite {
        let mut out = chords.to_vec();
        let mut sites = Vec::new();
        for i in 0..chords.len().saturating_sub(1) {
            if applies(&chords[i], &chords[i + 1]) && roll(rng, self.probability) {
                out[i] = substitute(&chords[i]);
                sites.push(i);
            }
        }
        Rewrite { chords: out, sites }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::PitchClass;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn chords(names: &[&str]) -> Vec<ChordSymbol> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    #[test]
    fn replaces_dominant_resolving_down_a_fifth() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let out = TritoneSubstitution::new(1.0).apply(&chords(&["Dm7", "G7", "Cmaj7"]), &mut rng);
        assert_eq!(out.chords[1].root, PitchClass::DB);
        assert!(out.chords[1].is_dominant());
        assert_eq!(out.sites, vec![1]);
        assert_eq!(out.chords[0], chords(&["Dm7"])[0]);
        assert_eq!(out.chords[2], chords(&["Cmaj7"])[0]);
    }

    #[test]
    fn ignores_non_resolving_and_final_dominants() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let input = chords(&["G7", "Ab7", "C7"]);
        let out = TritoneSubstitution::new(1.0).apply(&input, &mut rng);
        assert_eq!(out.chords, input);
        assert!(out.sites.is_empty());
    }

    #[test]
    fn zero_probability_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let input = chords(&["G7", "Cmaj7"]);
        let out = TritoneSubstitution::new(0.0).apply(&input, &mut rng);
        assert_eq!(out.chords, input);
    }

    #[test]
    fn second_pass_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let sub = TritoneSubstitution::new(1.0);
        let once = sub.apply(&chords(&["G7", "Cmaj7"]), &mut rng).chords;
        let twice = sub.apply(&once, &mut rng);
        assert_eq!(twice.chords, once);
        assert!(twice.sites.is_empty());
    }

    #[test]
    fn ii_v_keeps_the_ii() {
        let pair = chords(&["Dm7", "G7"]);
        let (ii, v) = apply_to_ii_v(&pair[0], &pair[1]);
        assert_eq!(ii, pair[0]);
        assert_eq!(v.to_string(), "Db7");

        let plain = chords(&["Dm7", "Gm7"]);
        assert_eq!(apply_to_ii_v(&plain[0], &plain[1]), (plain[0].clone(), plain[1].clone()));
    }

    #[test]
    fn chain_substitutes_selected_dominants() {
        let chain = chords(&["G7", "C7", "F7"]);
        let names = |c: &[ChordSymbol]| c.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert_eq!(names(&substitute_chain(&chain, &[1])), vec!["G7", "Gb7", "F7"]);
        assert_eq!(substitute_chain(&chain, &[]), chain);
        assert_eq!(substitute_chain(&chain, &[7]), chain);

        let mixed = chords(&["Dm7", "G7"]);
        assert_eq!(names(&substitute_chain(&mixed, &[0, 1])), vec!["Dm7", "Db7"]);
    }

    #[test]
    fn substitute_twice_is_identity() {
        let g7: ChordSymbol = "G7".parse().unwrap();
        assert_eq!(substitute(&substitute(&g7)), g7);
        let cmaj7: ChordSymbol = "Cmaj7".parse().unwrap();
        assert_eq!(substitute(&cmaj7), cmaj7);
    }
}
