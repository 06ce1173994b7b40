//! Top-down stochastic derivation.
//!
//! A [`Deriver`] expands a start symbol into a [`DerivationNode`] tree under a
//! depth bound. Keys flow from parent to child: a non-terminal may carry its
//! own key override, and a secondary-dominant terminal (`V/X`) moves its leaf
//! into the key of `X`. Expansion never fails; a category with nothing to
//! expand collapses to its [`default_terminal`].

pub mod convert;
pub mod tree;

pub use convert::{chords_from_tree, default_terminal, format_progression, terminal_to_chord};
pub use tree::DerivationNode;

use crate::grammar::{degree_offset, NonTerminal, Pcfg, Symbol};
use crate::theory::PitchClass;

/// Hard ceiling on derivation depth regardless of requested length.
pub const MAX_DERIVATION_DEPTH: usize = 6;

/// Depth bound used for a target progression length.
pub fn depth_for_length(length: usize) -> usize {
    (length / 2 + 2).min(MAX_DERIVATION_DEPTH)
}

/// Expands symbols against a grammar, drawing from the grammar's generator.
pub struct Deriver<'g> {
    grammar: &'g mut Pcfg,
    max_depth: usize,
}

impl<'g> Deriver<'g> {
    pub fn new(grammar: &'g mut Pcfg, max_depth: usize) -> Self {
        Self { grammar, max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Derive from the grammar's start symbol in `key`.
    pub fn run(&mut self, key: PitchClass) -> DerivationNode {
        let start = Symbol::nt(self.grammar.start_symbol());
        self.derive(&start, 0, key)
    }

    pub fn derive(&mut self, symbol: &Symbol, depth: usize, key: PitchClass) -> DerivationNode {
        let (category, key) = match symbol {
            Symbol::Terminal(_) => return DerivationNode::leaf(symbol.clone(), key),
            Symbol::NonTerminal {
                category,
                key: override_key,
            } => (*category, override_key.unwrap_or(key)),
        };

        let rule = if depth >= self.max_depth {
            self.grammar.sample_terminal_rule(category).cloned()
        } else {
            self.grammar.sample_rule(category).cloned()
        };
        let Some(rule) = rule else {
            if depth < self.max_depth {
                log::warn!("no rules for {category}, using default terminal");
            }
            return collapse(category, key);
        };

        let children = rule
            .rhs
            .iter()
            .map(|child| self.derive(child, depth + 1, child_key(child, key)))
            .collect();

        DerivationNode {
            symbol: symbol.clone(),
            key,
            children,
            rule: Some(rule),
        }
    }
}

fn collapse(category: NonTerminal, key: PitchClass) -> DerivationNode {
    DerivationNode::leaf(Symbol::Terminal(default_terminal(category)), key)
}

fn child_key(child: &Symbol, key: PitchClass) -> PitchClass {
    match child {
        Symbol::NonTerminal {
            key: Some(own), ..
        } => *own,
        Symbol::NonTerminal { key: None, .. } => key,
        Symbol::Terminal(terminal) => match terminal.secondary_target() {
            Some(target) => key.transpose(degree_offset(target) as i32),
            None => key,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{base_grammar, GrammarRule, RuleKind};
    use crate::theory::{ChordQuality, ChordSymbol};

    fn single_rule_grammar(lhs: NonTerminal, rhs: Vec<Symbol>, kind: RuleKind) -> Pcfg {
        let mut g = Pcfg::with_seed(NonTerminal::Start, 1);
        g.add_rule(GrammarRule::new("only", lhs, rhs, 1.0, kind));
        g
    }

    fn names(chords: &[ChordSymbol]) -> Vec<String> {
        chords.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn depth_for_length_is_capped() {
        assert_eq!(depth_for_length(1), 2);
        assert_eq!(depth_for_length(4), 4);
        assert_eq!(depth_for_length(8), 6);
        assert_eq!(depth_for_length(64), 6);
    }

    #[test]
    fn empty_grammar_collapses_to_tonic() {
        let mut g = Pcfg::with_seed(NonTerminal::Start, 3);
        let tree = Deriver::new(&mut g, 4).run(PitchClass::EB);
        assert_eq!(names(&chords_from_tree(&tree)), vec!["Ebmaj7"]);
        assert!(tree.rule.is_none());
        assert!(tree.is_terminal());
        assert!(tree.children.is_empty());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn secondary_dominant_modulates_leaf() {
        let mut g = single_rule_grammar(
            NonTerminal::Start,
            vec![
                Symbol::terminal("V/V", "7"),
                Symbol::terminal("V", "7"),
                Symbol::terminal("I", "maj7"),
            ],
            RuleKind::Structural,
        );
        let tree = Deriver::new(&mut g, 6).run(PitchClass::C);
        assert_eq!(names(&chords_from_tree(&tree)), vec!["D7", "G7", "Cmaj7"]);
        assert_eq!(tree.children[0].key, PitchClass::G);
        assert_eq!(tree.children[1].key, PitchClass::C);
    }

    #[test]
    fn key_override_is_inherited_below() {
        let mut g = single_rule_grammar(
            NonTerminal::Start,
            vec![
                Symbol::nt_in(NonTerminal::Dominant, PitchClass::F),
                Symbol::nt(NonTerminal::Tonic),
            ],
            RuleKind::Structural,
        );
        g.add_rule(GrammarRule::new(
            "d",
            NonTerminal::Dominant,
            vec![Symbol::nt(NonTerminal::Preparation), Symbol::terminal("V", "7")],
            1.0,
            RuleKind::Preparation,
        ));
        g.add_rule(GrammarRule::new(
            "p",
            NonTerminal::Preparation,
            vec![Symbol::terminal("ii", "min7")],
            1.0,
            RuleKind::Terminal,
        ));
        let tree = Deriver::new(&mut g, 6).run(PitchClass::C);
        // Tonic has no rules and falls back to I in the inherited key.
        assert_eq!(
            names(&chords_from_tree(&tree)),
            vec!["Gm7", "C7", "Cmaj7"]
        );
    }

    #[test]
    fn depth_bound_restricts_to_terminal_rules() {
        let mut g = Pcfg::with_seed(NonTerminal::Tonic, 5);
        g.add_rule(GrammarRule::new(
            "recurse",
            NonTerminal::Tonic,
            vec![Symbol::nt(NonTerminal::Tonic), Symbol::nt(NonTerminal::Tonic)],
            1.0,
            RuleKind::Prolongation,
        ));
        g.add_rule(GrammarRule::new(
            "leaf",
            NonTerminal::Tonic,
            vec![Symbol::terminal("vi", "min7")],
            0.0,
            RuleKind::Terminal,
        ));
        let tree = Deriver::new(&mut g, 3).run(PitchClass::C);
        // Full binary expansion to depth 3, then the zero-weight terminal rule.
        assert_eq!(tree.leaf_count(), 8);
        let chords = chords_from_tree(&tree);
        assert!(chords
            .iter()
            .all(|c| c.root == PitchClass::A && c.quality == ChordQuality::MinorSeventh));
    }

    #[test]
    fn base_grammar_trees_stay_bounded() {
        let mut g = base_grammar();
        for seed in 0..40 {
            g.set_seed(seed);
            let max_depth = depth_for_length(8);
            let tree = Deriver::new(&mut g, max_depth).run(PitchClass::C);
            assert!(tree.depth() <= max_depth + 2, "seed {seed}: {}", tree.depth());
            let chords = chords_from_tree(&tree);
            assert_eq!(chords.len(), tree.leaf_count());
            assert!(!chords.is_empty());
        }
    }

    #[test]
    fn same_seed_same_tree() {
        let mut a = base_grammar();
        let mut b = base_grammar();
        a.set_seed(11);
        b.set_seed(11);
        let ta = Deriver::new(&mut a, 5).run(PitchClass::BB);
        let tb = Deriver::new(&mut b, 5).run(PitchClass::BB);
        assert_eq!(ta, tb);
    }
}
