//! Probabilistic context-free grammar with a seedable sampling source.

use std::collections::BTreeMap;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::rule::GrammarRule;
use super::symbol::NonTerminal;

/// Rules per non-terminal plus the random source used to sample them.
///
/// Sampling advances the generator, so one `Pcfg` must not be shared across
/// concurrent derivations without serializing access.
#[derive(Debug, Clone)]
pub struct Pcfg {
    start: NonTerminal,
    rules: BTreeMap<NonTerminal, Vec<GrammarRule>>,
    rng: ChaCha8Rng,
}

impl Pcfg {
    /// Empty grammar with an entropy-seeded generator.
    pub fn new(start: NonTerminal) -> Self {
        Self {
            start,
            rules: BTreeMap::new(),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(start: NonTerminal, seed: u64) -> Self {
        Self {
            start,
            rules: BTreeMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn start_symbol(&self) -> NonTerminal {
        self.start
    }

    pub fn add_rule(&mut self, rule: GrammarRule) {
        self.rules.entry(rule.lhs).or_default().push(rule);
    }

    pub fn rules(&self, nt: NonTerminal) -> &[GrammarRule] {
        self.rules.get(&nt).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rules_mut(&mut self, nt: NonTerminal) -> &mut [GrammarRule] {
        self.rules
            .get_mut(&nt)
            .map(Vec::as_mut_slice)
            .unwrap_or(&mut [])
    }

    /// Every rule, grouped by non-terminal in a stable order.
    pub fn all_rules(&self) -> impl Iterator<Item = &GrammarRule> {
        self.rules.values().flatten()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn total_weight(&self, nt: NonTerminal) -> f64 {
        self.rules(nt).iter().map(GrammarRule::weight).sum()
    }

    pub fn find_rule(&self, name: &str) -> Option<&GrammarRule> {
        self.all_rules().find(|r| r.name == name)
    }

    /// Set the weight of the named rule (clamped). Returns false if no rule
    /// has that name.
    pub fn set_rule_weight(&mut self, name: &str, weight: f64) -> bool {
        match self.rules.values_mut().flatten().find(|r| r.name == name) {
            Some(rule) => {
                rule.set_weight(weight);
                true
            }
            None => false,
        }
    }

    /// Rescale each non-terminal's weights to sum to 1. All-zero groups are
    /// left as they are.
    pub fn normalize(&mut self) {
        for rules in self.rules.values_mut() {
            let total: f64 = rules.iter().map(GrammarRule::weight).sum();
            if total > 0.0 {
                for rule in rules.iter_mut() {
                    let w = rule.weight() / total;
                    rule.set_weight(w);
                }
            }
        }
    }

    /// Index of a rule for `nt`, drawn proportionally to weight.
    pub fn sample_index(&mut self, nt: NonTerminal) -> Option<usize> {
        let rules = self.rules.get(&nt).filter(|r| !r.is_empty())?;
        let total: f64 = rules.iter().map(GrammarRule::weight).sum();
        if total <= 0.0 {
            return Some(self.rng.gen_range(0..rules.len()));
        }

        let r = self.rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for (i, rule) in rules.iter().enumerate() {
            cumulative += rule.weight();
            if r < cumulative {
                return Some(i);
            }
        }
        Some(rules.len() - 1)
    }

    /// Draw one rule for `nt`; `None` if the non-terminal has no rules.
    pub fn sample_rule(&mut self, nt: NonTerminal) -> Option<&GrammarRule> {
        let index = self.sample_index(nt)?;
        let rule = &self.rules[&nt][index];
        log::trace!("sampled {rule}");
        Some(rule)
    }

    /// Uniform choice among the terminal-kind rules of `nt`.
    pub fn sample_terminal_rule(&mut self, nt: NonTerminal) -> Option<&GrammarRule> {
        let rules = self.rules.get(&nt)?;
        let terminals: Vec<&GrammarRule> = rules.iter().filter(|r| r.is_terminal()).collect();
        if terminals.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..terminals.len());
        Some(terminals[pick])
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// The grammar's generator, for pipeline stages that draw after derivation.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

impl fmt::Display for Pcfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        for rule in self.all_rules() {
            writeln!(f, "  {rule}")?;
        }
        Ok(())
    }
}
