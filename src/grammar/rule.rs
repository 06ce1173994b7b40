//! Weighted production rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::symbol::{NonTerminal, RuleKind, Symbol};

/// A production `lhs -> rhs` with a sampling weight in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarRule {
    pub lhs: NonTerminal,
    pub rhs: Vec<Symbol>,
    weight: f64,
    pub kind: RuleKind,
    pub name: String,
}

impl GrammarRule {
    /// Create a rule. The weight is clamped to [0, 1].
    pub fn new(
        name: impl Into<String>,
        lhs: NonTerminal,
        rhs: Vec<Symbol>,
        weight: f64,
        kind: RuleKind,
    ) -> Self {
        Self {
            lhs,
            rhs,
            weight: clamp_weight(weight),
            kind,
            name: name.into(),
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = clamp_weight(weight);
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == RuleKind::Terminal
    }
}

fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

impl fmt::Display for GrammarRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs: Vec<String> = self.rhs.iter().map(|s| s.to_string()).collect();
        write!(
            f,
            "{} -> {} [{:.3}] ({})",
            self.lhs,
            rhs.join(" "),
            self.weight,
            self.name
        )
    }
}
