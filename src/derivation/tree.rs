//! Owned derivation trees.

use std::fmt;

use serde::Serialize;

use crate::grammar::{GrammarRule, Symbol, Terminal};
use crate::theory::PitchClass;

/// One node of a derivation. Parents own their children; there are no
/// back-references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivationNode {
    pub symbol: Symbol,
    /// Key in force at this node after overrides and modulation.
    pub key: PitchClass,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DerivationNode>,
    /// Rule that produced `children`; absent for leaves and fallbacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<GrammarRule>,
}

impl DerivationNode {
    pub fn leaf(symbol: Symbol, key: PitchClass) -> Self {
        Self {
            symbol,
            key,
            children: Vec::new(),
            rule: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.symbol.is_terminal()
    }

    /// Terminal leaves read left to right, each with its resolved key.
    pub fn terminals(&self) -> Vec<(&Terminal, PitchClass)> {
        let mut out = Vec::new();
        self.collect_terminals(&mut out);
        out
    }

    fn collect_terminals<'a>(&'a self, out: &mut Vec<(&'a Terminal, PitchClass)>) {
        if let Symbol::Terminal(t) = &self.symbol {
            out.push((t, self.key));
        }
        for child in &self.children {
            child.collect_terminals(out);
        }
    }

    /// Levels in the tree, counting this node (a lone leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    pub fn leaf_count(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            self.children.iter().map(Self::leaf_count).sum()
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}{} @{}", "", self.symbol, self.key, indent = indent * 2)?;
        if let Some(rule) = &self.rule {
            write!(f, "  <{}>", rule.name)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.render(f, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DerivationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
