//! Probabilistic grammar over harmonic functions.
//!
//! [`Symbol`]s are either expandable functional categories ([`NonTerminal`])
//! or chord-function [`Terminal`]s. A [`Pcfg`] holds weighted
//! [`GrammarRule`]s per category and owns the seedable generator every later
//! pipeline stage draws from.

pub mod base;
pub mod pcfg;
pub mod rule;
pub mod symbol;

pub use base::base_grammar;
pub use pcfg::Pcfg;
pub use rule::GrammarRule;
pub use symbol::{
    degree_offset, degree_semitones, quality_for_label, NonTerminal, RuleKind, Symbol, Terminal,
};
