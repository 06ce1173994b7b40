//! Style to grammar: a pure rebuild of the base grammar's weights.

use crate::grammar::base::{
    AUTHENTIC_CADENCE, D_TERMINAL, II_V, PLAGAL_CADENCE, PREP_CHAIN, PREP_SECONDARY_DOM,
    SD_BORROWED_IV, TRITONE_SUB,
};
use crate::grammar::{base_grammar, NonTerminal, Pcfg};

use super::vector::StyleVector;

/// Build a fresh normalized grammar weighted for `style`.
///
/// Always starts from the base grammar, so the same style yields identical
/// weights no matter what was built before. The returned grammar has an
/// entropy-seeded generator; callers wanting reproducibility reseed it.
pub fn style_to_pcfg(style: &StyleVector) -> Pcfg {
    let mut g = base_grammar();

    let chain = (style.dominant_chain_depth as f64 / 4.0).min(1.0);
    let prolong = 0.1 * (1.0 + style.prolongation_depth as f64 * 0.2);

    g.set_rule_weight(II_V, 0.4 * style.ii_v_preference);
    g.set_rule_weight(D_TERMINAL, 0.4 * (1.0 - style.ii_v_preference * 0.3));
    g.set_rule_weight(TRITONE_SUB, 0.15 * style.tritone_sub_prob);
    g.set_rule_weight(AUTHENTIC_CADENCE, 0.35 * style.ii_v_preference);
    g.set_rule_weight(PLAGAL_CADENCE, 0.15 * (1.0 + style.modal_interchange * 0.5));
    g.set_rule_weight(PREP_CHAIN, 0.15 * chain);
    g.set_rule_weight(PREP_SECONDARY_DOM, 0.15 * style.secondary_dom_prob);
    g.set_rule_weight(SD_BORROWED_IV, 0.2 * (1.0 + style.modal_interchange));

    for rule in g.rules_mut(NonTerminal::Tonic) {
        if rule.name.contains("prolong") {
            rule.set_weight(prolong);
        }
    }

    g.normalize();
    g
}
