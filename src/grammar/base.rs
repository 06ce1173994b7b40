//! The built-in jazz grammar. Style parameterization reweights these rules by
//! name but never adds or removes any.

use super::pcfg::Pcfg;
use super::rule::GrammarRule;
use super::symbol::{NonTerminal, RuleKind, Symbol};

pub const SINGLE_PHRASE: &str = "single_phrase";
pub const TDT_FORM: &str = "tdt_form";
pub const TT_FORM: &str = "tt_form";
pub const T_TERMINAL: &str = "t_terminal";
pub const AUTHENTIC_CADENCE: &str = "authentic_cadence";
pub const PLAGAL_CADENCE: &str = "plagal_cadence";
pub const T_RIGHT_PROLONG: &str = "t_right_prolong";
pub const T_LEFT_PROLONG: &str = "t_left_prolong";
pub const D_TERMINAL: &str = "d_terminal";
pub const II_V: &str = "ii_v";
pub const D_PROLONG: &str = "d_prolong";
pub const TRITONE_SUB: &str = "tritone_sub";
pub const SD_IV: &str = "sd_iv";
pub const SD_II: &str = "sd_ii";
pub const SD_BORROWED_IV: &str = "sd_borrowed_iv";
pub const PREP_II: &str = "prep_ii";
pub const PREP_IV: &str = "prep_iv";
pub const PREP_SECONDARY_DOM: &str = "prep_secondary_dom";
pub const PREP_CHAIN: &str = "prep_chain";
pub const PROL_III: &str = "prol_iii";
pub const PROL_VI: &str = "prol_vi";
pub const PROL_I: &str = "prol_i";

/// Build the reference grammar, normalized, with an entropy-seeded generator.
pub fn base_grammar() -> Pcfg {
    let mut g = Pcfg::new(NonTerminal::Start);
    for rule in base_rules() {
        g.add_rule(rule);
    }
    g.normalize();
    g
}

fn base_rules() -> Vec<GrammarRule> {
    use NonTerminal::*;
    use RuleKind as K;

    let nt = Symbol::nt;
    let t = Symbol::terminal;

    vec![
        // Phrase structure
        GrammarRule::new(SINGLE_PHRASE, Start, vec![nt(Tonic)], 0.3, K::Structural),
        GrammarRule::new(
            TDT_FORM,
            Start,
            vec![nt(Tonic), nt(Dominant), nt(Tonic)],
            0.5,
            K::Structural,
        ),
        GrammarRule::new(TT_FORM, Start, vec![nt(Tonic), nt(Tonic)], 0.2, K::Structural),
        // Tonic
        GrammarRule::new(T_TERMINAL, Tonic, vec![t("I", "maj7")], 0.3, K::Terminal),
        GrammarRule::new(
            AUTHENTIC_CADENCE,
            Tonic,
            vec![nt(Dominant), nt(Tonic)],
            0.35,
            K::Preparation,
        ),
        GrammarRule::new(
            PLAGAL_CADENCE,
            Tonic,
            vec![nt(Subdominant), nt(Tonic)],
            0.15,
            K::Preparation,
        ),
        GrammarRule::new(
            T_RIGHT_PROLONG,
            Tonic,
            vec![nt(Tonic), nt(Prolongation)],
            0.1,
            K::Prolongation,
        ),
        GrammarRule::new(
            T_LEFT_PROLONG,
            Tonic,
            vec![nt(Prolongation), nt(Tonic)],
            0.1,
            K::Prolongation,
        ),
        // Dominant
        GrammarRule::new(D_TERMINAL, Dominant, vec![t("V", "7")], 0.4, K::Terminal),
        GrammarRule::new(
            II_V,
            Dominant,
            vec![nt(Preparation), nt(Dominant)],
            0.4,
            K::Preparation,
        ),
        GrammarRule::new(
            D_PROLONG,
            Dominant,
            vec![nt(Dominant), nt(Prolongation)],
            0.1,
            K::Prolongation,
        ),
        GrammarRule::new(TRITONE_SUB, Dominant, vec![t("bII", "7")], 0.1, K::Substitution),
        // Subdominant
        GrammarRule::new(SD_IV, Subdominant, vec![t("IV", "maj7")], 0.5, K::Terminal),
        GrammarRule::new(SD_II, Subdominant, vec![t("ii", "min7")], 0.3, K::Terminal),
        GrammarRule::new(SD_BORROWED_IV, Subdominant, vec![t("iv", "min7")], 0.2, K::Terminal),
        // Preparation
        GrammarRule::new(PREP_II, Preparation, vec![t("ii", "min7")], 0.5, K::Terminal),
        GrammarRule::new(PREP_IV, Preparation, vec![t("IV", "maj7")], 0.2, K::Terminal),
        GrammarRule::new(
            PREP_SECONDARY_DOM,
            Preparation,
            vec![t("V/V", "7")],
            0.15,
            K::Terminal,
        ),
        GrammarRule::new(
            PREP_CHAIN,
            Preparation,
            vec![nt(Preparation), nt(Preparation)],
            0.15,
            K::Prolongation,
        ),
        // Prolongation
        GrammarRule::new(PROL_III, Prolongation, vec![t("iii", "min7")], 0.3, K::Terminal),
        GrammarRule::new(PROL_VI, Prolongation, vec![t("vi", "min7")], 0.4, K::Terminal),
        GrammarRule::new(PROL_I, Prolongation, vec![t("I", "maj7")], 0.3, K::Terminal),
    ]
}
