//! Idiomatic reharmonization over a derived chord sequence.
//!
//! Each transform implements [`Substitution`]: a structural precondition is
//! checked first, and only a match consumes a draw from the generator. The
//! [`SubstitutionPipeline`] runs them in a fixed order (backdoor, tritone,
//! Coltrane), each stage reading what the previous one produced.

pub mod backdoor;
pub mod coltrane;
pub mod tritone;

use std::fmt;

use rand::{Rng, RngCore};
use serde::Serialize;

use crate::style::StyleVector;
use crate::theory::ChordSymbol;

pub use backdoor::BackdoorSubstitution;
pub use coltrane::{ColtraneSubstitution, ThirdsDirection};
pub use tritone::TritoneSubstitution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionKind {
    Backdoor,
    Tritone,
    Coltrane,
}

impl SubstitutionKind {
    pub fn name(self) -> &'static str {
        match self {
            SubstitutionKind::Backdoor => "backdoor",
            SubstitutionKind::Tritone => "tritone",
            SubstitutionKind::Coltrane => "coltrane",
        }
    }
}

impl fmt::Display for SubstitutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One substitution that fired: its kind and where the rewritten chords start
/// in that stage's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedSubstitution {
    pub kind: SubstitutionKind,
    pub index: usize,
}

/// Output of a single transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub chords: Vec<ChordSymbol>,
    pub sites: Vec<usize>,
}

/// A stateless reharmonization transform.
///
/// Implementations must only touch chords inside a matched window and must
/// be a no-op wherever their precondition does not hold.
pub trait Substitution {
    fn kind(&self) -> SubstitutionKind;
    fn apply(&self, chords: &[ChordSymbol], rng: &mut dyn RngCore) -> Rewrite;
}

/// Bernoulli draw with the probability clamped into [0, 1].
pub(crate) fn roll(rng: &mut dyn RngCore, probability: f64) -> bool {
    let p = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    rng.gen_bool(p)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionOutcome {
    pub chords: Vec<ChordSymbol>,
    pub applied: Vec<AppliedSubstitution>,
}

/// Ordered list of transforms.
#[derive(Default)]
pub struct SubstitutionPipeline {
    stages: Vec<Box<dyn Substitution>>,
}

impl SubstitutionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdoor, tritone and Coltrane stages at the style's probabilities.
    /// Stages whose probability is zero are left out.
    pub fn for_style(style: &StyleVector) -> Self {
        let mut pipeline = Self::new();
        if style.backdoor_prob > 0.0 {
            pipeline.push(BackdoorSubstitution::new(style.backdoor_prob));
        }
        if style.tritone_sub_prob > 0.0 {
            pipeline.push(TritoneSubstitution::new(style.tritone_sub_prob));
        }
        if style.coltrane_prob > 0.0 {
            pipeline.push(ColtraneSubstitution::new(style.coltrane_prob));
        }
        pipeline
    }

    pub fn push(&mut self, stage: impl Substitution + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn kinds(&self) -> Vec<SubstitutionKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn apply(&self, chords: &[ChordSymbol], rng: &mut dyn RngCore) -> SubstitutionOutcome {
        let mut current = chords.to_vec();
        let mut applied = Vec::new();
        for stage in &self.stages {
            let rewrite = stage.apply(&current, rng);
            for &index in &rewrite.sites {
                log::debug!("{} substitution at {}", stage.kind(), index);
                applied.push(AppliedSubstitution {
                    kind: stage.kind(),
                    index,
                });
            }
            current = rewrite.chords;
        }
        SubstitutionOutcome {
            chords: current,
            applied,
        }
    }
}
