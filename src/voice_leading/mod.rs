//! Guide-tone voice leading: a pairwise cost model, progression analysis, and
//! a deterministic optimizer that trades dominants for smoother substitutes.

pub mod guide_tone;
pub mod optimizer;

pub use guide_tone::{
    analyze_progression, analyze_voice_leading, average_cost, min_interval, progression_cost,
    smoothest_voicing, voice_leading_cost, voice_leading_quality, GuideTone, MotionKind,
    ProgressionAnalysis, VoiceConnection, ROUGH_THRESHOLD, SMOOTH_THRESHOLD,
};
pub use optimizer::{
    insert_passing_chords, suggest_connecting_chord, OptimizationResult, VoiceLeadingOptimizer,
    DEFAULT_MAX_ITERATIONS,
};
