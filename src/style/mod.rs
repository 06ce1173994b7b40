//! Style: a flat parameter vector, era presets, the pure style-to-grammar
//! mapping, and the [`StyleEngine`] that runs the full generation pipeline.

pub mod engine;
pub mod params;
pub mod persistence;
pub mod presets;
pub mod tension;
pub mod vector;

pub use engine::{adjust_length, GeneratedProgression, StyleEngine};
pub use params::style_to_pcfg;
pub use persistence::{default_style_path, load_style, reset_style, save_style, StyleConfigError};
pub use presets::{style_by_id, StylePreset};
pub use tension::add_tensions;
pub use vector::{StyleVector, MAX_DEPTH_PARAM};
