//! Music theory primitives shared by every stage of the generator.

pub mod chord;
pub mod parse;
pub mod pitch;
pub mod quality;

pub use chord::{Accidental, ChordSymbol, Extension, DEFAULT_DURATION_BEATS};
pub use parse::{edit_chord, ChordParseError, EditError};
pub use pitch::PitchClass;
pub use quality::ChordQuality;
