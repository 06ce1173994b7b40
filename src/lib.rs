//! Jazzgen: grammar-driven jazz chord progression generator.
//!
//! A probabilistic context-free grammar over harmonic functions derives a
//! progression, a style vector reweights the grammar and drives reharmonization
//! (backdoor, tritone, Coltrane), and a guide-tone optimizer smooths the
//! voice leading.

pub mod derivation;
pub mod evaluation;
pub mod grammar;
pub mod style;
pub mod substitution;
pub mod theory;
pub mod voice_leading;
