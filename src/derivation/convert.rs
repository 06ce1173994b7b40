//! Terminal-to-chord conversion and progression formatting.

use crate::grammar::{degree_offset, quality_for_label, NonTerminal, Terminal};
use crate::theory::{ChordSymbol, PitchClass};

use super::tree::DerivationNode;

/// The chord a non-terminal collapses to when the grammar cannot expand it.
pub fn default_terminal(nt: NonTerminal) -> Terminal {
    match nt {
        NonTerminal::Start | NonTerminal::Tonic | NonTerminal::Phrase => Terminal::new("I", "maj7"),
        NonTerminal::Dominant => Terminal::new("V", "7"),
        NonTerminal::Subdominant => Terminal::new("IV", "maj7"),
        NonTerminal::Preparation => Terminal::new("ii", "min7"),
        NonTerminal::Prolongation => Terminal::new("vi", "min7"),
    }
}

/// Convert a terminal to a chord in `key`.
///
/// `key` is the leaf's resolved key. For a secondary dominant that key has
/// already been moved to the target degree, so the chord is simply the V of
/// it: `V/V` in C resolves in G and yields D7.
pub fn terminal_to_chord(terminal: &Terminal, key: PitchClass) -> ChordSymbol {
    let base = if terminal.key_relative {
        key
    } else {
        PitchClass::C
    };
    let degree = match terminal.secondary_target() {
        Some(_) => "V",
        None => terminal.degree.as_str(),
    };
    let root = base.transpose(degree_offset(degree) as i32);
    ChordSymbol::new(root, quality_for_label(&terminal.quality))
}

/// Chord sequence spelled by a derivation tree's leaves.
pub fn chords_from_tree(tree: &DerivationNode) -> Vec<ChordSymbol> {
    tree.terminals()
        .into_iter()
        .map(|(terminal, key)| terminal_to_chord(terminal, key))
        .collect()
}

/// Lead-sheet text: chords separated by ` | `, a line break every
/// `bars_per_line` chords (0 keeps everything on one line).
pub fn format_progression(chords: &[ChordSymbol], bars_per_line: usize) -> String {
    if bars_per_line == 0 {
        return join_bars(chords);
    }
    chords
        .chunks(bars_per_line)
        .map(join_bars)
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_bars(chords: &[ChordSymbol]) -> String {
    chords
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::ChordQuality;

    #[test]
    fn converts_key_relative_degrees() {
        let chord = terminal_to_chord(&Terminal::new("ii", "min7"), PitchClass::F);
        assert_eq!(chord.root, PitchClass::G);
        assert_eq!(chord.quality, ChordQuality::MinorSeventh);

        let chord = terminal_to_chord(&Terminal::new("bII", "7"), PitchClass::C);
        assert_eq!(chord.root, PitchClass::DB);
    }

    #[test]
    fn absolute_terminals_ignore_key() {
        let chord = terminal_to_chord(&Terminal::absolute("IV", "maj7"), PitchClass::A);
        assert_eq!(chord.root, PitchClass::F);
    }

    #[test]
    fn secondary_dominant_is_v_of_local_key() {
        // Derivation hands the leaf the key of the target degree (G for V/V in C).
        let chord = terminal_to_chord(&Terminal::new("V/V", "7"), PitchClass::G);
        assert_eq!(chord.root, PitchClass::D);
        assert!(chord.is_dominant());
    }

    #[test]
    fn unknown_quality_label_is_dominant() {
        let chord = terminal_to_chord(&Terminal::new("I", "weird"), PitchClass::C);
        assert_eq!(chord.quality, ChordQuality::DominantSeventh);
    }

    #[test]
    fn default_terminals() {
        assert_eq!(default_terminal(NonTerminal::Tonic), Terminal::new("I", "maj7"));
        assert_eq!(default_terminal(NonTerminal::Dominant), Terminal::new("V", "7"));
        assert_eq!(
            default_terminal(NonTerminal::Prolongation),
            Terminal::new("vi", "min7")
        );
    }

    #[test]
    fn format_breaks_lines() {
        let chords: Vec<ChordSymbol> = ["Dm7", "G7", "Cmaj7", "A7", "Dm7"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(
            format_progression(&chords, 4),
            "Dm7 | G7 | Cmaj7 | A7\nDm7"
        );
        assert_eq!(
            format_progression(&chords[..2], 0),
            "Dm7 | G7"
        );
        assert_eq!(format_progression(&[], 4), "");
    }
}
