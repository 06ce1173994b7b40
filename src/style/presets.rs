//! Named era presets.

use std::fmt;

use super::vector::StyleVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StylePreset {
    Bebop = 1,
    Cool = 2,
    Modal = 3,
    HardBop = 4,
    PostBop = 5,
    Swing = 6,
    Fusion = 7,
    Contemporary = 8,
    Blues = 9,
}

impl StylePreset {
    pub const ALL: [StylePreset; 9] = [
        StylePreset::Bebop,
        StylePreset::Cool,
        StylePreset::Modal,
        StylePreset::HardBop,
        StylePreset::PostBop,
        StylePreset::Swing,
        StylePreset::Fusion,
        StylePreset::Contemporary,
        StylePreset::Blues,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            StylePreset::Bebop => "Bebop",
            StylePreset::Cool => "Cool",
            StylePreset::Modal => "Modal",
            StylePreset::HardBop => "Hard Bop",
            StylePreset::PostBop => "Post-Bop",
            StylePreset::Swing => "Swing",
            StylePreset::Fusion => "Fusion",
            StylePreset::Contemporary => "Contemporary",
            StylePreset::Blues => "Blues",
        }
    }

    /// Case-insensitive lookup ignoring spaces, dashes and underscores, so
    /// "hard bop", "Hard-Bop" and "hardbop" all match.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = squash(name);
        Self::ALL.into_iter().find(|p| squash(p.name()) == wanted)
    }

    pub fn vector(self) -> StyleVector {
        match self {
            StylePreset::Swing => StyleVector {
                tritone_sub_prob: 0.1,
                backdoor_prob: 0.1,
                coltrane_prob: 0.0,
                ii_v_preference: 0.7,
                secondary_dom_prob: 0.2,
                modal_interchange: 0.1,
                minor_iv_prob: 0.1,
                chromatic_approach: 0.1,
                diminished_approach: 0.15,
                dominant_chain_depth: 2,
                prolongation_depth: 1,
                rhythm_density: 0.4,
                turnaround_prob: 0.5,
                extension_level: 0.3,
                alteration_prob: 0.1,
            },
            StylePreset::Bebop => StyleVector {
                tritone_sub_prob: 0.3,
                backdoor_prob: 0.15,
                coltrane_prob: 0.05,
                ii_v_preference: 0.9,
                secondary_dom_prob: 0.4,
                modal_interchange: 0.2,
                minor_iv_prob: 0.15,
                chromatic_approach: 0.4,
                diminished_approach: 0.2,
                dominant_chain_depth: 4,
                prolongation_depth: 2,
                rhythm_density: 0.8,
                turnaround_prob: 0.6,
                extension_level: 0.5,
                alteration_prob: 0.3,
            },
            StylePreset::Cool => StyleVector {
                tritone_sub_prob: 0.2,
                backdoor_prob: 0.1,
                coltrane_prob: 0.0,
                ii_v_preference: 0.7,
                secondary_dom_prob: 0.25,
                modal_interchange: 0.3,
                minor_iv_prob: 0.2,
                chromatic_approach: 0.2,
                diminished_approach: 0.1,
                dominant_chain_depth: 3,
                prolongation_depth: 2,
                rhythm_density: 0.5,
                turnaround_prob: 0.4,
                extension_level: 0.4,
                alteration_prob: 0.15,
            },
            StylePreset::HardBop => StyleVector {
                tritone_sub_prob: 0.25,
                backdoor_prob: 0.2,
                coltrane_prob: 0.1,
                ii_v_preference: 0.85,
                secondary_dom_prob: 0.35,
                modal_interchange: 0.25,
                minor_iv_prob: 0.2,
                chromatic_approach: 0.35,
                diminished_approach: 0.15,
                dominant_chain_depth: 4,
                prolongation_depth: 2,
                rhythm_density: 0.7,
                turnaround_prob: 0.5,
                extension_level: 0.55,
                alteration_prob: 0.25,
            },
            StylePreset::Modal => StyleVector {
                tritone_sub_prob: 0.1,
                backdoor_prob: 0.05,
                coltrane_prob: 0.15,
                ii_v_preference: 0.3,
                secondary_dom_prob: 0.1,
                modal_interchange: 0.6,
                minor_iv_prob: 0.3,
                chromatic_approach: 0.1,
                diminished_approach: 0.05,
                dominant_chain_depth: 2,
                prolongation_depth: 3,
                rhythm_density: 0.3,
                turnaround_prob: 0.2,
                extension_level: 0.6,
                alteration_prob: 0.1,
            },
            StylePreset::PostBop => StyleVector {
                tritone_sub_prob: 0.4,
                backdoor_prob: 0.25,
                coltrane_prob: 0.25,
                ii_v_preference: 0.6,
                secondary_dom_prob: 0.45,
                modal_interchange: 0.5,
                minor_iv_prob: 0.3,
                chromatic_approach: 0.5,
                diminished_approach: 0.2,
                dominant_chain_depth: 5,
                prolongation_depth: 3,
                rhythm_density: 0.6,
                turnaround_prob: 0.4,
                extension_level: 0.7,
                alteration_prob: 0.4,
            },
            StylePreset::Fusion => StyleVector {
                tritone_sub_prob: 0.35,
                backdoor_prob: 0.2,
                coltrane_prob: 0.1,
                ii_v_preference: 0.5,
                secondary_dom_prob: 0.3,
                modal_interchange: 0.6,
                minor_iv_prob: 0.35,
                chromatic_approach: 0.4,
                diminished_approach: 0.15,
                dominant_chain_depth: 3,
                prolongation_depth: 2,
                rhythm_density: 0.65,
                turnaround_prob: 0.3,
                extension_level: 0.75,
                alteration_prob: 0.35,
            },
            StylePreset::Contemporary => StyleVector {
                tritone_sub_prob: 0.35,
                backdoor_prob: 0.2,
                coltrane_prob: 0.15,
                ii_v_preference: 0.65,
                secondary_dom_prob: 0.35,
                modal_interchange: 0.45,
                minor_iv_prob: 0.25,
                chromatic_approach: 0.35,
                diminished_approach: 0.15,
                dominant_chain_depth: 4,
                prolongation_depth: 2,
                rhythm_density: 0.55,
                turnaround_prob: 0.35,
                extension_level: 0.65,
                alteration_prob: 0.3,
            },
            StylePreset::Blues => StyleVector {
                tritone_sub_prob: 0.15,
                backdoor_prob: 0.25,
                coltrane_prob: 0.0,
                ii_v_preference: 0.5,
                secondary_dom_prob: 0.2,
                modal_interchange: 0.4,
                minor_iv_prob: 0.4,
                chromatic_approach: 0.2,
                diminished_approach: 0.1,
                dominant_chain_depth: 2,
                prolongation_depth: 1,
                rhythm_density: 0.4,
                turnaround_prob: 0.6,
                extension_level: 0.4,
                alteration_prob: 0.2,
            },
        }
    }
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Preset vector for a numeric id; unknown ids get Bebop.
pub fn style_by_id(id: u8) -> StyleVector {
    StylePreset::from_id(id)
        .unwrap_or(StylePreset::Bebop)
        .vector()
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
