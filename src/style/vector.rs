//! Style configuration: bounded parameters steering grammar weights and the
//! post-processing stages.

use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound for the integer depth parameters.
pub const MAX_DEPTH_PARAM: u32 = 8;

/// Flat record of style parameters. Probabilities live in [0, 1]; call
/// [`StyleVector::validate`] after editing fields by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleVector {
    // Substitutions
    pub tritone_sub_prob: f64,
    pub backdoor_prob: f64,
    pub coltrane_prob: f64,

    // Cadences and borrowing
    pub ii_v_preference: f64,
    pub secondary_dom_prob: f64,
    pub modal_interchange: f64,
    pub minor_iv_prob: f64,

    // Chromaticism
    pub chromatic_approach: f64,
    pub diminished_approach: f64,

    // Structure
    #[serde(deserialize_with = "deserialize_depth")]
    pub dominant_chain_depth: u32,
    #[serde(deserialize_with = "deserialize_depth")]
    pub prolongation_depth: u32,

    // Rhythm and colour
    pub rhythm_density: f64,
    pub turnaround_prob: f64,
    pub extension_level: f64,
    pub alteration_prob: f64,
}

impl Default for StyleVector {
    fn default() -> Self {
        Self {
            tritone_sub_prob: 0.3,
            backdoor_prob: 0.15,
            coltrane_prob: 0.1,
            ii_v_preference: 0.8,
            secondary_dom_prob: 0.3,
            modal_interchange: 0.2,
            minor_iv_prob: 0.15,
            chromatic_approach: 0.2,
            diminished_approach: 0.1,
            dominant_chain_depth: 3,
            prolongation_depth: 2,
            rhythm_density: 0.5,
            turnaround_prob: 0.4,
            extension_level: 0.5,
            alteration_prob: 0.2,
        }
    }
}

/// Accepts any number for a depth field. Negative and fractional values are
/// floored into `0..=u32::MAX` and left for [`StyleVector::validate`] to
/// bound.
fn deserialize_depth<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(raw.floor().clamp(0.0, u32::MAX as f64) as u32)
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl StyleVector {
    /// Clamp every field into its valid range.
    pub fn validate(&mut self) {
        for field in self.unit_fields_mut() {
            *field = unit(*field);
        }
        self.dominant_chain_depth = self.dominant_chain_depth.clamp(1, MAX_DEPTH_PARAM);
        self.prolongation_depth = self.prolongation_depth.min(MAX_DEPTH_PARAM);
    }

    pub fn validated(mut self) -> Self {
        self.validate();
        self
    }

    fn unit_fields_mut(&mut self) -> [&mut f64; 13] {
        [
            &mut self.tritone_sub_prob,
            &mut self.backdoor_prob,
            &mut self.coltrane_prob,
            &mut self.ii_v_preference,
            &mut self.secondary_dom_prob,
            &mut self.modal_interchange,
            &mut self.minor_iv_prob,
            &mut self.chromatic_approach,
            &mut self.diminished_approach,
            &mut self.rhythm_density,
            &mut self.turnaround_prob,
            &mut self.extension_level,
            &mut self.alteration_prob,
        ]
    }

    /// Convex combination `self * (1 - weight) + other * weight`.
    ///
    /// Integer fields are mixed as floats and truncated. The result is
    /// validated.
    pub fn blend(&self, other: &StyleVector, weight: f64) -> StyleVector {
        let w = unit(weight);
        let mix = |a: f64, b: f64| a * (1.0 - w) + b * w;
        let mix_int = |a: u32, b: u32| mix(a as f64, b as f64) as u32;

        StyleVector {
            tritone_sub_prob: mix(self.tritone_sub_prob, other.tritone_sub_prob),
            backdoor_prob: mix(self.backdoor_prob, other.backdoor_prob),
            coltrane_prob: mix(self.coltrane_prob, other.coltrane_prob),
            ii_v_preference: mix(self.ii_v_preference, other.ii_v_preference),
            secondary_dom_prob: mix(self.secondary_dom_prob, other.secondary_dom_prob),
            modal_interchange: mix(self.modal_interchange, other.modal_interchange),
            minor_iv_prob: mix(self.minor_iv_prob, other.minor_iv_prob),
            chromatic_approach: mix(self.chromatic_approach, other.chromatic_approach),
            diminished_approach: mix(self.diminished_approach, other.diminished_approach),
            dominant_chain_depth: mix_int(self.dominant_chain_depth, other.dominant_chain_depth),
            prolongation_depth: mix_int(self.prolongation_depth, other.prolongation_depth),
            rhythm_density: mix(self.rhythm_density, other.rhythm_density),
            turnaround_prob: mix(self.turnaround_prob, other.turnaround_prob),
            extension_level: mix(self.extension_level, other.extension_level),
            alteration_prob: mix(self.alteration_prob, other.alteration_prob),
        }
        .validated()
    }

    /// Short human-readable summary of the style's most distinctive traits.
    pub fn describe(&self) -> String {
        let mut traits = Vec::new();

        if self.tritone_sub_prob > 0.4 {
            traits.push("heavy tritone substitution");
        } else if self.tritone_sub_prob > 0.2 {
            traits.push("moderate tritone subs");
        }
        if self.ii_v_preference > 0.7 {
            traits.push("strong ii-V preference");
        }
        if self.coltrane_prob > 0.15 {
            traits.push("Coltrane-influenced");
        }
        if self.modal_interchange > 0.4 {
            traits.push("modal borrowing");
        }
        if self.rhythm_density > 0.7 {
            traits.push("dense harmonic rhythm");
        } else if self.rhythm_density < 0.3 {
            traits.push("sparse changes");
        }
        if self.extension_level > 0.6 {
            traits.push("extended harmonies");
        }
        if self.alteration_prob > 0.3 {
            traits.push("altered dominants");
        }

        if traits.is_empty() {
            "standard jazz harmony".to_string()
        } else {
            traits.join(", ")
        }
    }

    /// Chord length implied by harmonic rhythm: two chords per bar when
    /// dense, one when sparse.
    pub fn beats_per_chord(&self) -> f64 {
        if self.rhythm_density >= 0.5 {
            2.0
        } else {
            4.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn validate_clamps_out_of_range() {
        let mut style = StyleVector {
            tritone_sub_prob: 1.5,
            modal_interchange: -0.3,
            extension_level: f64::NAN,
            dominant_chain_depth: 0,
            prolongation_depth: 40,
            ..StyleVector::default()
        };
        style.validate();
        assert_eq!(style.tritone_sub_prob, 1.0);
        assert_eq!(style.modal_interchange, 0.0);
        assert_eq!(style.extension_level, 0.0);
        assert_eq!(style.dominant_chain_depth, 1);
        assert_eq!(style.prolongation_depth, MAX_DEPTH_PARAM);
    }

    #[test]
    fn blend_is_convex() {
        let a = StyleVector {
            tritone_sub_prob: 0.0,
            dominant_chain_depth: 2,
            ..StyleVector::default()
        };
        let b = StyleVector {
            tritone_sub_prob: 1.0,
            dominant_chain_depth: 5,
            ..StyleVector::default()
        };
        let mid = a.blend(&b, 0.5);
        assert_approx_eq!(mid.tritone_sub_prob, 0.5);
        // 3.5 truncates to 3
        assert_eq!(mid.dominant_chain_depth, 3);
        assert_eq!(a.blend(&b, 0.0), a);
        assert_eq!(a.blend(&b, 1.0), b);
    }

    #[test]
    fn blend_weight_is_clamped() {
        let a = StyleVector::default();
        let b = StyleVector {
            ii_v_preference: 0.0,
            ..StyleVector::default()
        };
        assert_eq!(a.blend(&b, 3.0), b);
    }

    #[test]
    fn describe_defaults() {
        let style = StyleVector::default();
        assert_eq!(
            style.describe(),
            "moderate tritone subs, strong ii-V preference"
        );
        let plain = StyleVector {
            tritone_sub_prob: 0.0,
            ii_v_preference: 0.5,
            ..StyleVector::default()
        };
        assert_eq!(plain.describe(), "standard jazz harmony");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let style: StyleVector = serde_yaml::from_str("tritone_sub_prob: 0.9\n").unwrap();
        assert_eq!(style.tritone_sub_prob, 0.9);
        assert_eq!(style.dominant_chain_depth, 3);
    }

    #[test]
    fn depth_fields_accept_any_number() {
        let style: StyleVector =
            serde_yaml::from_str("dominant_chain_depth: -3\nprolongation_depth: 2.7\n").unwrap();
        assert_eq!(style.dominant_chain_depth, 0);
        assert_eq!(style.prolongation_depth, 2);
        assert_eq!(style.validated().dominant_chain_depth, 1);

        assert!(serde_yaml::from_str::<StyleVector>("prolongation_depth: deep\n").is_err());
    }

    #[test]
    fn beats_follow_density() {
        let dense = StyleVector {
            rhythm_density: 0.8,
            ..StyleVector::default()
        };
        let sparse = StyleVector {
            rhythm_density: 0.2,
            ..StyleVector::default()
        };
        assert_eq!(dense.beats_per_chord(), 2.0);
        assert_eq!(sparse.beats_per_chord(), 4.0);
    }
}
