//! Ordered mood category rules.
//!
//! Classification walks [`MOOD_RULES`] top to bottom and takes the first rule
//! whose predicate holds. The bands overlap and leave gaps. The
//! position of a rule in the table decides which category wins, so moving an
//! entry changes results.

/// Playlist mood categories, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodCategory {
    EnergeticUplifting,
    RelaxedCool,
    ChillMellow,
    MelancholicReflective,
    IntenseFocused,
    DanceableGroovy,
    BalancedVersatile,
}

impl MoodCategory {
    pub const ALL: [MoodCategory; 7] = [
        MoodCategory::EnergeticUplifting,
        MoodCategory::RelaxedCool,
        MoodCategory::ChillMellow,
        MoodCategory::MelancholicReflective,
        MoodCategory::IntenseFocused,
        MoodCategory::DanceableGroovy,
        MoodCategory::BalancedVersatile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MoodCategory::EnergeticUplifting => "Energetic & Uplifting",
            MoodCategory::RelaxedCool => "Relaxed & Cool",
            MoodCategory::ChillMellow => "Chill & Mellow",
            MoodCategory::MelancholicReflective => "Melancholic & Reflective",
            MoodCategory::IntenseFocused => "Intense & Focused",
            MoodCategory::DanceableGroovy => "Danceable & Groovy",
            MoodCategory::BalancedVersatile => "Balanced & Versatile",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MoodCategory::EnergeticUplifting => {
                "This playlist is bursting with energy and positivity! Perfect for workouts, parties, or boosting your motivation. High tempo tracks keep the excitement going."
            }
            MoodCategory::RelaxedCool => {
                "This playlist creates a calm and cool atmosphere perfect for unwinding. The moderate tempo and positive vibes help reduce stress and create a peaceful environment."
            }
            MoodCategory::ChillMellow => {
                "Ultra-chill vibes with mellow tones. Great for studying, meditation, or late-night relaxation. Low energy with gentle positivity creates a soothing ambiance."
            }
            MoodCategory::MelancholicReflective => {
                "A contemplative playlist with introspective tones. Low energy and subdued mood create space for deep thoughts and emotional reflection."
            }
            MoodCategory::IntenseFocused => {
                "High-energy tracks with serious undertones. Perfect for intense focus, gaming, or powering through challenging tasks. Maintains drive without excessive cheerfulness."
            }
            MoodCategory::DanceableGroovy => {
                "Made for moving! High danceability with infectious rhythms. Whether you're at a party or dancing alone, these tracks will get you grooving."
            }
            MoodCategory::BalancedVersatile => {
                "A well-rounded mix with moderate energy and mood. Versatile enough for various activities - background music, casual listening, or light tasks."
            }
        }
    }
}

impl std::fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the rule table: `matches(energy, valence, danceability)`.
pub struct MoodRule {
    pub category: MoodCategory,
    pub matches: fn(f64, f64, f64) -> bool,
}

pub const MOOD_RULES: &[MoodRule] = &[
    MoodRule {
        category: MoodCategory::EnergeticUplifting,
        matches: |e, v, _| e > 0.7 && v > 0.7,
    },
    MoodRule {
        category: MoodCategory::RelaxedCool,
        matches: |e, v, _| (0.3..=0.6).contains(&e) && (0.5..=0.85).contains(&v),
    },
    MoodRule {
        category: MoodCategory::ChillMellow,
        matches: |e, v, _| e < 0.4 && v > 0.5,
    },
    MoodRule {
        category: MoodCategory::MelancholicReflective,
        matches: |e, v, _| e < 0.4 && v < 0.4,
    },
    MoodRule {
        category: MoodCategory::IntenseFocused,
        matches: |e, v, _| e > 0.7 && (0.3..=0.6).contains(&v),
    },
    MoodRule {
        category: MoodCategory::DanceableGroovy,
        matches: |_, _, d| d > 0.7,
    },
];

/// First matching category, [`MoodCategory::BalancedVersatile`] otherwise.
pub fn classify(energy: f64, valence: f64, danceability: f64) -> MoodCategory {
    MOOD_RULES
        .iter()
        .find(|rule| (rule.matches)(energy, valence, danceability))
        .map(|rule| rule.category)
        .unwrap_or(MoodCategory::BalancedVersatile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_order() {
        let order: Vec<MoodCategory> = MOOD_RULES.iter().map(|r| r.category).collect();
        assert_eq!(order, MoodCategory::ALL[..6].to_vec());
    }

    #[test]
    fn test_each_rule_reachable() {
        assert_eq!(classify(0.9, 0.9, 0.1), MoodCategory::EnergeticUplifting);
        assert_eq!(classify(0.5, 0.6, 0.1), MoodCategory::RelaxedCool);
        assert_eq!(classify(0.2, 0.9, 0.1), MoodCategory::ChillMellow);
        assert_eq!(classify(0.2, 0.2, 0.1), MoodCategory::MelancholicReflective);
        assert_eq!(classify(0.9, 0.5, 0.1), MoodCategory::IntenseFocused);
        assert_eq!(classify(0.65, 0.45, 0.9), MoodCategory::DanceableGroovy);
        assert_eq!(classify(0.65, 0.45, 0.5), MoodCategory::BalancedVersatile);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        // e=0.35, v=0.6 satisfies both "Relaxed & Cool" and "Chill & Mellow"
        assert!((MOOD_RULES[1].matches)(0.35, 0.6, 0.0));
        assert!((MOOD_RULES[2].matches)(0.35, 0.6, 0.0));
        assert_eq!(classify(0.35, 0.6, 0.0), MoodCategory::RelaxedCool);

        // high danceability loses to any earlier energy/valence rule
        assert_eq!(classify(0.9, 0.9, 0.95), MoodCategory::EnergeticUplifting);
        assert_eq!(classify(0.2, 0.2, 0.95), MoodCategory::MelancholicReflective);
    }

    #[test]
    fn test_strict_and_inclusive_boundaries() {
        // strict `>` on rule 1
        assert_ne!(classify(0.7, 0.7, 0.0), MoodCategory::EnergeticUplifting);
        assert_eq!(classify(0.7, 0.7, 0.0), MoodCategory::BalancedVersatile);
        assert_eq!(classify(0.7, 0.7, 0.8), MoodCategory::DanceableGroovy);

        // inclusive bands on rule 2
        assert_eq!(classify(0.3, 0.5, 0.0), MoodCategory::RelaxedCool);
        assert_eq!(classify(0.6, 0.85, 0.0), MoodCategory::RelaxedCool);
        assert_ne!(classify(0.61, 0.85, 0.0), MoodCategory::RelaxedCool);

        // v exactly 0.4 / 0.5 with low energy falls between rules 3 and 4
        assert_eq!(classify(0.2, 0.4, 0.0), MoodCategory::BalancedVersatile);
        assert_eq!(classify(0.2, 0.5, 0.0), MoodCategory::BalancedVersatile);

        // inclusive valence band on rule 5
        assert_eq!(classify(0.71, 0.3, 0.0), MoodCategory::IntenseFocused);
        assert_eq!(classify(0.71, 0.6, 0.0), MoodCategory::IntenseFocused);

        // strict `>` on danceability
        assert_eq!(classify(0.65, 0.45, 0.7), MoodCategory::BalancedVersatile);
    }

    #[test]
    fn test_classification_is_total_over_unit_cube() {
        let steps: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        for &e in &steps {
            for &v in &steps {
                for &d in &steps {
                    let category = classify(e, v, d);
                    assert!(MoodCategory::ALL.contains(&category));
                }
            }
        }
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<&str> = MoodCategory::ALL.iter().map(|c| c.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 7);
        assert_eq!(MoodCategory::ChillMellow.to_string(), "Chill & Mellow");
    }
}
