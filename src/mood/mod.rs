//! # Playlist Mood Inference
//!
//! Turns the per-track acoustic features returned by the catalog API into a
//! single mood for a whole playlist.
//!
//! The computation has two stages:
//!
//! 1. **Aggregation** ([`aggregate`]) - averages energy, valence, tempo and
//!    danceability across the tracks that have features. Tracks the catalog
//!    could not analyse arrive as `None` and are skipped, never counted as
//!    zero.
//! 2. **Classification** - [`classify`] picks a [`MoodCategory`] from the
//!    ordered rule table in [`rules`], and [`mood_score`] computes a 0-10
//!    score. Both read the same averages; neither depends on the other.
//!
//! Everything here is pure and synchronous, so request handlers may call
//! [`calculate_mood`] concurrently without coordination.
//!
//! Values outside `[0, 1]` are not clamped or rejected; they flow through the
//! rules and the score formula as-is.
//!
//! ```text
//! [Option<AudioFeatures>] --aggregate--> FeatureAverages --+--classify--> MoodCategory
//!                                                          +--mood_score-> f64
//! ```

pub mod rules;

use serde::{Deserialize, Serialize};

pub use rules::{MOOD_RULES, MoodCategory, MoodRule};

/// Label reported when there is nothing to aggregate.
pub const UNKNOWN_MOOD: &str = "Unknown";
pub const NO_DATA_DESCRIPTION: &str = "No audio data available";

/// Acoustic features of one track, as delivered by the catalog API.
///
/// Unknown fields in the upstream payload are ignored. A payload missing any
/// of these four fields is not a valid record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub danceability: f64,
}

/// Means of the four features over the present records.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureAverages {
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub danceability: f64,
}

/// Playlist-level mood, serialized as the `/playlists/{id}/mood` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSummary {
    pub overall_mood: String,
    pub mood_score: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub danceability: f64,
    pub description: String,
}

impl MoodSummary {
    /// Summary for a playlist without any usable features.
    pub fn unknown() -> Self {
        MoodSummary {
            overall_mood: UNKNOWN_MOOD.to_string(),
            mood_score: 0.0,
            energy: 0.0,
            valence: 0.0,
            tempo: 0.0,
            danceability: 0.0,
            description: NO_DATA_DESCRIPTION.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.overall_mood == UNKNOWN_MOOD
    }
}

/// Averages the present records, or `None` when there are none.
///
/// The divisor is the number of `Some` entries, not the slice length.
pub fn aggregate(records: &[Option<AudioFeatures>]) -> Option<FeatureAverages> {
    let present: Vec<&AudioFeatures> = records.iter().flatten().collect();
    if present.is_empty() {
        return None;
    }

    let count = present.len() as f64;
    let sum = present
        .iter()
        .fold(FeatureAverages::default(), |acc, f| FeatureAverages {
            energy: acc.energy + f.energy,
            valence: acc.valence + f.valence,
            tempo: acc.tempo + f.tempo,
            danceability: acc.danceability + f.danceability,
        });

    Some(FeatureAverages {
        energy: sum.energy / count,
        valence: sum.valence / count,
        tempo: sum.tempo / count,
        danceability: sum.danceability / count,
    })
}

/// Category for the given averages. Tempo is not consulted.
pub fn classify(averages: &FeatureAverages) -> MoodCategory {
    rules::classify(averages.energy, averages.valence, averages.danceability)
}

/// `valence*4 + (1 - |energy - 0.5|)*3 + danceability*3`, rounded to one decimal.
///
/// Peaks at 10 for valence 1, energy 0.5, danceability 1.
pub fn mood_score(averages: &FeatureAverages) -> f64 {
    let raw = averages.valence * 4.0
        + (1.0 - (averages.energy - 0.5).abs()) * 3.0
        + averages.danceability * 3.0;
    round_to(raw, 1)
}

/// Computes the playlist mood for a sequence of feature records.
pub fn calculate_mood(records: &[Option<AudioFeatures>]) -> MoodSummary {
    let Some(averages) = aggregate(records) else {
        return MoodSummary::unknown();
    };

    let category = classify(&averages);

    MoodSummary {
        overall_mood: category.label().to_string(),
        mood_score: mood_score(&averages),
        energy: round_to(averages.energy, 2),
        valence: round_to(averages.valence, 2),
        tempo: round_to(averages.tempo, 0),
        danceability: round_to(averages.danceability, 2),
        description: category.description().to_string(),
    }
}

// Rounds the stored binary value, exact ties to even. A mean of 0.825 is
// stored just below the half and becomes 0.82.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
