use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;
use uuid::Uuid;

use crate::mood::{AudioFeatures, MoodSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    #[serde(default)]
    pub obtained_at: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Treats the token as expired four minutes before Spotify does.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + 240 >= self.obtained_at + self.expires_in
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedPlaylistsResponse {
    pub playlists: Paging,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub items: Vec<Value>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Value>,
}

impl AudioFeaturesResponse {
    /// One entry per requested track; `None` for `null` or incomplete records.
    pub fn into_records(self) -> Vec<Option<AudioFeatures>> {
        self.audio_features
            .into_iter()
            .map(|v| serde_json::from_value::<AudioFeatures>(v).ok())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistsBody {
    pub playlists: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksBody {
    pub tracks: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration_ms: u64,
    pub audio_url: String,
    pub uploaded_by: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration_ms: u64,
    pub audio_url: String,
    pub uploaded_by: Option<String>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSongResponse {
    pub success: bool,
    pub song: Song,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongsBody {
    pub songs: Vec<Song>,
}

#[derive(Tabled)]
pub struct MoodTableRow {
    pub mood: String,
    pub score: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub danceability: f64,
}

impl From<&MoodSummary> for MoodTableRow {
    fn from(summary: &MoodSummary) -> Self {
        MoodTableRow {
            mood: summary.overall_mood.clone(),
            score: summary.mood_score,
            energy: summary.energy,
            valence: summary.valence,
            tempo: summary.tempo,
            danceability: summary.danceability,
        }
    }
}
