//! # Spotify Integration Module
//!
//! Client for the parts of the Spotify Web API the backend proxies, plus the
//! OAuth token exchange in [`auth`].
//!
//! ## Request context
//!
//! There is no global client. A [`SpotifyClient`] is built per request from
//! the shared `reqwest::Client` (one connection pool for the whole process),
//! the API base URL and the caller's bearer token:
//!
//! ```text
//! HTTP handler --(bearer token)--> SpotifyClient::new(http, api_url, token)
//!                                        |
//!                                        v
//!                                  Spotify Web API
//! ```
//!
//! Callers with different tokens therefore never share mutable state.
//!
//! ## API Coverage
//!
//! - `GET /browse/featured-playlists` - [`SpotifyClient::featured_playlists`]
//! - `GET /me/playlists` - [`SpotifyClient::user_playlists`]
//! - `GET /playlists/{id}/tracks` - [`SpotifyClient::playlist_tracks`]
//! - `GET /audio-features` - [`SpotifyClient::audio_features`]
//! - `GET /me` - [`SpotifyClient::user_profile`]
//! - `GET /search` - [`SpotifyClient::search_tracks`]
//!
//! [`SpotifyClient::playlist_mood`] chains tracks, audio features and
//! [`crate::mood::calculate_mood`].
//!
//! ## Error Handling
//!
//! - **429 Too Many Requests**: waits for `Retry-After` when it is at most
//!   [`MAX_RETRY_AFTER_SECS`], otherwise gives up with
//!   [`SpotifyError::RateLimited`]
//! - **502 Bad Gateway**: retried after [`BAD_GATEWAY_RETRY_DELAY`]
//! - **401 Unauthorized**: [`SpotifyError::Unauthorized`], so the HTTP layer
//!   can tell the frontend to refresh its token
//!
//! Each request is attempted at most [`MAX_ATTEMPTS`] times.

pub mod auth;

use std::time::Duration;

use reqwest::{Client, StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    mood::{self, AudioFeatures, MoodSummary},
    types::{
        AudioFeaturesResponse, FeaturedPlaylistsResponse, Paging, PlaylistTracksResponse,
        SearchResponse,
    },
};

pub const MAX_ATTEMPTS: u32 = 3;
pub const MAX_RETRY_AFTER_SECS: u64 = 120;
pub const BAD_GATEWAY_RETRY_DELAY: Duration = Duration::from_secs(1);
/// Spotify accepts at most this many ids per `/audio-features` call.
pub const MAX_FEATURE_IDS: usize = 100;
/// Number of tracks considered when inferring a playlist's mood.
pub const MOOD_TRACK_LIMIT: u32 = 50;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("access token rejected by Spotify")]
    Unauthorized,

    #[error("rate limited by Spotify, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Spotify responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("no tracks found in playlist {0}")]
    EmptyPlaylist(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Per-request Spotify Web API context.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn featured_playlists(&self, limit: u32) -> Result<Vec<Value>, SpotifyError> {
        let res: FeaturedPlaylistsResponse = self
            .get_json("/browse/featured-playlists", &[("limit", limit.to_string())])
            .await?;
        Ok(res.playlists.items)
    }

    pub async fn user_playlists(&self, limit: u32) -> Result<Vec<Value>, SpotifyError> {
        let res: Paging = self
            .get_json("/me/playlists", &[("limit", limit.to_string())])
            .await?;
        Ok(res.items)
    }

    /// Tracks of a playlist; entries whose `track` is `null` (removed or
    /// local tracks) are dropped.
    pub async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<Value>, SpotifyError> {
        let path = format!("/playlists/{playlist_id}/tracks");
        let res: PlaylistTracksResponse = self
            .get_json(&path, &[("limit", limit.to_string())])
            .await?;
        Ok(res
            .items
            .into_iter()
            .filter_map(|item| item.track.filter(|t| !t.is_null()))
            .collect())
    }

    /// Audio features, one entry per sent id, `None` where Spotify has none.
    ///
    /// Only the first [`MAX_FEATURE_IDS`] ids are sent.
    pub async fn audio_features(
        &self,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, SpotifyError> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }

        let res: AudioFeaturesResponse = self
            .get_json("/audio-features", &[("ids", feature_ids_param(track_ids))])
            .await?;
        Ok(res.into_records())
    }

    pub async fn user_profile(&self) -> Result<Value, SpotifyError> {
        self.get_json("/me", &[]).await
    }

    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Value>, SpotifyError> {
        let res: SearchResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(res.tracks.items)
    }

    /// Infers the mood of a playlist from the audio features of its first
    /// [`MOOD_TRACK_LIMIT`] tracks.
    pub async fn playlist_mood(&self, playlist_id: &str) -> Result<MoodSummary, SpotifyError> {
        let tracks = self.playlist_tracks(playlist_id, MOOD_TRACK_LIMIT).await?;
        if tracks.is_empty() {
            return Err(SpotifyError::EmptyPlaylist(playlist_id.to_string()));
        }

        let track_ids = track_ids(&tracks);
        let records = self.audio_features(&track_ids).await?;
        debug!(
            playlist_id,
            tracks = tracks.len(),
            features = records.iter().flatten().count(),
            "computing playlist mood"
        );

        Ok(mood::calculate_mood(&records))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        let url = format!("{}{}", self.api_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .query(query)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response.json::<T>().await?);
            }

            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = retry_after_secs(response.headers());
                    if retry_after > MAX_RETRY_AFTER_SECS || attempt >= MAX_ATTEMPTS {
                        warn!(path, retry_after, attempt, "giving up on rate limited request");
                        return Err(SpotifyError::RateLimited { retry_after });
                    }
                    debug!(path, retry_after, "rate limited, waiting");
                    sleep(Duration::from_secs(retry_after)).await;
                }
                StatusCode::BAD_GATEWAY if attempt < MAX_ATTEMPTS => {
                    debug!(path, attempt, "bad gateway, retrying");
                    sleep(BAD_GATEWAY_RETRY_DELAY).await;
                }
                StatusCode::UNAUTHORIZED => return Err(SpotifyError::Unauthorized),
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(SpotifyError::Status { status, body });
                }
            }
        }
    }
}

/// Ids of the tracks that have one, in playlist order.
pub fn track_ids(tracks: &[Value]) -> Vec<String> {
    tracks
        .iter()
        .filter_map(|t| t.get("id").and_then(Value::as_str))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn feature_ids_param(track_ids: &[String]) -> String {
    track_ids
        .iter()
        .take(MAX_FEATURE_IDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_feature_ids_param_caps_at_limit() {
        let ids: Vec<String> = (0..150).map(|i| format!("t{i}")).collect();
        let param = feature_ids_param(&ids);
        assert_eq!(param.split(',').count(), MAX_FEATURE_IDS);
        assert!(param.starts_with("t0,t1,"));
        assert!(param.ends_with("t99"));
    }

    #[test]
    fn test_track_ids_skips_missing_ids() {
        let tracks = vec![
            json!({"id": "a", "name": "One"}),
            json!({"name": "local file"}),
            json!({"id": null}),
            json!({"id": ""}),
            json!({"id": "b"}),
        ];
        assert_eq!(track_ids(&tracks), vec!["a", "b"]);
    }

    #[test]
    fn test_retry_after_secs() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), 0);

        headers.insert("retry-after", HeaderValue::from_static("7"));
        assert_eq!(retry_after_secs(&headers), 7);

        headers.insert("retry-after", HeaderValue::from_static("soon"));
        assert_eq!(retry_after_secs(&headers), 0);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = SpotifyClient::new(Client::new(), "https://api.spotify.com/v1/", "tok");
        assert_eq!(client.api_url, "https://api.spotify.com/v1");
        assert_eq!(client.token(), "tok");
    }

    #[test]
    fn test_audio_features_response_records() {
        let res: AudioFeaturesResponse = serde_json::from_value(json!({
            "audio_features": [
                {"energy": 0.5, "valence": 0.6, "tempo": 110.0, "danceability": 0.7, "key": 5},
                null,
                {"energy": 0.5, "valence": 0.6}
            ]
        }))
        .unwrap();
        let records = res.into_records();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_some());
        assert!(records[1].is_none());
        assert!(records[2].is_none());
    }
}
