use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{ApiError, ApiQuery, AppState, BearerToken, bounded_limit};
use crate::{
    mood::MoodSummary,
    types::{PlaylistsBody, TracksBody},
};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
}

pub async fn featured_playlists(
    State(state): State<AppState>,
    token: BearerToken,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<PlaylistsBody>, ApiError> {
    let limit = bounded_limit(query.limit, 20, 50)?;
    let playlists = state.spotify(&token).featured_playlists(limit).await?;
    Ok(Json(PlaylistsBody { playlists }))
}

pub async fn user_playlists(
    State(state): State<AppState>,
    token: BearerToken,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<PlaylistsBody>, ApiError> {
    let limit = bounded_limit(query.limit, 50, 50)?;
    let playlists = state.spotify(&token).user_playlists(limit).await?;
    Ok(Json(PlaylistsBody { playlists }))
}

pub async fn playlist_tracks(
    State(state): State<AppState>,
    token: BearerToken,
    Path(playlist_id): Path<String>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<TracksBody>, ApiError> {
    let limit = bounded_limit(query.limit, 50, 100)?;
    let tracks = state
        .spotify(&token)
        .playlist_tracks(&playlist_id, limit)
        .await?;
    Ok(Json(TracksBody { tracks }))
}

pub async fn playlist_mood(
    State(state): State<AppState>,
    token: BearerToken,
    Path(playlist_id): Path<String>,
) -> Result<Json<MoodSummary>, ApiError> {
    let summary = state.spotify(&token).playlist_mood(&playlist_id).await?;
    if summary.is_unknown() {
        warn!(playlist_id = %playlist_id, "no audio features for playlist");
    }
    info!(
        playlist_id = %playlist_id,
        mood = %summary.overall_mood,
        score = summary.mood_score,
        "playlist mood computed"
    );
    Ok(Json(summary))
}

pub async fn user_profile(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Value>, ApiError> {
    let profile = state.spotify(&token).user_profile().await?;
    if profile.is_null() {
        return Err(ApiError::NotFound("User profile not found".to_string()));
    }
    Ok(Json(profile))
}

pub async fn search(
    State(state): State<AppState>,
    token: BearerToken,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<TracksBody>, ApiError> {
    let q = query
        .q
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("q must not be empty".to_string()))?;
    let limit = bounded_limit(query.limit, 20, 50)?;

    let tracks = state.spotify(&token).search_tracks(&q, limit).await?;
    Ok(Json(TracksBody { tracks }))
}
