use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;

use super::{ApiError, ApiQuery, AppState};
use crate::types::{NewSong, SongsBody, UploadSongResponse};

/// Largest accepted audio file.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_EXTENSION: &str = "mp3";

/// Fields of the `/songs/upload` multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub uploaded_by: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                form.file_name = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                form.data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?
                    .to_vec();
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid field '{name}': {e}")))?;
            let value = Some(text.trim().to_string()).filter(|v| !v.is_empty());
            match name.as_str() {
                "title" => form.title = value,
                "artist" => form.artist = value,
                "album" => form.album = value,
                "genre" => form.genre = value,
                "uploaded_by" => form.uploaded_by = value,
                _ => debug!(field = %name, "ignoring unknown upload field"),
            }
        }

        Ok(form)
    }

    /// Checks type, size and required fields; returns `(title, artist)`.
    pub fn validate(&self) -> Result<(String, String), ApiError> {
        let is_audio = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("audio/"));
        if !is_audio {
            return Err(ApiError::BadRequest(
                "File must be an audio file".to_string(),
            ));
        }
        if self.data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::BadRequest(
                "File size must be less than 10MB".to_string(),
            ));
        }

        let title = self
            .title
            .clone()
            .ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;
        let artist = self
            .artist
            .clone()
            .ok_or_else(|| ApiError::BadRequest("artist is required".to_string()))?;
        Ok((title, artist))
    }
}

/// `{uuid}.{ext}`, keeping the uploaded file's extension when it has one.
pub fn storage_file_name(original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(DEFAULT_EXTENSION);
    format!("{}.{}", Uuid::new_v4(), extension.to_ascii_lowercase())
}

pub async fn upload_song(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadSongResponse>, ApiError> {
    let form = UploadForm::read(multipart?).await?;
    let (title, artist) = form.validate()?;

    let file_name = storage_file_name(form.file_name.as_deref());
    let content_type = form.content_type.clone().unwrap_or_default();
    let size = form.data.len();
    let audio_url = state
        .store
        .upload_audio(&file_name, &content_type, form.data)
        .await?;

    let song = state
        .store
        .create_song(NewSong {
            title,
            artist,
            album: form.album,
            genre: form.genre,
            duration_ms: 0,
            audio_url,
            uploaded_by: form.uploaded_by,
            is_public: true,
        })
        .await?;

    info!(song_id = %song.id, file_name = %file_name, bytes = size, "song uploaded");
    Ok(Json(UploadSongResponse {
        success: true,
        song,
        message: "Song uploaded successfully".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SongsQuery {
    pub limit: Option<u32>,
}

pub async fn list_songs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SongsQuery>,
) -> Result<Json<SongsBody>, ApiError> {
    let songs = state.store.list_songs(query.limit.unwrap_or(100)).await?;
    Ok(Json(SongsBody { songs }))
}

pub async fn featured_song_playlists(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let playlists = state.store.featured_playlists().await?;
    Ok(Json(json!({ "playlists": playlists })))
}
