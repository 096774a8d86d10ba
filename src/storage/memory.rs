use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SongStore, StorageError};
use crate::types::{NewSong, Song};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
    songs: RwLock<Vec<Song>>,
    featured: Vec<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_featured_playlists(mut self, playlists: Vec<Value>) -> Self {
        self.featured = playlists;
        self
    }

    pub async fn file(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(file_name).cloned()
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn upload_audio(
        &self,
        file_name: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError> {
        self.files.write().await.insert(file_name.to_string(), data);
        Ok(format!("memory://audio-files/{file_name}"))
    }

    async fn create_song(&self, song: NewSong) -> Result<Song, StorageError> {
        let song = Song {
            id: Uuid::new_v4(),
            title: song.title,
            artist: song.artist,
            album: song.album,
            genre: song.genre,
            duration_ms: song.duration_ms,
            audio_url: song.audio_url,
            uploaded_by: song.uploaded_by,
            is_public: song.is_public,
            created_at: Utc::now(),
        };
        self.songs.write().await.push(song.clone());
        Ok(song)
    }

    async fn list_songs(&self, limit: u32) -> Result<Vec<Song>, StorageError> {
        let songs = self.songs.read().await;
        // insertion order is creation order, so reversing gives newest first
        Ok(songs
            .iter()
            .rev()
            .filter(|s| s.is_public)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn featured_playlists(&self) -> Result<Vec<Value>, StorageError> {
        Ok(self.featured.clone())
    }
}
