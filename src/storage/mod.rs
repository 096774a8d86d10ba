//! Song storage backends.
//!
//! Uploaded audio files and song records live behind the [`SongStore`]
//! trait. [`SupabaseStore`] talks to a Supabase project (Storage for files,
//! PostgREST for rows); [`MemoryStore`] keeps everything in process and is
//! used when no Supabase credentials are configured.

mod memory;
mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use crate::{
    config::SupabaseConfig,
    types::{NewSong, Song},
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("insert into '{0}' returned no row")]
    NotCreated(&'static str),
}

#[async_trait]
pub trait SongStore: Send + Sync {
    /// Stores the file and returns its public URL.
    async fn upload_audio(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError>;

    async fn create_song(&self, song: NewSong) -> Result<Song, StorageError>;

    /// Public songs, newest first.
    async fn list_songs(&self, limit: u32) -> Result<Vec<Song>, StorageError>;

    /// Featured playlists with their songs embedded.
    async fn featured_playlists(&self) -> Result<Vec<Value>, StorageError>;
}

/// Supabase when configured, in-memory otherwise.
pub fn from_config(config: Option<&SupabaseConfig>, http: Client) -> Arc<dyn SongStore> {
    match config {
        Some(cfg) => Arc::new(SupabaseStore::new(http, cfg.clone())),
        None => Arc::new(MemoryStore::new()),
    }
}
