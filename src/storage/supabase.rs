use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{SongStore, StorageError};
use crate::{
    config::SupabaseConfig,
    types::{NewSong, Song},
};

const SONGS_TABLE: &str = "songs";
const PLAYLISTS_TABLE: &str = "playlists";

/// Supabase Storage + PostgREST backend, authenticated with the service key.
pub struct SupabaseStore {
    http: Client,
    config: SupabaseConfig,
}

impl SupabaseStore {
    pub fn new(http: Client, config: SupabaseConfig) -> Self {
        SupabaseStore { http, config }
    }

    pub fn object_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.url, self.config.bucket, file_name
        )
    }

    pub fn public_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.url, self.config.bucket, file_name
        )
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key)
    }
}

async fn checked(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Status { status, body })
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, StorageError> {
    Ok(checked(response).await?.json::<T>().await?)
}

#[async_trait]
impl SongStore for SupabaseStore {
    async fn upload_audio(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError> {
        debug!(file_name, bytes = data.len(), "uploading audio to supabase");
        let request = self
            .http
            .post(self.object_url(file_name))
            .header("content-type", content_type)
            .body(data);
        checked(self.authorized(request).send().await?).await?;

        Ok(self.public_url(file_name))
    }

    async fn create_song(&self, song: NewSong) -> Result<Song, StorageError> {
        let request = self
            .http
            .post(self.table_url(SONGS_TABLE))
            .header("Prefer", "return=representation")
            .json(&song);
        let rows: Vec<Song> = json(self.authorized(request).send().await?).await?;

        rows.into_iter()
            .next()
            .ok_or(StorageError::NotCreated(SONGS_TABLE))
    }

    async fn list_songs(&self, limit: u32) -> Result<Vec<Song>, StorageError> {
        let request = self.http.get(self.table_url(SONGS_TABLE)).query(&[
            ("select", "*".to_string()),
            ("is_public", "eq.true".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ]);
        json(self.authorized(request).send().await?).await
    }

    async fn featured_playlists(&self) -> Result<Vec<Value>, StorageError> {
        let request = self.http.get(self.table_url(PLAYLISTS_TABLE)).query(&[
            ("select", "*,playlist_songs(*,songs(*))"),
            ("is_featured", "eq.true"),
        ]);
        json(self.authorized(request).send().await?).await
    }
}
