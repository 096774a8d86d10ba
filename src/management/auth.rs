use std::path::{Path, PathBuf};

use reqwest::Client;
use thiserror::Error;

use crate::{
    config::SpotifyConfig,
    spotify::{SpotifyError, auth},
    types::Token,
};

#[derive(Debug, Error)]
pub enum TokenCacheError {
    #[error("cannot access token cache: {0}")]
    Io(#[from] std::io::Error),

    #[error("token cache is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Token obtained by `cooldify auth`, cached in the local data directory.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Result<Self, TokenCacheError> {
        Self::load_from(&Self::token_path()).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, TokenCacheError> {
        let content = async_fs::read_to_string(path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), TokenCacheError> {
        self.persist_to(&Self::token_path()).await
    }

    pub async fn persist_to(&self, path: &Path) -> Result<(), TokenCacheError> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Current access token, refreshed (and re-cached) first when expired.
    pub async fn get_valid_token(
        &mut self,
        http: &Client,
        config: &SpotifyConfig,
    ) -> Result<String, SpotifyError> {
        if self.token.is_expired() {
            self.token = auth::refresh_token(http, config, &self.token.refresh_token).await?;
            // a failed write only costs a refresh next time
            let _ = self.persist().await;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("cooldify/cache/token.json");
        path
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
