//! Configuration management for the Cooldify backend.
//!
//! Configuration comes from environment variables. Before reading them,
//! [`load_env`] merges a `.env` file from the local data directory into the
//! process environment, so the lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Defaults for the optional settings
//!
//! The resulting [`Config`] is read once at startup and handed to the server
//! and CLI as a value; nothing reads the environment afterwards.

use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use thiserror::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8001";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str =
    "playlist-read-private user-library-read streaming user-read-email user-read-private";
pub const DEFAULT_BUCKET: &str = "audio-files";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid server address '{0}': {1}")]
    InvalidAddress(String, std::net::AddrParseError),

    #[error("cannot prepare config directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot load {}: {}", .0.display(), .1)]
    EnvFile(PathBuf, dotenv::Error),
}

/// Spotify application credentials and endpoints.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub spotify: SpotifyConfig,
    /// `None` keeps uploaded songs in memory.
    pub supabase: Option<SupabaseConfig>,
}

/// Loads `<data_local_dir>/cooldify/.env` into the environment.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error; variables may come from the process environment alone.
///
/// - Linux: `~/.local/share/cooldify/.env`
/// - macOS: `~/Library/Application Support/cooldify/.env`
/// - Windows: `%LOCALAPPDATA%/cooldify/.env`
pub async fn load_env() -> Result<(), ConfigError> {
    load_env_from(&env_path()).await
}

/// Merges the `.env` file at `path` into the environment. Variables already
/// set in the environment win over the file.
pub async fn load_env_from(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::EnvFile(path.to_path_buf(), e)),
    }
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("cooldify/.env");
    path
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let address = get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());
        let server_addr = address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidAddress(address.clone(), e))?;

        let spotify = SpotifyConfig {
            client_id: require("SPOTIFY_CLIENT_ID")?,
            client_secret: require("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: require("SPOTIFY_REDIRECT_URI")?,
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        };

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                key,
                bucket: get("SUPABASE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            }),
            _ => None,
        };

        Ok(Config {
            server_addr,
            spotify,
            supabase,
        })
    }
}
