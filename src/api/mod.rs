//! # API Module
//!
//! HTTP endpoints of the Cooldify backend. Handlers are thin: they pull the
//! bearer token and query parameters out of the request, call into
//! [`crate::spotify`], [`crate::mood`] or [`crate::storage`], and map errors
//! to status codes through [`ApiError`].
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `GET /api/spotify/auth/login`, returns the Spotify authorize URL
//! - [`callback`] - `GET /api/spotify/auth/callback`, exchanges the code for a token
//! - [`refresh`] - `POST /api/spotify/auth/refresh`
//!
//! ### Catalog (bearer token required)
//!
//! - [`featured_playlists`], [`user_playlists`], [`playlist_tracks`]
//! - [`playlist_mood`] - mood inference for one playlist
//! - [`user_profile`], [`search`]
//!
//! ### Songs
//!
//! - [`upload_song`] - multipart audio upload
//! - [`list_songs`], [`featured_song_playlists`]
//!
//! ### Monitoring
//!
//! - [`health`]
//!
//! ## State
//!
//! [`AppState`] carries only immutable configuration and shared handles. The
//! per-caller Spotify context is created inside each handler from the
//! request's token, see [`AppState::spotify`].

mod auth;
mod error;
mod health;
mod playlists;
mod songs;

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header::AUTHORIZATION, request::Parts},
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

pub use auth::{callback, login, refresh};
pub use error::ApiError;
pub use health::health;
pub use playlists::{
    featured_playlists, playlist_mood, playlist_tracks, search, user_playlists, user_profile,
};
pub use songs::{MAX_UPLOAD_BYTES, featured_song_playlists, list_songs, upload_song};

use crate::{config::SpotifyConfig, spotify::SpotifyClient, storage::SongStore, types::Token};

/// Receives the token of a completed OAuth callback, used by `cooldify auth`.
pub type TokenSink = Arc<Mutex<Option<Token>>>;

#[derive(Clone)]
pub struct AppState {
    pub spotify_config: Arc<SpotifyConfig>,
    pub http: Client,
    pub store: Arc<dyn SongStore>,
    pub token_sink: Option<TokenSink>,
}

impl AppState {
    pub fn new(spotify_config: SpotifyConfig, http: Client, store: Arc<dyn SongStore>) -> Self {
        AppState {
            spotify_config: Arc::new(spotify_config),
            http,
            store,
            token_sink: None,
        }
    }

    pub fn with_token_sink(mut self, sink: TokenSink) -> Self {
        self.token_sink = Some(sink);
        self
    }

    /// Spotify context for one caller.
    pub fn spotify(&self, token: &BearerToken) -> SpotifyClient {
        SpotifyClient::new(
            self.http.clone(),
            self.spotify_config.api_url.as_str(),
            token.0.as_str(),
        )
    }
}

/// Access token taken from the `Authorization` header.
#[derive(Debug, Clone, PartialEq)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer)
            .map(BearerToken)
            .ok_or(ApiError::MissingToken)
    }
}

/// Strips an optional `Bearer ` prefix; `None` when nothing is left.
pub fn parse_bearer(header: &str) -> Option<String> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// [`Query`] whose rejection is an [`ApiError`], so a malformed query string
/// gets the same `{"detail": ...}` body as every other failure.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// [`Json`] body extractor rejecting with 400 and a `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Applies the default and checks `1..=max`.
pub(crate) fn bounded_limit(limit: Option<u32>, default: u32, max: u32) -> Result<u32, ApiError> {
    let limit = limit.unwrap_or(default);
    if (1..=max).contains(&limit) {
        Ok(limit)
    } else {
        Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {max}"
        )))
    }
}
