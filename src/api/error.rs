use axum::{
    Json,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{spotify::SpotifyError, storage::StorageError};

/// Errors returned by the HTTP handlers, rendered as `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid Authorization header")]
    MissingToken,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to exchange authorization code")]
    TokenExchange(#[source] SpotifyError),

    #[error("Failed to refresh access token")]
    TokenRefresh(#[source] SpotifyError),

    #[error(transparent)]
    Spotify(#[from] SpotifyError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TokenExchange(_) | ApiError::TokenRefresh(_) => StatusCode::BAD_REQUEST,
            ApiError::Spotify(e) => match e {
                SpotifyError::Unauthorized => StatusCode::UNAUTHORIZED,
                SpotifyError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                SpotifyError::EmptyPlaylist(_) => StatusCode::NOT_FOUND,
                SpotifyError::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
                    StatusCode::NOT_FOUND
                }
                SpotifyError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
                SpotifyError::Http(_) | SpotifyError::Status { .. } => StatusCode::BAD_GATEWAY,
            },
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Spotify(SpotifyError::EmptyPlaylist(_)) => {
                "No tracks found in playlist".to_string()
            }
            ApiError::Spotify(SpotifyError::Http(_) | SpotifyError::Status { .. }) => {
                "Failed to fetch data from Spotify".to_string()
            }
            ApiError::Storage(_) => "Storage backend failure".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, source = ?std::error::Error::source(&self), "request failed");
        } else {
            warn!(error = %self, %status, "request rejected");
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
