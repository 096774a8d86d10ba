use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;
use tracing::info;

use super::{ApiError, ApiJson, ApiQuery, AppState};
use crate::{
    spotify::auth as spotify_auth,
    types::{AuthUrlResponse, RefreshTokenRequest, Token},
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

pub async fn login(State(state): State<AppState>) -> Result<Json<AuthUrlResponse>, ApiError> {
    let auth_url = spotify_auth::authorize_url(&state.spotify_config)?;
    Ok(Json(AuthUrlResponse { auth_url }))
}

pub async fn callback(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CallbackParams>,
) -> Result<Json<Token>, ApiError> {
    if let Some(reason) = params.error {
        return Err(ApiError::BadRequest(format!(
            "Authorization denied: {reason}"
        )));
    }
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(ApiError::BadRequest(
            "Missing authorization code".to_string(),
        ));
    };

    let token = spotify_auth::exchange_code(&state.http, &state.spotify_config, &code)
        .await
        .map_err(ApiError::TokenExchange)?;

    if let Some(sink) = &state.token_sink {
        *sink.lock().await = Some(token.clone());
    }

    info!(scope = %token.scope, "authorization code exchanged");
    Ok(Json(token))
}

pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshTokenRequest>,
) -> Result<Json<Token>, ApiError> {
    let token =
        spotify_auth::refresh_token(&state.http, &state.spotify_config, &request.refresh_token)
            .await
            .map_err(ApiError::TokenRefresh)?;
    Ok(Json(token))
}
