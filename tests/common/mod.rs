//! Shared fixtures: a fake Spotify served by axum on a random local port.

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use axum::{
    Form, Json, Router,
    body::Body,
    extract::{Path, Query},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use cooldify::{
    api::AppState,
    config::{DEFAULT_SCOPE, SpotifyConfig},
    storage::{MemoryStore, SongStore},
};
use serde_json::{Value, json};

pub const GOOD_TOKEN: &str = "good-token";

/// Binds `router` to 127.0.0.1 on a free port and returns its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {GOOD_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
    )
        .into_response()
}

pub fn features(energy: f64, valence: f64, tempo: f64, danceability: f64) -> Value {
    json!({
        "energy": energy,
        "valence": valence,
        "tempo": tempo,
        "danceability": danceability,
        "acousticness": 0.1,
        "key": 5,
        "type": "audio_features"
    })
}

async fn playlist_tracks(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let items = match id.as_str() {
        "empty" => json!([]),
        "unanalysed" => json!([{"track": {"id": "x", "name": "No Features"}}]),
        _ => json!([
            {"track": {"id": "a", "name": "Track A"}},
            {"track": null},
            {"track": {"id": "b", "name": "Track B"}},
            {"track": {"id": "c", "name": "Track C"}},
        ]),
    };
    Json(json!({ "items": items })).into_response()
}

async fn audio_features(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let ids = q.get("ids").cloned().unwrap_or_default();
    let records: Vec<Value> = ids
        .split(',')
        .map(|id| match id {
            "a" => features(0.8, 0.8, 120.0, 0.6),
            "b" => features(0.7, 0.9, 124.0, 0.7),
            _ => Value::Null,
        })
        .collect();
    Json(json!({ "audio_features": records })).into_response()
}

async fn featured(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let limit = q.get("limit").cloned().unwrap_or_default();
    Json(json!({
        "message": "Popular Playlists",
        "playlists": {"items": [{"id": "p1", "name": "Chill Hits", "limit_seen": limit}], "total": 1}
    }))
    .into_response()
}

async fn my_playlists(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"items": [{"id": "mine"}], "next": null, "total": 1})).into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"id": "user-1", "display_name": "Test User"})).into_response()
}

async fn search(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let query = q.get("q").cloned().unwrap_or_default();
    let kind = q.get("type").cloned().unwrap_or_default();
    Json(json!({"tracks": {"items": [{"id": "s1", "name": query, "kind": kind}]}})).into_response()
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    let grant = form.get("grant_type").map(String::as_str);
    match grant {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good-code") => {
            Json(json!({
                "access_token": "fresh-access",
                "token_type": "Bearer",
                "refresh_token": "fresh-refresh",
                "scope": "playlist-read-private",
                "expires_in": 3600
            }))
            .into_response()
        }
        Some("refresh_token") if form.get("refresh_token").is_some() => Json(json!({
            "access_token": "refreshed-access",
            "token_type": "Bearer",
            "expires_in": 3600
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant"})),
        )
            .into_response(),
    }
}

/// Fake Spotify API (`/v1/...`) and accounts service (`/api/token`).
pub fn fake_spotify() -> Router {
    Router::new()
        .route("/v1/playlists/{id}/tracks", get(playlist_tracks))
        .route("/v1/audio-features", get(audio_features))
        .route("/v1/browse/featured-playlists", get(featured))
        .route("/v1/me/playlists", get(my_playlists))
        .route("/v1/me", get(me))
        .route("/v1/search", get(search))
        .route("/api/token", post(token))
}

pub fn spotify_config(base: &str) -> SpotifyConfig {
    SpotifyConfig {
        client_id: "client-123".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://127.0.0.1:8001/api/spotify/auth/callback".to_string(),
        scope: DEFAULT_SCOPE.to_string(),
        auth_url: "https://accounts.spotify.com/authorize".to_string(),
        token_url: format!("{base}/api/token"),
        api_url: format!("{base}/v1"),
    }
}

pub async fn app_state(store: Arc<dyn SongStore>) -> AppState {
    let base = spawn(fake_spotify()).await;
    AppState::new(spotify_config(&base), reqwest::Client::new(), store)
}

pub async fn default_state() -> AppState {
    app_state(Arc::new(MemoryStore::new())).await
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
