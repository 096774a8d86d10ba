use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::api::{self, AppState, MAX_UPLOAD_BYTES};

// multipart framing on top of the file itself
const UPLOAD_BODY_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let spotify = Router::new()
        .route("/auth/login", get(api::login))
        .route("/auth/callback", get(api::callback))
        .route("/auth/refresh", post(api::refresh))
        .route("/playlists/featured", get(api::featured_playlists))
        .route("/playlists/user", get(api::user_playlists))
        .route("/playlists/{playlist_id}/tracks", get(api::playlist_tracks))
        .route("/playlists/{playlist_id}/mood", get(api::playlist_mood))
        .route("/user/profile", get(api::user_profile))
        .route("/search", get(api::search));

    let songs = Router::new()
        .route(
            "/upload",
            post(api::upload_song)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + UPLOAD_BODY_OVERHEAD)),
        )
        .route("/", get(api::list_songs))
        .route("/featured-playlists", get(api::featured_song_playlists));

    Router::new()
        .route("/health", get(api::health))
        .nest("/api/spotify", spotify)
        .nest("/api/songs", songs)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_api_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await
}
