use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    api::{AppState, TokenSink},
    config::Config,
    error, info,
    management::TokenManager,
    server::start_api_server,
    spotify, storage, success,
    types::Token,
    warning,
};

const MAX_WAIT: Duration = Duration::from_secs(60);

/// Runs the authorization-code flow for the command line.
///
/// Starts the HTTP server with a token sink, opens the Spotify authorize URL
/// in the browser and waits for the callback route to store a token, which
/// is then cached for `cooldify mood`. `SPOTIFY_REDIRECT_URI` has to point at
/// this server's `/api/spotify/auth/callback` route for the flow to finish.
pub async fn auth(config: Config) {
    let sink: TokenSink = Arc::new(Mutex::new(None));

    let http = Client::new();
    let store = storage::from_config(config.supabase.as_ref(), http.clone());
    let state = AppState::new(config.spotify.clone(), http, store).with_token_sink(Arc::clone(&sink));

    let addr = config.server_addr;
    tokio::spawn(async move {
        if let Err(e) = start_api_server(addr, state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = match spotify::auth::authorize_url(&config.spotify) {
        Ok(url) => url,
        Err(e) => error!("Cannot build authorization URL: {}", e),
    };

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }
    info!("Waiting for Spotify to redirect to {}", config.spotify.redirect_uri);

    match wait_for_token(sink, MAX_WAIT).await {
        Some(token) => {
            if let Err(e) = TokenManager::new(token).persist().await {
                error!("Failed to save token to cache: {}", e);
            }
            success!("Authentication successful!");
        }
        None => error!("Authentication failed or timed out."),
    }
}

/// Polls the sink once a second until a token shows up or `max_wait` passes.
pub async fn wait_for_token(sink: TokenSink, max_wait: Duration) -> Option<Token> {
    let start = tokio::time::Instant::now();

    while start.elapsed() < max_wait {
        if let Some(token) = sink.lock().await.take() {
            return Some(token);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
