use reqwest::Client;

use crate::{api::AppState, config::Config, error, server::start_api_server, storage};

pub async fn serve(config: Config) {
    let http = Client::new();
    let store = storage::from_config(config.supabase.as_ref(), http.clone());
    if config.supabase.is_none() {
        tracing::warn!("SUPABASE_URL or SUPABASE_KEY not set, uploaded songs are kept in memory");
    }

    let state = AppState::new(config.spotify, http, store);
    if let Err(e) = start_api_server(config.server_addr, state).await {
        error!("Server failed: {}", e);
    }
}
