use std::{path::Path, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tabled::Table;

use crate::{
    Res,
    config::Config,
    error, info, warning,
    management::TokenManager,
    mood::{self, AudioFeatures, MoodSummary},
    spotify::SpotifyClient,
    types::MoodTableRow,
};

/// Prints the mood of a Spotify playlist, or of a local features file.
///
/// The file is a JSON array whose entries are feature objects or `null`,
/// the same shape as the `audio_features` array of Spotify's
/// `/audio-features` response.
pub async fn mood(playlist_id: Option<String>, file: Option<String>) {
    let summary = match (playlist_id, file) {
        (_, Some(path)) => match mood_from_file(Path::new(&path)).await {
            Ok(summary) => summary,
            Err(e) => error!("Cannot read features from {}: {}", path, e),
        },
        (Some(id), None) => match remote_mood(&id).await {
            Ok(summary) => summary,
            Err(e) => error!("Cannot compute mood for playlist {}: {}", id, e),
        },
        (None, None) => error!("Pass a playlist id or --file <features.json>."),
    };

    print_summary(&summary);
}

pub async fn mood_from_file(path: &Path) -> Res<MoodSummary> {
    let content = async_fs::read_to_string(path).await?;
    let records: Vec<Option<AudioFeatures>> = serde_json::from_str(&content)?;
    Ok(mood::calculate_mood(&records))
}

async fn remote_mood(playlist_id: &str) -> Res<MoodSummary> {
    let config = Config::from_env()?;
    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => error!("No cached token ({}). Run cooldify auth first.", e),
    };

    let http = Client::new();
    let token = token_mgr.get_valid_token(&http, &config.spotify).await?;
    let client = SpotifyClient::new(http, config.spotify.api_url.as_str(), token);

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Analysing playlist {playlist_id}..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = client.playlist_mood(playlist_id).await;
    pb.finish_and_clear();

    Ok(result?)
}

fn print_summary(summary: &MoodSummary) {
    let table = Table::new(vec![MoodTableRow::from(summary)]);
    println!("{}", table);
    if summary.is_unknown() {
        warning!("None of the tracks has audio features.");
    } else {
        info!("{}", summary.description);
    }
}
