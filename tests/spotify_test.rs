mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use cooldify::spotify::{MAX_ATTEMPTS, SpotifyClient, SpotifyError, auth};
use serde_json::json;

use common::{GOOD_TOKEN, fake_spotify, spawn, spotify_config};

/// Serves `/v1/me` with `failure` for the first `failures` calls, then 200.
async fn flaky_profile(failures: usize, failure: fn() -> Response) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/v1/me",
        get(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < failures {
                    failure()
                } else {
                    Json(json!({"id": "user-1"})).into_response()
                }
            }
        }),
    );
    let base = spawn(router).await;
    (format!("{base}/v1"), calls)
}

fn rate_limited(retry_after: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("retry-after", HeaderValue::from_static(retry_after));
    (StatusCode::TOO_MANY_REQUESTS, headers, "slow down").into_response()
}

#[tokio::test]
async fn test_retries_after_short_rate_limit() {
    let (api_url, calls) = flaky_profile(1, || rate_limited("1")).await;
    let client = SpotifyClient::new(reqwest::Client::new(), api_url, GOOD_TOKEN);

    let profile = client.user_profile().await.unwrap();
    assert_eq!(profile["id"], "user-1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_gives_up_on_long_rate_limit() {
    let (api_url, calls) = flaky_profile(usize::MAX, || rate_limited("500")).await;
    let client = SpotifyClient::new(reqwest::Client::new(), api_url, GOOD_TOKEN);

    let err = client.user_profile().await.unwrap_err();
    assert!(matches!(err, SpotifyError::RateLimited { retry_after: 500 }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bad_gateway_is_retried_up_to_max_attempts() {
    let (api_url, calls) =
        flaky_profile(usize::MAX, || StatusCode::BAD_GATEWAY.into_response()).await;
    let client = SpotifyClient::new(reqwest::Client::new(), api_url, GOOD_TOKEN);

    let err = client.user_profile().await.unwrap_err();
    match err {
        SpotifyError::Status { status, .. } => assert_eq!(status, StatusCode::BAD_GATEWAY),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS as usize);
}

#[tokio::test]
async fn test_bad_gateway_then_success() {
    let (api_url, calls) = flaky_profile(1, || StatusCode::BAD_GATEWAY.into_response()).await;
    let client = SpotifyClient::new(reqwest::Client::new(), api_url, GOOD_TOKEN);

    assert!(client.user_profile().await.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let (api_url, calls) =
        flaky_profile(usize::MAX, || StatusCode::UNAUTHORIZED.into_response()).await;
    let client = SpotifyClient::new(reqwest::Client::new(), api_url, "stale");

    let err = client.user_profile().await.unwrap_err();
    assert!(matches!(err, SpotifyError::Unauthorized));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_audio_features_without_ids_skips_request() {
    // nothing listens on the discard port
    let client = SpotifyClient::new(reqwest::Client::new(), "http://127.0.0.1:9/v1", GOOD_TOKEN);
    assert!(client.audio_features(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_audio_features_keeps_positions() {
    let base = spawn(fake_spotify()).await;
    let client = SpotifyClient::new(reqwest::Client::new(), format!("{base}/v1"), GOOD_TOKEN);

    let ids: Vec<String> = ["a", "c", "b"].iter().map(|s| s.to_string()).collect();
    let records = client.audio_features(&ids).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].unwrap().energy, 0.8);
    assert!(records[1].is_none());
    assert_eq!(records[2].unwrap().tempo, 124.0);
}

#[tokio::test]
async fn test_playlist_mood_of_empty_playlist() {
    let base = spawn(fake_spotify()).await;
    let client = SpotifyClient::new(reqwest::Client::new(), format!("{base}/v1"), GOOD_TOKEN);

    let err = client.playlist_mood("empty").await.unwrap_err();
    assert!(matches!(err, SpotifyError::EmptyPlaylist(id) if id == "empty"));
}

#[tokio::test]
async fn test_playlist_mood() {
    let base = spawn(fake_spotify()).await;
    let client = SpotifyClient::new(reqwest::Client::new(), format!("{base}/v1"), GOOD_TOKEN);

    let summary = client.playlist_mood("p1").await.unwrap();
    assert_eq!(summary.overall_mood, "Energetic & Uplifting");
    assert_eq!(summary.tempo, 122.0);
}

#[tokio::test]
async fn test_exchange_code() {
    let base = spawn(fake_spotify()).await;
    let config = spotify_config(&base);
    let http = reqwest::Client::new();

    let token = auth::exchange_code(&http, &config, "good-code").await.unwrap();
    assert_eq!(token.access_token, "fresh-access");
    assert_eq!(token.refresh_token, "fresh-refresh");
    assert_eq!(token.expires_in, 3600);
    assert!(!token.is_expired());

    let err = auth::exchange_code(&http, &config, "nope").await.unwrap_err();
    assert!(matches!(err, SpotifyError::Status { status, .. } if status == StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_refresh_token_keeps_previous_refresh_token() {
    let base = spawn(fake_spotify()).await;
    let config = spotify_config(&base);

    let token = auth::refresh_token(&reqwest::Client::new(), &config, "keep-me")
        .await
        .unwrap();
    assert_eq!(token.access_token, "refreshed-access");
    assert_eq!(token.refresh_token, "keep-me");
    assert_eq!(token.token_type, "Bearer");
}
