use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{config::SpotifyConfig, spotify::SpotifyError, types::Token};

/// Raw token endpoint payload. `refresh_token` and `scope` are absent on
/// some refresh responses.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh_token: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Builds the Spotify authorization URL the user is sent to.
///
/// # Example
///
/// ```
/// let url = authorize_url(&config.spotify)?;
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
/// ```
pub fn authorize_url(config: &SpotifyConfig) -> Result<String, SpotifyError> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("show_dialog", "false"),
        ],
    )
    .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", config.auth_url, e)))?;

    Ok(url.to_string())
}

/// Exchanges an authorization code from the OAuth callback for a token.
pub async fn exchange_code(
    http: &Client,
    config: &SpotifyConfig,
    code: &str,
) -> Result<Token, SpotifyError> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];

    let res = request_token(http, config, &form).await?;
    Ok(res.into_token(None))
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; when it does not, the
/// one passed in is kept on the returned [`Token`].
pub async fn refresh_token(
    http: &Client,
    config: &SpotifyConfig,
    refresh_token: &str,
) -> Result<Token, SpotifyError> {
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];

    let res = request_token(http, config, &form).await?;
    Ok(res.into_token(Some(refresh_token)))
}

async fn request_token(
    http: &Client,
    config: &SpotifyConfig,
    form: &[(&str, &str)],
) -> Result<TokenResponse, SpotifyError> {
    let response = http.post(&config.token_url).form(form).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(%status, "token endpoint rejected request");
        return Err(SpotifyError::Status { status, body });
    }

    Ok(response.json::<TokenResponse>().await?)
}
