use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    config::Config,
    error::{ConfigError, ConfigResult, ProviderError, ProviderResult},
    types::Token,
    utils,
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Builds the Spotify authorization URL for the PKCE flow.
///
/// The user is sent here from `/login`; after consenting Spotify redirects
/// back to the configured redirect URI with a `code` query parameter.
///
/// # Arguments
///
/// * `config` - Client id, redirect URI, scope and authorize endpoint
/// * `code_verifier` - Verifier kept in the session until the callback; only
///   its SHA256 challenge leaves the server here
pub fn authorize_url(config: &Config, code_verifier: &str) -> ConfigResult<String> {
    let code_challenge = utils::generate_code_challenge(code_verifier);
    let show_dialog = config.show_dialog.to_string();
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("scope", config.scope.as_str()),
            ("show_dialog", show_dialog.as_str()),
        ],
    )
    .map_err(|e| ConfigError::InvalidValue {
        field: "SPOTIFY_API_AUTH_URL".to_string(),
        value: format!("{} ({})", config.auth_url, e),
    })?;
    Ok(url.to_string())
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// The verifier proves that the client finishing the flow is the one that
/// started it. Authorization codes are single-use and short-lived, so this
/// runs directly in the `/login` callback.
///
/// # Errors
///
/// Returns a [`ProviderError`] for network failures, a rejected code or
/// verifier, or a malformed token response.
pub async fn exchange_code_pkce(
    http: &Client,
    config: &Config,
    code: &str,
    verifier: &str,
) -> ProviderResult<Token> {
    let res = http
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let res = res.error_for_status()?;
    let json = res.json::<TokenResponse>().await?;
    Ok(json.into_token(None))
}

/// Refreshes an expired access token.
///
/// Spotify may rotate the refresh token; when the response carries none the
/// previous one is kept.
pub async fn refresh_token(
    http: &Client,
    config: &Config,
    refresh_token: &str,
) -> ProviderResult<Token> {
    if refresh_token.is_empty() {
        return Err(ProviderError::Unauthorized);
    }

    let res = http
        .post(&config.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
        ])
        .send()
        .await?;

    let res = res.error_for_status()?;
    let json = res.json::<TokenResponse>().await?;
    Ok(json.into_token(Some(refresh_token)))
}
