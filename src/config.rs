//! Configuration management for spodivide.
//!
//! Configuration values come from environment variables, optionally seeded
//! from `.env` files. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/spodivide/.env`)
//! 4. Application defaults (where applicable)
//!
//! The individual getters read the environment on every call; [`Config::load`]
//! takes a validated snapshot once at startup which the server shares with
//! its handlers.

use std::{env, path::PathBuf, time::Duration};

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/login";
pub const DEFAULT_SCOPE: &str = "playlist-read-private,playlist-modify-private,playlist-read-collaborative,playlist-modify-public,user-library-read,user-library-modify";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SESSION_LIFETIME_MINUTES: u64 = 60;

/// Loads environment variables from `.env` files.
///
/// The working directory is tried first, then `spodivide/.env` inside the
/// platform-specific local data directory:
/// - Linux: `~/.local/share/spodivide/.env`
/// - macOS: `~/Library/Application Support/spodivide/.env`
/// - Windows: `%LOCALAPPDATA%/spodivide/.env`
///
/// Missing files are fine; values may come from the process environment
/// alone. The data directory is created so the token and session caches
/// have a home.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> ConfigResult<()> {
    let _ = dotenv::dotenv();

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
    }
    Ok(())
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(name: &str) -> ConfigResult<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
            var_name: name.to_string(),
        })
}

/// Address and port the web server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Client id of the application registered with Spotify
/// (`SPOTIFY_API_AUTH_CLIENT_ID`). Required.
pub fn spotify_client_id() -> ConfigResult<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`). It must point at this
/// server's `/login` route and match the URI registered with Spotify.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Scopes requested during authorization (`SPOTIFY_API_AUTH_SCOPE`).
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Spotify authorization endpoint (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Spotify token exchange endpoint (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Root of the local data directory (`SPODIVIDE_DATA_DIR`).
pub fn data_dir() -> PathBuf {
    match env::var("SPODIVIDE_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("spodivide");
            path
        }
    }
}

/// Directory of the file-backed session store (`SPODIVIDE_SESSION_DIR`).
pub fn session_dir() -> PathBuf {
    match env::var("SPODIVIDE_SESSION_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => data_dir().join("sessions"),
    }
}

/// Directory holding one cached token per session.
pub fn token_dir() -> PathBuf {
    data_dir().join("cache/tokens")
}

/// Session backend (`SPODIVIDE_SESSION_BACKEND`), `file` or `memory`.
pub fn session_backend() -> ConfigResult<SessionBackend> {
    let value = var_or("SPODIVIDE_SESSION_BACKEND", "file");
    match value.to_lowercase().as_str() {
        "file" => Ok(SessionBackend::File),
        "memory" => Ok(SessionBackend::Memory),
        _ => Err(ConfigError::InvalidValue {
            field: "SPODIVIDE_SESSION_BACKEND".to_string(),
            value,
        }),
    }
}

/// Idle lifetime of a session (`SPODIVIDE_SESSION_LIFETIME_MINUTES`).
pub fn session_lifetime() -> ConfigResult<Duration> {
    parse_session_lifetime(&var_or(
        "SPODIVIDE_SESSION_LIFETIME_MINUTES",
        &DEFAULT_SESSION_LIFETIME_MINUTES.to_string(),
    ))
}

/// Parses a lifetime given in whole minutes.
///
/// # Errors
///
/// [`ConfigError::InvalidValue`] for anything that is not a positive number
/// of minutes, or one too large to express in seconds.
pub fn parse_session_lifetime(value: &str) -> ConfigResult<Duration> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|m| *m > 0)
        .and_then(|m| m.checked_mul(60))
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidValue {
            field: "SPODIVIDE_SESSION_LIFETIME_MINUTES".to_string(),
            value: value.to_string(),
        })
}

/// Whether Spotify should always show the consent dialog
/// (`SPODIVIDE_SHOW_DIALOG`).
pub fn show_dialog() -> bool {
    !matches!(
        var_or("SPODIVIDE_SHOW_DIALOG", "true").to_lowercase().as_str(),
        "false" | "0" | "no"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    File,
    Memory,
}

/// Snapshot of all settings the server needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub show_dialog: bool,
    pub session_backend: SessionBackend,
    pub session_dir: PathBuf,
    pub session_lifetime: Duration,
    pub token_dir: PathBuf,
}

impl Config {
    pub fn load() -> ConfigResult<Self> {
        Ok(Self {
            server_addr: server_addr(),
            client_id: spotify_client_id()?,
            redirect_uri: spotify_redirect_uri(),
            scope: spotify_scope(),
            auth_url: spotify_apiauth_url(),
            token_url: spotify_apitoken_url(),
            api_url: spotify_apiurl(),
            show_dialog: show_dialog(),
            session_backend: session_backend()?,
            session_dir: session_dir(),
            session_lifetime: session_lifetime()?,
            token_dir: token_dir(),
        })
    }
}
