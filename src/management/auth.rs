use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::{
    config::Config,
    error::{ProviderError, ProviderResult},
    spotify,
    types::Token,
    warning,
};

/// Per-session token cache. Each session's token lives in its own file,
/// named after the session's credential-cache key.
pub struct TokenManager {
    path: PathBuf,
    token: Token,
}

impl TokenManager {
    pub fn new(dir: &Path, key: &str, token: Token) -> Self {
        TokenManager {
            path: Self::token_path(dir, key),
            token,
        }
    }

    pub async fn load(dir: &Path, key: &str) -> Result<Self, String> {
        let path = Self::token_path(dir, key);
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { path, token })
    }

    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Deletes the cached token of `key`; a missing file is not an error.
    pub async fn remove(dir: &Path, key: &str) -> Result<(), String> {
        match async_fs::remove_file(Self::token_path(dir, key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Current access token, refreshed first when it is about to expire.
    pub async fn get_valid_token(&mut self, http: &Client, config: &Config) -> ProviderResult<String> {
        if self.is_expired() {
            let new_token = spotify::auth::refresh_token(http, config, &self.token.refresh_token)
                .await
                .map_err(|e| {
                    warning!("Token refresh failed: {}", e);
                    ProviderError::Unauthorized
                })?;
            self.token = new_token;
            if let Err(e) = self.persist().await {
                warning!("Failed to save refreshed token: {}", e);
            }
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + 240 >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{}.json", key))
    }
}
