use thiserror::Error;

use crate::types::Action;

/// Failures while talking to the Spotify Web API.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Http(String),
    #[error("API request failed: {status} - {message}")]
    Status { status: u16, message: String },
    #[error("Rate limit exceeded, retry after: {retry_after}s")]
    RateLimited { retry_after: u64 },
    #[error("Access token rejected or expired")]
    Unauthorized,
    #[error("JSON parsing error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ProviderError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => ProviderError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ProviderError::Http(err.to_string()),
        }
    }
}

/// Error kinds of the divide workflow. None of them is fatal: each one is
/// resolved by the user restarting a wizard step.
#[derive(Debug, Clone, Error)]
pub enum DivideError {
    #[error("Spotify is unavailable, please try again: {0}")]
    ProviderUnavailable(#[from] ProviderError),
    #[error("Source playlist is empty, select another source playlist.")]
    EmptySource,
    #[error(
        "Source playlist only contains non-track items (Podcasts), select another playlist."
    )]
    NoDivisibleEntries,
    #[error("{}", invalid_combination_message(*action, *targets))]
    InvalidActionTargetCombination { action: Action, targets: usize },
    #[error("No (more) tracks in source playlist, select another source playlist.")]
    Exhausted,
    #[error("No source playlist selected, select a source playlist in step 1.")]
    NoSourceSelected,
    #[error("No target playlist selected, please select target playlists in step 2.")]
    NoTargetSelected,
    #[error(
        "Only the 'copy' action is available, as you do not own the source playlist (or it's a collaborative playlist)."
    )]
    SourceReadOnly,
    #[error("Not logged in to Spotify.")]
    NotAuthenticated,
}

fn invalid_combination_message(action: Action, targets: usize) -> String {
    match action {
        Action::Remove => format!(
            "No action taken as you've selected 'Remove', but you also have {} target playlist(s) selected. \
             Deselect all playlists to remove, or select the 'Copy' or 'Move' action.",
            targets
        ),
        other => format!(
            "No action taken as you've selected '{}', but without a target playlist.",
            other.label()
        ),
    }
}

/// Session store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Configuration failures.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {var_name}")]
    MissingEnvironmentVariable { var_name: String },
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
pub type DivideResult<T> = Result<T, DivideError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
