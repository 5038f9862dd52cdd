use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::{
    error::{ConfigError, DivideError, ProviderError, StoreError},
    warning,
};

/// Error answer of a handler: a redirect to `/login` for authentication
/// problems, otherwise a JSON body naming the wizard step to restart from.
#[derive(Debug)]
pub enum ApiError {
    Divide(DivideError),
    /// The track page failed after an add or remove already went through.
    Applied(DivideError),
    Store(StoreError),
    Config(ConfigError),
    BadRequest(String),
}

impl From<DivideError> for ApiError {
    fn from(err: DivideError) -> Self {
        ApiError::Divide(err)
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Divide(DivideError::ProviderUnavailable(err))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

fn divide_kind(err: &DivideError) -> &'static str {
    match err {
        DivideError::ProviderUnavailable(_) => "provider_unavailable",
        DivideError::EmptySource => "empty_source",
        DivideError::NoDivisibleEntries => "no_divisible_entries",
        DivideError::InvalidActionTargetCombination { .. } => "invalid_action_target_combination",
        DivideError::Exhausted => "exhausted",
        DivideError::NoSourceSelected => "no_source_selected",
        DivideError::NoTargetSelected => "no_target_selected",
        DivideError::SourceReadOnly => "source_read_only",
        DivideError::NotAuthenticated => "not_authenticated",
    }
}

/// The wizard step the user restarts from.
pub fn next_step(err: &DivideError) -> Option<&'static str> {
    match err {
        DivideError::EmptySource
        | DivideError::NoDivisibleEntries
        | DivideError::Exhausted
        | DivideError::NoSourceSelected => Some("/select_source"),
        DivideError::NoTargetSelected => Some("/select_target"),
        DivideError::NotAuthenticated => Some("/login"),
        DivideError::InvalidActionTargetCombination { .. }
        | DivideError::SourceReadOnly
        | DivideError::ProviderUnavailable(_) => None,
    }
}

fn divide_status(err: &DivideError) -> StatusCode {
    match err {
        DivideError::ProviderUnavailable(ProviderError::RateLimited { .. }) => {
            StatusCode::TOO_MANY_REQUESTS
        }
        DivideError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
        DivideError::InvalidActionTargetCombination { .. } | DivideError::SourceReadOnly => {
            StatusCode::BAD_REQUEST
        }
        DivideError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        _ => StatusCode::CONFLICT,
    }
}

fn body(status: StatusCode, kind: &str, message: String, next: Option<&str>) -> Response {
    (
        status,
        Json(json!({
            "error": kind,
            "message": message,
            "next": next,
        })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Divide(DivideError::NotAuthenticated)
            | ApiError::Divide(DivideError::ProviderUnavailable(ProviderError::Unauthorized)) => {
                Redirect::to("/login").into_response()
            }
            ApiError::Divide(err) => {
                body(divide_status(&err), divide_kind(&err), err.to_string(), next_step(&err))
            }
            ApiError::Applied(err) => {
                warning!("Track page failed after an applied action: {}", err);
                body(
                    divide_status(&err),
                    divide_kind(&err),
                    format!(
                        "Your last action was applied, but the next track could not be shown: {}",
                        err
                    ),
                    next_step(&err),
                )
            }
            ApiError::Store(err) => {
                warning!("Session store failure: {}", err);
                body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "session_store",
                    "Something went wrong storing your session, please try again.".to_string(),
                    None,
                )
            }
            ApiError::Config(err) => {
                warning!("Configuration failure: {}", err);
                body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration",
                    err.to_string(),
                    None,
                )
            }
            ApiError::BadRequest(message) => body(StatusCode::BAD_REQUEST, "bad_request", message, None),
        }
    }
}
