use axum::http::{HeaderMap, header};

use crate::{
    api::ApiError,
    error::DivideError,
    management::TokenManager,
    server::AppState,
    spotify::SpotifyClient,
    types::SessionState,
    utils,
};

pub const SESSION_COOKIE: &str = "spodivide_session";

pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| utils::cookie_value(value, SESSION_COOKIE))
        .filter(|id| utils::is_valid_session_id(id))
}

pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

pub fn clear_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

pub async fn current_session(
    app: &AppState,
    headers: &HeaderMap,
) -> Result<Option<SessionState>, ApiError> {
    match session_id(headers) {
        Some(id) => Ok(app.store.load(&id).await?),
        None => Ok(None),
    }
}

/// The caller's session, created with default selection settings when the
/// browser has none yet.
pub async fn session_or_new(app: &AppState, headers: &HeaderMap) -> Result<SessionState, ApiError> {
    if let Some(session) = current_session(app, headers).await? {
        return Ok(session);
    }

    let session = SessionState::new(utils::generate_session_id(), utils::now());
    app.store.save(&session).await?;
    crate::info!("Session {} created.", session.session_id);
    Ok(session)
}

pub async fn require_login(app: &AppState, headers: &HeaderMap) -> Result<SessionState, ApiError> {
    match current_session(app, headers).await? {
        Some(session) if session.logged_in => Ok(session),
        _ => Err(DivideError::NotAuthenticated.into()),
    }
}

/// A Spotify client acting with the session's cached token.
pub async fn spotify_client(app: &AppState, session: &SessionState) -> Result<SpotifyClient, ApiError> {
    let mut token_mgr = TokenManager::load(&app.config.token_dir, session.token_key())
        .await
        .map_err(|_| DivideError::NotAuthenticated)?;
    let token = token_mgr.get_valid_token(&app.http, &app.config).await?;
    Ok(SpotifyClient::new(app.http.clone(), app.config.api_url.clone(), token))
}
