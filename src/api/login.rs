use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    api::{
        ApiError,
        session::{self, clear_cookie, session_cookie},
    },
    info,
    management::TokenManager,
    server::AppState,
    spotify::{self, SpotifyApi},
    utils, warning,
};

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// `GET /`: send the visitor to the next sensible step.
pub async fn index(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    match session::current_session(&app, &headers).await? {
        Some(s) if s.logged_in => Ok(Redirect::to("/select_source")),
        _ => Ok(Redirect::to("/login")),
    }
}

/// `GET /login`: the whole authorization code flow.
///
/// 1. Unknown visitor: a session is created.
/// 2. No valid token: a PKCE verifier is stored and the browser is sent to
///    Spotify.
/// 3. Redirected back with `code`: the code is exchanged and the token
///    cached for this session.
/// 4. Valid token: the session is marked logged in.
pub async fn login(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
    Query(params): Query<LoginParams>,
) -> Result<Response, ApiError> {
    let mut session = session::session_or_new(&app, &headers).await?;
    let cookie = session_cookie(&session.session_id);

    if let Some(error) = params.error {
        warning!("Spotify authorization refused: {}", error);
        return Err(ApiError::BadRequest(format!("Login failed: {}", error)));
    }

    if let Some(code) = params.code {
        let Some(verifier) = session.pkce_verifier.take() else {
            return Err(ApiError::BadRequest("Missing PKCE code verifier.".to_string()));
        };

        let token = spotify::auth::exchange_code_pkce(&app.http, &app.config, &code, &verifier).await?;
        let token_mgr = TokenManager::new(&app.config.token_dir, session.token_key(), token);
        if let Err(e) = token_mgr.persist().await {
            warning!("Failed to save token to cache: {}", e);
            return Err(ApiError::BadRequest("Login failed.".to_string()));
        }

        app.store.save(&session).await?;
        return Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response());
    }

    let client = match session::spotify_client(&app, &session).await {
        Ok(client) => Some(client),
        Err(_) => None,
    };

    let user = match client {
        Some(client) => client.current_user().await.ok(),
        None => None,
    };

    match user {
        Some(user) => {
            info!(
                "Logged in to Spotify as {}",
                user.display_name.as_deref().unwrap_or(&user.id)
            );
            session.logged_in = true;
            session.display_name = user.display_name;
            session.user_id = Some(user.id);
            app.store.save(&session).await?;
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
        }
        None => {
            let verifier = utils::generate_code_verifier();
            let auth_url = spotify::auth::authorize_url(&app.config, &verifier)?;
            session.logged_in = false;
            session.pkce_verifier = Some(verifier);
            app.store.save(&session).await?;
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&auth_url)).into_response())
        }
    }
}

/// `GET /logout`: forget the token and the session.
pub async fn logout(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(id) = session::session_id(&headers) {
        if let Err(e) = TokenManager::remove(&app.config.token_dir, &id).await {
            warning!("Failed to remove cached token: {}", e);
        }
        app.store.remove(&id).await?;
        info!("Session {} logged out.", id);
    }

    Ok(([(header::SET_COOKIE, clear_cookie())], Redirect::to("/")).into_response())
}
