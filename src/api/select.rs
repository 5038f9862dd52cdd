use axum::{Extension, Json, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiError, session},
    divide::fetcher,
    error::DivideError,
    info,
    server::AppState,
    spotify::SpotifyApi,
    types::{LIKED_SONGS, PlaylistChoice, SourceRef},
};

#[derive(Debug, Serialize)]
pub struct SourcePage {
    pub source: Option<String>,
    pub playlists: Vec<PlaylistChoice>,
}

#[derive(Debug, Serialize)]
pub struct TargetPage {
    pub playlists: Vec<PlaylistChoice>,
}

#[derive(Debug, Deserialize)]
pub struct SourceForm {
    pub playlist: String,
}

#[derive(Debug, Deserialize)]
pub struct TargetForm {
    #[serde(default)]
    pub target_playlist_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NextStep {
    pub next: &'static str,
}

/// `GET /select_source`: Liked Songs followed by every playlist of the user.
pub async fn source_page(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<SourcePage>, ApiError> {
    let session = session::require_login(&app, &headers).await?;
    let client = session::spotify_client(&app, &session).await?;
    let current = session.source.as_ref().map(|s| s.to_string());

    let mut playlists = vec![PlaylistChoice {
        id: LIKED_SONGS.to_string(),
        name: "Liked Songs".to_string(),
        image_url: None,
        checked: current.as_deref() == Some(LIKED_SONGS),
    }];
    playlists.extend(fetcher::fetch_all_playlists(&client).await?.iter().map(|p| {
        PlaylistChoice {
            id: p.id.clone(),
            name: p.name.clone(),
            image_url: p.thumbnail(),
            checked: current.as_deref() == Some(p.id.as_str()),
        }
    }));

    Ok(Json(SourcePage {
        source: current,
        playlists,
    }))
}

/// `POST /select_source`
pub async fn choose_source(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
    Json(form): Json<SourceForm>,
) -> Result<Json<NextStep>, ApiError> {
    let mut session = session::require_login(&app, &headers).await?;
    if form.playlist.trim().is_empty() {
        return Err(DivideError::NoSourceSelected.into());
    }

    let source = SourceRef::from(form.playlist);
    info!("Session {}: source set to {}.", session.session_id, source);
    session.source = Some(source);
    session.reset_divide();
    app.store.save(&session).await?;

    Ok(Json(NextStep {
        next: "/select_target",
    }))
}

/// `GET /select_target`: the playlists the user may add to, meaning owned
/// and not collaborative, with earlier choices pre-checked.
pub async fn target_page(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<TargetPage>, ApiError> {
    let session = session::require_login(&app, &headers).await?;
    let client = session::spotify_client(&app, &session).await?;
    let user = client.current_user().await?;

    let playlists = fetcher::fetch_all_playlists(&client)
        .await?
        .iter()
        .filter(|p| p.editable_by(&user.id))
        .map(|p| PlaylistChoice {
            id: p.id.clone(),
            name: p.name.clone(),
            image_url: p.thumbnail(),
            checked: session.target_playlist_ids.contains(&p.id),
        })
        .collect();

    Ok(Json(TargetPage { playlists }))
}

/// `POST /select_target`
pub async fn choose_targets(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
    Json(form): Json<TargetForm>,
) -> Result<Json<NextStep>, ApiError> {
    let mut session = session::require_login(&app, &headers).await?;
    session.target_playlist_ids = form.target_playlist_ids;
    session.reset_divide();
    app.store.save(&session).await?;

    if session.target_playlist_ids.is_empty() {
        return Err(DivideError::NoTargetSelected.into());
    }

    Ok(Json(NextStep { next: "/divide" }))
}
