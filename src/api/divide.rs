use axum::{Extension, Json, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiError, session},
    divide::{self, Progress, view},
    error::{DivideError, DivideResult},
    server::AppState,
    types::{Action, Direction, SessionState, TargetSelection, TrackView},
};

/// Which button the user pressed on the divide page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Next,
    Prev,
    NextNoAction,
    PrevNoAction,
}

impl Button {
    pub fn direction(self) -> Direction {
        match self {
            Button::Next | Button::NextNoAction => Direction::Next,
            Button::Prev | Button::PrevNoAction => Direction::Previous,
        }
    }

    pub fn applies_action(self) -> bool {
        matches!(self, Button::Next | Button::Prev)
    }
}

#[derive(Debug, Deserialize)]
pub struct DivideForm {
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub action_playlist_ids: Vec<String>,
    #[serde(default)]
    pub select_all: bool,
    pub button: Button,
}

impl DivideForm {
    fn selection(&self) -> TargetSelection {
        TargetSelection {
            action: self.action,
            action_playlist_ids: self.action_playlist_ids.clone(),
            select_all: self.select_all,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DividePage {
    pub messages: Vec<String>,
    pub track: TrackView,
}

/// Stores the session whatever the step produced; an exhausted run also
/// forgets its sequence so the next visit starts over.
async fn settle(
    app: &AppState,
    session: &mut SessionState,
    outcome: DivideResult<Progress>,
) -> Result<Progress, ApiError> {
    if matches!(outcome, Err(DivideError::Exhausted)) {
        session.reset_divide();
    }
    app.store.save(session).await?;
    Ok(outcome?)
}

/// `GET /divide`: loads the source and shows its first track.
pub async fn divide_page(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<DividePage>, ApiError> {
    let mut session = session::require_login(&app, &headers).await?;
    let client = session::spotify_client(&app, &session).await?;

    let outcome = divide::begin_divide(&client, &mut session).await;
    let progress = settle(&app, &mut session, outcome).await?;
    let track = view::track_view(&client, &session).await?;

    Ok(Json(DividePage {
        messages: progress.notices,
        track,
    }))
}

/// `POST /divide`: applies the chosen action to the current track (unless a
/// no-action button was pressed) and shows the next one.
///
/// A refused or failed action keeps the user on the same track and reports
/// the reason in `messages`.
pub async fn divide_step(
    Extension(app): Extension<AppState>,
    headers: HeaderMap,
    Json(form): Json<DivideForm>,
) -> Result<Json<DividePage>, ApiError> {
    let mut session = session::require_login(&app, &headers).await?;
    let client = session::spotify_client(&app, &session).await?;
    let direction = form.button.direction();

    let mut applied = false;
    let outcome = if form.button.applies_action() {
        let committed = divide::commit(&client, &mut session, form.selection(), direction).await;
        applied = committed.is_ok();
        committed.or_else(|err| divide::recover(&session, err))
    } else {
        session.selection = form.selection();
        divide::advance(&mut session, direction)
    };
    let progress = settle(&app, &mut session, outcome).await?;
    let track = view::track_view(&client, &session).await.map_err(|err| {
        if applied {
            ApiError::Applied(err)
        } else {
            ApiError::Divide(err)
        }
    })?;

    Ok(Json(DividePage {
        messages: progress.notices,
        track,
    }))
}
