use crate::{
    divide::{
        classify, dispatcher, fetcher,
        navigator::{self, Cursor},
    },
    error::{DivideError, DivideResult, ProviderError},
    info,
    spotify::SpotifyApi,
    types::{Action, Direction, SessionState, SourceRef, TargetPlaylist, TargetSelection},
};

/// Result of a workflow step that left the cursor on a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub index: usize,
    pub notices: Vec<String>,
}

impl Progress {
    fn at(cursor: Cursor, notices: Vec<String>) -> DivideResult<Self> {
        match cursor {
            Cursor::Positioned(index) => Ok(Self { index, notices }),
            Cursor::Exhausted => Err(DivideError::Exhausted),
        }
    }
}

/// Loads the source collection into the session and positions the cursor on
/// its first track.
///
/// Requires a selected source and at least one selected target. Reports
/// [`DivideError::EmptySource`] for an empty collection and
/// [`DivideError::NoDivisibleEntries`] when it holds no tracks at all.
/// Move and remove stay enabled only for Liked Songs or playlists the user
/// owns and that are not collaborative.
pub async fn begin_divide<P>(provider: &P, session: &mut SessionState) -> DivideResult<Progress>
where
    P: SpotifyApi + ?Sized,
{
    let source = session.source.clone().ok_or(DivideError::NoSourceSelected)?;
    if session.target_playlist_ids.is_empty() {
        return Err(DivideError::NoTargetSelected);
    }

    session.reset_divide();

    let items = fetcher::fetch_all(provider, &source).await?;
    if items.is_empty() {
        return Err(DivideError::EmptySource);
    }

    let sequence = classify::build_sequence(items);
    if classify::nothing_to_divide(&sequence) {
        return Err(DivideError::NoDivisibleEntries);
    }

    let mut notices = Vec::new();
    let user = provider.current_user().await?;
    let move_remove_enabled = match &source {
        SourceRef::LikedSongs => true,
        SourceRef::Playlist(id) => provider.playlist(id).await?.editable_by(&user.id),
    };
    if !move_remove_enabled {
        notices.push(DivideError::SourceReadOnly.to_string());
        session.selection.action = Action::Copy;
    }

    let target_playlists: Vec<TargetPlaylist> = fetcher::fetch_all_playlists(provider)
        .await?
        .iter()
        .filter(|p| session.target_playlist_ids.contains(&p.id))
        .map(TargetPlaylist::from)
        .collect();

    let cursor = navigator::init(&sequence);
    info!(
        "Session {}: loaded {} entries ({} tracks) from {}.",
        session.session_id,
        sequence.len(),
        classify::count_tracks(&sequence),
        source
    );

    session.user_id = Some(user.id);
    session.tracks = sequence;
    session.cursor = cursor;
    session.target_playlists = target_playlists;
    session.move_remove_enabled = move_remove_enabled;

    Progress::at(cursor, notices)
}

/// Steps to the next or previous track without touching Spotify.
pub fn advance(session: &mut SessionState, direction: Direction) -> DivideResult<Progress> {
    session.cursor = navigator::step(session.cursor, direction, &session.tracks);
    Progress::at(session.cursor, Vec::new())
}

/// Applies `selection` to the current track, then moves on in `direction`.
///
/// The selection is remembered for the next page render whatever the
/// outcome. `move`/`copy` without targets only navigates and returns a
/// notice; `remove` with targets is rejected without navigating. When the
/// last track leaves the sequence the result is [`DivideError::Exhausted`].
pub async fn commit<P>(
    provider: &P,
    session: &mut SessionState,
    selection: TargetSelection,
    direction: Direction,
) -> DivideResult<Progress>
where
    P: SpotifyApi + ?Sized,
{
    session.selection = selection;
    let action = session.selection.action;
    let targets = session.selection.action_playlist_ids.clone();

    let source = session.source.clone().ok_or(DivideError::NoSourceSelected)?;
    if session.cursor.is_exhausted() {
        return Err(DivideError::Exhausted);
    }

    if let Err(err) = dispatcher::validate(action, &targets) {
        return match action {
            Action::Move | Action::Copy => {
                let mut progress = advance(session, direction)?;
                progress.notices.push(err.to_string());
                Ok(progress)
            }
            Action::Remove => Err(err),
        };
    }

    if action.deletes_from_source() && !session.move_remove_enabled {
        return Err(DivideError::SourceReadOnly);
    }

    let cursor = dispatcher::apply(
        provider,
        action,
        &source,
        &targets,
        &mut session.tracks,
        session.cursor,
        direction,
    )
    .await?;

    match action {
        Action::Copy => advance(session, direction),
        Action::Move | Action::Remove => {
            session.cursor = cursor;
            Progress::at(cursor, Vec::new())
        }
    }
}

/// Turns a failed [`commit`] into a page for the track the user is still on.
///
/// A rejected combination, a read-only source or an unavailable Spotify leave
/// sequence and cursor as they were, so the error becomes a notice on the
/// unchanged position. Any other error, including an expired token, is
/// returned as is.
///
/// # Arguments
///
/// * `session` - The session after the failed commit
/// * `err` - The error the commit returned
///
/// # Errors
///
/// `err` itself when it is not recoverable in place, or
/// [`DivideError::Exhausted`] when the cursor has no track to stay on.
pub fn recover(session: &SessionState, err: DivideError) -> DivideResult<Progress> {
    let recoverable = match &err {
        DivideError::InvalidActionTargetCombination { .. } | DivideError::SourceReadOnly => true,
        DivideError::ProviderUnavailable(ProviderError::Unauthorized) => false,
        DivideError::ProviderUnavailable(_) => true,
        _ => false,
    };
    if !recoverable {
        return Err(err);
    }
    Progress::at(session.cursor, vec![err.to_string()])
}
