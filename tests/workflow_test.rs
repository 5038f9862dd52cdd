mod common;

use common::{
    Call, FakeSpotify, episode_item, local_item, playlist, track_item, unavailable_item,
};
use spodivide::{
    divide::{Cursor, advance, begin_divide, commit, recover},
    error::{DivideError, ProviderError},
    types::{Action, Direction, SessionState, SourceRef, TargetSelection},
};

fn session(source: SourceRef, targets: &[&str]) -> SessionState {
    let mut s = SessionState::new("abc123".to_string(), 0);
    s.logged_in = true;
    s.source = Some(source);
    s.target_playlist_ids = targets.iter().map(|t| t.to_string()).collect();
    s
}

fn selection(action: Action, targets: &[&str]) -> TargetSelection {
    TargetSelection {
        action,
        action_playlist_ids: targets.iter().map(|t| t.to_string()).collect(),
        select_all: false,
    }
}

fn owned_spotify(items: Vec<Vec<spodivide::types::PlaylistItem>>) -> FakeSpotify {
    FakeSpotify::new("me")
        .with_items(items)
        .with_playlists(vec![vec![
            playlist("src", "me", false),
            playlist("t1", "me", false),
            playlist("t2", "me", false),
            playlist("other", "someone", false),
        ]])
}

#[tokio::test]
async fn test_begin_requires_source_and_targets() {
    let spotify = owned_spotify(vec![vec![track_item("a")]]);

    let mut s = SessionState::new("abc123".to_string(), 0);
    s.target_playlist_ids = vec!["t1".to_string()];
    assert!(matches!(
        begin_divide(&spotify, &mut s).await,
        Err(DivideError::NoSourceSelected)
    ));

    let mut s = session(SourceRef::Playlist("src".into()), &[]);
    assert!(matches!(
        begin_divide(&spotify, &mut s).await,
        Err(DivideError::NoTargetSelected)
    ));
    assert!(spotify.calls().is_empty());
}

#[tokio::test]
async fn test_begin_empty_source() {
    let spotify = owned_spotify(vec![]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);

    assert!(matches!(
        begin_divide(&spotify, &mut s).await,
        Err(DivideError::EmptySource)
    ));
}

#[tokio::test]
async fn test_begin_without_divisible_entries() {
    let spotify = owned_spotify(vec![vec![
        episode_item("e1"),
        local_item("l1"),
        unavailable_item(),
    ]]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);

    assert!(matches!(
        begin_divide(&spotify, &mut s).await,
        Err(DivideError::NoDivisibleEntries)
    ));
}

#[tokio::test]
async fn test_begin_walks_every_page() {
    let spotify = owned_spotify(vec![
        vec![episode_item("e1"), track_item("a")],
        vec![track_item("b")],
        vec![local_item("l1"), track_item("c")],
    ]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1", "t2"]);

    let progress = begin_divide(&spotify, &mut s).await.unwrap();

    assert_eq!(progress.index, 1);
    assert!(progress.notices.is_empty());
    assert_eq!(s.tracks.len(), 5);
    assert_eq!(
        s.tracks.iter().filter(|e| e.is_track).count(),
        3
    );
    assert_eq!(s.cursor, Cursor::Positioned(1));
    assert!(s.move_remove_enabled);

    let names: Vec<_> = s.target_playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(names, vec!["t1", "t2"]);

    let item_pages: Vec<_> = spotify
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::ItemsPage(..)))
        .collect();
    assert_eq!(item_pages.len(), 3);
}

#[tokio::test]
async fn test_begin_page_failure_is_provider_unavailable() {
    let spotify = owned_spotify(vec![vec![track_item("a")], vec![track_item("b")]]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();
    assert_eq!(s.tracks.len(), 2);

    spotify.fail_on(Call::ItemsPage("src".into(), Some("page:1".into())));
    let result = begin_divide(&spotify, &mut s).await;

    assert!(matches!(result, Err(DivideError::ProviderUnavailable(_))));
    // A half-loaded source is never kept.
    assert!(s.tracks.is_empty());
    assert_eq!(s.cursor, Cursor::Exhausted);
}

#[tokio::test]
async fn test_begin_on_foreign_playlist_allows_copy_only() {
    let spotify = owned_spotify(vec![vec![track_item("a")]]);
    let mut s = session(SourceRef::Playlist("other".into()), &["t1"]);

    let progress = begin_divide(&spotify, &mut s).await.unwrap();

    assert!(!s.move_remove_enabled);
    assert_eq!(s.selection.action, Action::Copy);
    assert_eq!(progress.notices.len(), 1);
}

#[tokio::test]
async fn test_begin_on_liked_songs_allows_move() {
    let spotify = owned_spotify(vec![vec![track_item("a")]]);
    let mut s = session(SourceRef::LikedSongs, &["t1"]);

    begin_divide(&spotify, &mut s).await.unwrap();

    assert!(s.move_remove_enabled);
    assert!(!spotify.calls().iter().any(|c| matches!(c, Call::Playlist(_))));
}

#[tokio::test]
async fn test_advance_wraps() {
    let spotify = owned_spotify(vec![vec![track_item("a"), episode_item("e"), track_item("b")]]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();

    assert_eq!(advance(&mut s, Direction::Next).unwrap().index, 2);
    assert_eq!(advance(&mut s, Direction::Next).unwrap().index, 0);
    assert_eq!(advance(&mut s, Direction::Previous).unwrap().index, 2);
}

#[tokio::test]
async fn test_commit_move_walks_to_next_track() {
    let spotify = owned_spotify(vec![vec![track_item("a"), track_item("b")]]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();

    let progress = commit(&spotify, &mut s, selection(Action::Move, &["t1"]), Direction::Next)
        .await
        .unwrap();

    assert_eq!(progress.index, 0);
    assert_eq!(s.tracks.len(), 1);
    assert_eq!(s.tracks[0].track_id, "b");
    assert_eq!(
        spotify.mutations(),
        vec![
            Call::Add("t1".into(), "spotify:track:a".into()),
            Call::RemoveAt("src".into(), "spotify:track:a".into(), 0),
        ]
    );
}

#[tokio::test]
async fn test_commit_copy_steps_without_deleting() {
    let spotify = owned_spotify(vec![vec![track_item("a"), track_item("b")]]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();

    let progress = commit(&spotify, &mut s, selection(Action::Copy, &["t1"]), Direction::Next)
        .await
        .unwrap();

    assert_eq!(progress.index, 1);
    assert_eq!(s.tracks.len(), 2);
    assert_eq!(s.selection.action, Action::Copy);
}

#[tokio::test]
async fn test_commit_move_without_targets_only_navigates() {
    let spotify = owned_spotify(vec![vec![track_item("a"), track_item("b")]]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();

    let progress = commit(&spotify, &mut s, selection(Action::Move, &[]), Direction::Next)
        .await
        .unwrap();

    assert_eq!(progress.index, 1);
    assert_eq!(progress.notices.len(), 1);
    assert!(spotify.mutations().is_empty());
}

#[tokio::test]
async fn test_commit_remove_with_targets_is_rejected() {
    let spotify = owned_spotify(vec![vec![track_item("a"), track_item("b")]]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();

    let result = commit(&spotify, &mut s, selection(Action::Remove, &["t1"]), Direction::Next).await;

    assert!(matches!(
        result,
        Err(DivideError::InvalidActionTargetCombination { .. })
    ));
    assert_eq!(s.cursor, Cursor::Positioned(0));
    assert!(spotify.mutations().is_empty());
    // The selection is kept for the next render.
    assert_eq!(s.selection.action, Action::Remove);
}

#[tokio::test]
async fn test_commit_remove_on_foreign_playlist_is_refused() {
    let spotify = owned_spotify(vec![vec![track_item("a")]]);
    let mut s = session(SourceRef::Playlist("other".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();

    let result = commit(&spotify, &mut s, selection(Action::Remove, &[]), Direction::Next).await;

    assert!(matches!(result, Err(DivideError::SourceReadOnly)));
    assert!(spotify.mutations().is_empty());
}

#[tokio::test]
async fn test_commit_remove_last_track_exhausts() {
    let spotify = owned_spotify(vec![vec![episode_item("e"), track_item("a")]]);
    let mut s = session(SourceRef::LikedSongs, &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();

    let result = commit(&spotify, &mut s, selection(Action::Remove, &[]), Direction::Next).await;

    assert!(matches!(result, Err(DivideError::Exhausted)));
    assert_eq!(s.cursor, Cursor::Exhausted);
    assert_eq!(spotify.mutations(), vec![Call::RemoveLiked("a".into())]);

    // Nothing more to do until the source is loaded again.
    let again = commit(&spotify, &mut s, selection(Action::Remove, &[]), Direction::Next).await;
    assert!(matches!(again, Err(DivideError::Exhausted)));
    assert_eq!(spotify.mutations().len(), 1);
}

#[tokio::test]
async fn test_commit_provider_failure_keeps_position() {
    let spotify = owned_spotify(vec![vec![track_item("a"), track_item("b")]]);
    spotify.fail_on(Call::Add("t1".into(), "spotify:track:a".into()));
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();

    let result = commit(&spotify, &mut s, selection(Action::Move, &["t1"]), Direction::Next).await;

    assert!(matches!(result, Err(DivideError::ProviderUnavailable(_))));
    assert_eq!(s.cursor, Cursor::Positioned(0));
    assert_eq!(s.tracks.len(), 2);
}

#[tokio::test]
async fn test_recover_rejected_remove_stays_on_track() {
    let spotify = owned_spotify(vec![vec![track_item("a"), track_item("b"), track_item("c")]]);
    let mut s = session(SourceRef::Playlist("src".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();
    advance(&mut s, Direction::Next).unwrap();
    advance(&mut s, Direction::Next).unwrap();
    assert_eq!(s.cursor, Cursor::Positioned(2));

    let err = commit(&spotify, &mut s, selection(Action::Remove, &["t1"]), Direction::Next)
        .await
        .unwrap_err();
    let progress = recover(&s, err).unwrap();

    assert_eq!(progress.index, 2);
    assert_eq!(progress.notices.len(), 1);
    assert_eq!(s.cursor, Cursor::Positioned(2));
    assert_eq!(s.tracks.len(), 3);
}

#[tokio::test]
async fn test_recover_read_only_and_provider_failures() {
    let spotify = owned_spotify(vec![vec![track_item("a"), track_item("b")]]);
    let mut s = session(SourceRef::Playlist("other".into()), &["t1"]);
    begin_divide(&spotify, &mut s).await.unwrap();
    advance(&mut s, Direction::Next).unwrap();

    let err = commit(&spotify, &mut s, selection(Action::Move, &["t1"]), Direction::Next)
        .await
        .unwrap_err();
    assert!(matches!(err, DivideError::SourceReadOnly));
    assert_eq!(recover(&s, err).unwrap().index, 1);

    spotify.fail_on(Call::Add("t1".into(), "spotify:track:b".into()));
    let err = commit(&spotify, &mut s, selection(Action::Copy, &["t1"]), Direction::Next)
        .await
        .unwrap_err();
    let progress = recover(&s, err).unwrap();
    assert_eq!(progress.index, 1);
    assert!(progress.notices[0].contains("Spotify is unavailable"));
    assert_eq!(s.cursor, Cursor::Positioned(1));
}

#[test]
fn test_recover_passes_other_errors_through() {
    let mut s = session(SourceRef::LikedSongs, &["t1"]);
    s.cursor = Cursor::Positioned(0);

    assert!(matches!(
        recover(&s, DivideError::ProviderUnavailable(ProviderError::Unauthorized)),
        Err(DivideError::ProviderUnavailable(ProviderError::Unauthorized))
    ));
    assert!(matches!(
        recover(&s, DivideError::Exhausted),
        Err(DivideError::Exhausted)
    ));

    s.cursor = Cursor::Exhausted;
    assert!(matches!(
        recover(&s, DivideError::SourceReadOnly),
        Err(DivideError::Exhausted)
    ));
}
