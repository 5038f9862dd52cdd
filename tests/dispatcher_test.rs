mod common;

use common::{Call, FakeSpotify, sequence};
use spodivide::{
    divide::{
        Cursor,
        dispatcher::{apply, validate},
    },
    error::DivideError,
    types::{Action, Direction, SourceRef},
};

fn source() -> SourceRef {
    SourceRef::Playlist("src".to_string())
}

fn targets(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_validate_combinations() {
    assert!(validate(Action::Move, &targets(&["t1"])).is_ok());
    assert!(validate(Action::Copy, &targets(&["t1", "t2"])).is_ok());
    assert!(validate(Action::Remove, &[]).is_ok());

    assert!(matches!(
        validate(Action::Move, &[]),
        Err(DivideError::InvalidActionTargetCombination {
            action: Action::Move,
            targets: 0
        })
    ));
    assert!(matches!(
        validate(Action::Copy, &[]),
        Err(DivideError::InvalidActionTargetCombination { .. })
    ));
    assert!(matches!(
        validate(Action::Remove, &targets(&["t1", "t2"])),
        Err(DivideError::InvalidActionTargetCombination {
            action: Action::Remove,
            targets: 2
        })
    ));
}

#[tokio::test]
async fn test_move_adds_before_delete() {
    let spotify = FakeSpotify::new("me");
    let mut seq = sequence("TT");

    let cursor = apply(
        &spotify,
        Action::Move,
        &source(),
        &targets(&["t1", "t2"]),
        &mut seq,
        Cursor::Positioned(0),
        Direction::Next,
    )
    .await
    .unwrap();

    assert_eq!(
        spotify.mutations(),
        vec![
            Call::Add("t1".into(), "spotify:track:0".into()),
            Call::Add("t2".into(), "spotify:track:0".into()),
            Call::RemoveAt("src".into(), "spotify:track:0".into(), 0),
        ]
    );

    // [A, B] -> [B], cursor on B
    assert_eq!(seq.len(), 1);
    assert_eq!(seq[0].track_id, "1");
    assert_eq!(cursor, Cursor::Positioned(0));
}

#[tokio::test]
async fn test_move_failed_add_issues_no_delete() {
    let spotify = FakeSpotify::new("me");
    spotify.fail_on(Call::Add("t2".into(), "spotify:track:1".into()));
    let mut seq = sequence("TTT");

    let result = apply(
        &spotify,
        Action::Move,
        &source(),
        &targets(&["t1", "t2", "t3"]),
        &mut seq,
        Cursor::Positioned(1),
        Direction::Next,
    )
    .await;

    assert!(matches!(result, Err(DivideError::ProviderUnavailable(_))));
    assert_eq!(
        spotify.mutations(),
        vec![
            Call::Add("t1".into(), "spotify:track:1".into()),
            Call::Add("t2".into(), "spotify:track:1".into()),
        ]
    );
    assert_eq!(seq.len(), 3);
}

#[tokio::test]
async fn test_failed_delete_keeps_sequence() {
    let spotify = FakeSpotify::new("me");
    spotify.fail_on(Call::RemoveAt("src".into(), "spotify:track:0".into(), 0));
    let mut seq = sequence("TT");

    let result = apply(
        &spotify,
        Action::Move,
        &source(),
        &targets(&["t1"]),
        &mut seq,
        Cursor::Positioned(0),
        Direction::Next,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(seq.len(), 2);
}

#[tokio::test]
async fn test_remove_with_targets_is_rejected_without_calls() {
    let spotify = FakeSpotify::new("me");
    let mut seq = sequence("TT");

    for _ in 0..3 {
        let result = apply(
            &spotify,
            Action::Remove,
            &source(),
            &targets(&["t1"]),
            &mut seq,
            Cursor::Positioned(0),
            Direction::Next,
        )
        .await;

        assert!(matches!(
            result,
            Err(DivideError::InvalidActionTargetCombination { .. })
        ));
    }

    assert!(spotify.calls().is_empty());
    assert_eq!(seq.len(), 2);
}

#[tokio::test]
async fn test_remove_only_track_exhausts() {
    let spotify = FakeSpotify::new("me");
    let mut seq = sequence("T");

    let cursor = apply(
        &spotify,
        Action::Remove,
        &source(),
        &[],
        &mut seq,
        Cursor::Positioned(0),
        Direction::Next,
    )
    .await
    .unwrap();

    assert!(seq.is_empty());
    assert_eq!(cursor, Cursor::Exhausted);
    assert_eq!(
        spotify.mutations(),
        vec![Call::RemoveAt("src".into(), "spotify:track:0".into(), 0)]
    );
}

#[tokio::test]
async fn test_remove_last_track_among_episodes_exhausts() {
    let spotify = FakeSpotify::new("me");
    let mut seq = sequence("xTx");

    let cursor = apply(
        &spotify,
        Action::Remove,
        &source(),
        &[],
        &mut seq,
        Cursor::Positioned(1),
        Direction::Previous,
    )
    .await
    .unwrap();

    assert_eq!(seq.len(), 2);
    assert_eq!(cursor, Cursor::Exhausted);
}

#[tokio::test]
async fn test_remove_from_liked_songs_uses_track_id() {
    let spotify = FakeSpotify::new("me");
    let mut seq = sequence("TT");

    apply(
        &spotify,
        Action::Remove,
        &SourceRef::LikedSongs,
        &[],
        &mut seq,
        Cursor::Positioned(1),
        Direction::Next,
    )
    .await
    .unwrap();

    assert_eq!(spotify.mutations(), vec![Call::RemoveLiked("1".into())]);
}

#[tokio::test]
async fn test_copy_leaves_source_and_cursor() {
    let spotify = FakeSpotify::new("me");
    let mut seq = sequence("TT");

    let cursor = apply(
        &spotify,
        Action::Copy,
        &source(),
        &targets(&["t1"]),
        &mut seq,
        Cursor::Positioned(1),
        Direction::Next,
    )
    .await
    .unwrap();

    assert_eq!(cursor, Cursor::Positioned(1));
    assert_eq!(seq.len(), 2);
    assert_eq!(
        spotify.mutations(),
        vec![Call::Add("t1".into(), "spotify:track:1".into())]
    );
}

#[tokio::test]
async fn test_apply_on_exhausted_cursor() {
    let spotify = FakeSpotify::new("me");
    let mut seq = sequence("T");

    let result = apply(
        &spotify,
        Action::Copy,
        &source(),
        &targets(&["t1"]),
        &mut seq,
        Cursor::Exhausted,
        Direction::Next,
    )
    .await;

    assert!(matches!(result, Err(DivideError::Exhausted)));
    assert!(spotify.calls().is_empty());
}
