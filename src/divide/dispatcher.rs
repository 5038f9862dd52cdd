use crate::{
    divide::navigator::{self, Cursor},
    error::{DivideError, DivideResult},
    spotify::SpotifyApi,
    types::{Action, Direction, SourceRef, TrackEntry},
};

/// Rejects action/target combinations that cannot do anything useful:
/// `remove` with targets, `move`/`copy` without.
pub fn validate(action: Action, targets: &[String]) -> DivideResult<()> {
    let invalid = match action {
        Action::Remove => !targets.is_empty(),
        Action::Move | Action::Copy => targets.is_empty(),
    };

    if invalid {
        return Err(DivideError::InvalidActionTargetCombination {
            action,
            targets: targets.len(),
        });
    }
    Ok(())
}

/// Applies a committed decision to the entry under `cursor`.
///
/// Add calls for every target are issued, and must all succeed, before the
/// source delete is issued, so a failing delete never loses a track that was
/// not copied anywhere yet. When an add fails the operation stops there:
/// earlier targets keep the track, nothing is deleted, and `sequence` is left
/// untouched so a retry targets the same track.
///
/// After a delete the entry is dropped from `sequence` and the returned
/// cursor accounts for the shift. For `copy` the cursor is returned as is;
/// the caller steps it.
pub async fn apply<P>(
    provider: &P,
    action: Action,
    source: &SourceRef,
    targets: &[String],
    sequence: &mut Vec<TrackEntry>,
    cursor: Cursor,
    direction: Direction,
) -> DivideResult<Cursor>
where
    P: SpotifyApi + ?Sized,
{
    validate(action, targets)?;

    let index = cursor.index().ok_or(DivideError::Exhausted)?;
    let (track_id, uri) = match sequence.get(index) {
        Some(entry) if entry.is_track => (entry.track_id.clone(), entry.uri.clone()),
        _ => return Err(DivideError::Exhausted),
    };

    if action.adds_to_targets() {
        for target in targets {
            provider.add_item(target, &uri).await?;
        }
    }

    if !action.deletes_from_source() {
        return Ok(cursor);
    }

    match source {
        SourceRef::LikedSongs => provider.remove_liked_item(&track_id).await?,
        SourceRef::Playlist(playlist_id) => {
            provider.remove_item_at(playlist_id, &uri, index).await?
        }
    }

    sequence.remove(index);
    Ok(navigator::after_removal(sequence, index, direction))
}
