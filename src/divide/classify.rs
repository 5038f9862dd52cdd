use crate::types::{PlaylistItem, TrackEntry};

pub const TRACK_TYPE: &str = "track";

/// Whether a fetched item can be divided.
///
/// Only playable Spotify tracks qualify: podcast episodes, local files and
/// unavailable entries (no media object, or no id/uri) are skipped.
pub fn classify(item: &PlaylistItem) -> bool {
    match &item.track {
        Some(media) => {
            media.media_type == TRACK_TYPE
                && !item.is_local
                && media.id.is_some()
                && media.uri.is_some()
        }
        None => false,
    }
}

/// Turns fetched items into the track sequence, keeping the provider order.
pub fn build_sequence(items: Vec<PlaylistItem>) -> Vec<TrackEntry> {
    items
        .into_iter()
        .map(|item| {
            let is_track = classify(&item);
            let media = item.track;
            TrackEntry {
                track_id: media
                    .as_ref()
                    .and_then(|m| m.id.clone())
                    .unwrap_or_default(),
                uri: media
                    .as_ref()
                    .and_then(|m| m.uri.clone())
                    .unwrap_or_default(),
                is_track,
                media,
            }
        })
        .collect()
}

/// Number of entries the cursor can land on; skipped items are not counted.
pub fn count_tracks(sequence: &[TrackEntry]) -> usize {
    sequence.iter().filter(|e| e.is_track).count()
}

/// True when the sequence has entries but none of them is a track.
pub fn nothing_to_divide(sequence: &[TrackEntry]) -> bool {
    !sequence.is_empty() && count_tracks(sequence) == 0
}
