use crate::{
    divide::classify,
    error::{DivideError, DivideResult},
    spotify::SpotifyApi,
    types::{AudioFeatures, FeatureBar, Media, SessionState, TargetView, TrackView},
    utils::{self, KeyNotation},
    warning,
};

const NOT_AVAILABLE: &str = "n/a";

const FEATURES: [&str; 7] = [
    "energy",
    "danceability",
    "valence",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
];

const BAR_COLORS: [&str; 8] = [
    "#4000F5", "#CDF563", "#CB1381", "#9CF0E1", "#EF891C", "#EC5541", "#CC200E", "#721107",
];

fn feature_value(features: &AudioFeatures, name: &str) -> f64 {
    match name {
        "energy" => features.energy,
        "danceability" => features.danceability,
        "valence" => features.valence,
        "speechiness" => features.speechiness,
        "acousticness" => features.acousticness,
        "instrumentalness" => features.instrumentalness,
        "liveness" => features.liveness,
        _ => 0.0,
    }
}

/// Popularity followed by the audio features, scaled to 0-100.
pub fn feature_bars(media: &Media, features: Option<&AudioFeatures>) -> Vec<FeatureBar> {
    let mut bars = vec![FeatureBar {
        name: "Popularity".to_string(),
        value: media.popularity.unwrap_or(0) as i64,
        color: BAR_COLORS[0],
    }];

    if let Some(features) = features {
        for (i, name) in FEATURES.iter().enumerate() {
            bars.push(FeatureBar {
                name: utils::title_case(name).chars().take(12).collect(),
                value: (feature_value(features, name) * 100.0).round() as i64,
                color: BAR_COLORS[i + 1],
            });
        }
    }

    bars
}

/// Builds the divide page for the entry under the session's cursor.
///
/// Album label, genres and audio features are looked up on every render. A
/// failed lookup only blanks its fields (label and key become `n/a`) and is
/// logged, since the page is often rendered right after a committed move or
/// remove that must not look like it failed.
///
/// # Errors
///
/// [`DivideError::Exhausted`] when the cursor does not point at a track.
pub async fn track_view<P>(provider: &P, session: &SessionState) -> DivideResult<TrackView>
where
    P: SpotifyApi + ?Sized,
{
    let index = session.cursor.index().ok_or(DivideError::Exhausted)?;
    let entry = session.current_entry().ok_or(DivideError::Exhausted)?;
    let media = entry.media.as_ref().ok_or(DivideError::Exhausted)?;

    let label = match media.album.as_ref().and_then(|a| a.id.as_deref()) {
        Some(album_id) => match provider.album(album_id).await {
            Ok(album) => album.label.unwrap_or_default(),
            Err(e) => {
                warning!("Album lookup for {} failed: {}", album_id, e);
                NOT_AVAILABLE.to_string()
            }
        },
        None => String::new(),
    };

    let mut genres: Vec<String> = Vec::new();
    for artist_id in media.artists.iter().filter_map(|a| a.id.as_deref()) {
        let artist = match provider.artist(artist_id).await {
            Ok(artist) => artist,
            Err(e) => {
                warning!("Artist lookup for {} failed: {}", artist_id, e);
                continue;
            }
        };
        for genre in artist.genres {
            if !genres.contains(&genre) {
                genres.push(genre);
            }
        }
    }

    let features = match provider.audio_features(&entry.track_id).await {
        Ok(features) => features,
        Err(e) => {
            warning!("Audio features lookup for {} failed: {}", entry.track_id, e);
            None
        }
    };
    let (key, mode) = features
        .as_ref()
        .map_or((-1, -1), |f| (f.key, f.mode));

    let position = session.tracks[..=index]
        .iter()
        .filter(|e| e.is_track)
        .count();

    let targets = session
        .target_playlists
        .iter()
        .map(|p| TargetView {
            id: p.id.clone(),
            name: p.name.clone(),
            image_url: p.image_url.clone(),
            checked: session.selection.action_playlist_ids.contains(&p.id),
        })
        .collect();

    let album = media.album.as_ref();
    Ok(TrackView {
        position,
        track_count: classify::count_tracks(&session.tracks),
        title: media.name.clone(),
        artists: media
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        album: album.map(|a| a.name.clone()).unwrap_or_default(),
        album_type: album
            .and_then(|a| a.album_type.clone())
            .unwrap_or_default(),
        track_type: media.media_type.clone(),
        image_url: album.and_then(|a| a.images.first()).map(|i| i.url.clone()),
        uri: entry.uri.clone(),
        label,
        release_date: album
            .and_then(|a| a.release_date.clone())
            .unwrap_or_default(),
        duration: utils::time_string(media.duration_ms),
        genres: genres.join(", "),
        bpm: features.as_ref().map(|f| f.tempo),
        key_tonal: utils::get_key(key, mode, KeyNotation::Tonal),
        key_camelot: utils::get_key(key, mode, KeyNotation::Camelot),
        features: feature_bars(media, features.as_ref()),
        targets,
        action: session.selection.action,
        select_all: session.selection.select_all,
        move_remove_enabled: session.move_remove_enabled,
    })
}
