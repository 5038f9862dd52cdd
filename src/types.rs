use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::divide::Cursor;

/// Sentinel source reference for the user's saved tracks.
pub const LIKED_SONGS: &str = "liked_songs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
}

/// One page of a paginated Spotify listing. `next` is the continuation
/// URL; its absence ends the walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    pub collaborative: bool,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

impl Playlist {
    /// A playlist is editable when the user owns it and it is not collaborative.
    pub fn editable_by(&self, user_id: &str) -> bool {
        self.owner.id == user_id && !self.collaborative
    }

    /// Smallest image; Spotify lists the largest first.
    pub fn thumbnail(&self) -> Option<String> {
        self.images
            .as_ref()
            .and_then(|images| images.last())
            .map(|i| i.url.clone())
    }
}

/// An entry of a playlist or of the saved tracks listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub track: Option<Media>,
}

/// The media object of an item. Tracks and podcast episodes share this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub key: i32,
    pub mode: i32,
    pub tempo: f64,
    pub energy: f64,
    pub danceability: f64,
    pub valence: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemsRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveItemsRequest {
    pub tracks: Vec<RemoveItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveItem {
    pub uri: String,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveLikedRequest {
    pub ids: Vec<String>,
}

/// Where the tracks are divided from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceRef {
    LikedSongs,
    Playlist(String),
}

impl From<String> for SourceRef {
    fn from(value: String) -> Self {
        if value == LIKED_SONGS {
            SourceRef::LikedSongs
        } else {
            SourceRef::Playlist(value)
        }
    }
}

impl From<SourceRef> for String {
    fn from(value: SourceRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::LikedSongs => write!(f, "{}", LIKED_SONGS),
            SourceRef::Playlist(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Move,
    Copy,
    Remove,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Move => "Move",
            Action::Copy => "Copy",
            Action::Remove => "Remove",
        }
    }

    /// Move and remove delete the entry from the source collection.
    pub fn deletes_from_source(&self) -> bool {
        matches!(self, Action::Move | Action::Remove)
    }

    pub fn adds_to_targets(&self) -> bool {
        matches!(self, Action::Move | Action::Copy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

/// One element of the source collection, classified once at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEntry {
    pub track_id: String,
    pub uri: String,
    pub is_track: bool,
    #[serde(default)]
    pub media: Option<Media>,
}

/// A playlist the user may divide into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPlaylist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub collaborative: bool,
    pub image_url: Option<String>,
}

impl From<&Playlist> for TargetPlaylist {
    fn from(p: &Playlist) -> Self {
        TargetPlaylist {
            id: p.id.clone(),
            name: p.name.clone(),
            owner_id: p.owner.id.clone(),
            collaborative: p.collaborative,
            image_url: p.thumbnail(),
        }
    }
}

/// The user's choice on the divide page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSelection {
    pub action: Action,
    pub action_playlist_ids: Vec<String>,
    pub select_all: bool,
}

/// Everything kept for one browser session between requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub logged_in: bool,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub pkce_verifier: Option<String>,
    pub source: Option<SourceRef>,
    pub target_playlist_ids: Vec<String>,
    pub target_playlists: Vec<TargetPlaylist>,
    pub tracks: Vec<TrackEntry>,
    pub cursor: Cursor,
    pub selection: TargetSelection,
    pub move_remove_enabled: bool,
    pub last_seen: u64,
}

impl SessionState {
    pub fn new(session_id: String, now: u64) -> Self {
        Self {
            session_id,
            logged_in: false,
            user_id: None,
            display_name: None,
            pkce_verifier: None,
            source: None,
            target_playlist_ids: Vec::new(),
            target_playlists: Vec::new(),
            tracks: Vec::new(),
            cursor: Cursor::Exhausted,
            selection: TargetSelection::default(),
            move_remove_enabled: true,
            last_seen: now,
        }
    }

    /// Key of the token cache belonging to this session.
    pub fn token_key(&self) -> &str {
        &self.session_id
    }

    /// Drops the loaded sequence so the next divide run starts fresh.
    pub fn reset_divide(&mut self) {
        self.tracks.clear();
        self.cursor = Cursor::Exhausted;
        self.target_playlists.clear();
    }

    pub fn is_expired(&self, now: u64, lifetime_secs: u64) -> bool {
        now.saturating_sub(self.last_seen) > lifetime_secs
    }

    pub fn current_entry(&self) -> Option<&TrackEntry> {
        match self.cursor {
            Cursor::Positioned(i) => self.tracks.get(i),
            Cursor::Exhausted => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureBar {
    pub name: String,
    pub value: i64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetView {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub checked: bool,
}

/// What the divide page shows for the track under the cursor.
#[derive(Debug, Clone, Serialize)]
pub struct TrackView {
    pub position: usize,
    pub track_count: usize,
    pub title: String,
    pub artists: String,
    pub album: String,
    pub album_type: String,
    pub track_type: String,
    pub image_url: Option<String>,
    pub uri: String,
    pub label: String,
    pub release_date: String,
    pub duration: String,
    pub genres: String,
    pub bpm: Option<f64>,
    pub key_tonal: String,
    pub key_camelot: String,
    pub features: Vec<FeatureBar>,
    pub targets: Vec<TargetView>,
    pub action: Action,
    pub select_all: bool,
    pub move_remove_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistChoice {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub checked: bool,
}

#[derive(Tabled)]
pub struct SessionTableRow {
    pub session: String,
    pub user: String,
    pub source: String,
    pub tracks: usize,
    pub position: String,
    pub last_seen: String,
}
