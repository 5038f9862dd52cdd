#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use spodivide::{
    error::{ProviderError, ProviderResult},
    spotify::SpotifyApi,
    types::{
        Album, AlbumRef, Artist, ArtistRef, AudioFeatures, Media, Page, Playlist, PlaylistItem,
        PlaylistOwner, SourceRef, TrackEntry, User,
    },
};

/// A provider call as the fake saw it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    CurrentUser,
    PlaylistsPage(Option<String>),
    Playlist(String),
    ItemsPage(String, Option<String>),
    Add(String, String),
    RemoveAt(String, String, usize),
    RemoveLiked(String),
    Album(String),
    Artist(String),
    AudioFeatures(String),
}

/// Scripted in-memory Spotify. Pages are served in order, every call is
/// recorded, and calls whose key is listed in `failing` answer with a 502.
pub struct FakeSpotify {
    pub user_id: String,
    pub item_pages: Vec<Vec<PlaylistItem>>,
    pub playlist_pages: Vec<Vec<Playlist>>,
    pub failing: Mutex<HashSet<Call>>,
    pub calls: Mutex<Vec<Call>>,
    pub genres: HashMap<String, Vec<String>>,
    pub features: Option<AudioFeatures>,
}

impl FakeSpotify {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            item_pages: Vec::new(),
            playlist_pages: Vec::new(),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            genres: HashMap::new(),
            features: None,
        }
    }

    pub fn with_items(mut self, pages: Vec<Vec<PlaylistItem>>) -> Self {
        self.item_pages = pages;
        self
    }

    pub fn with_playlists(mut self, pages: Vec<Vec<Playlist>>) -> Self {
        self.playlist_pages = pages;
        self
    }

    pub fn fail_on(&self, call: Call) {
        self.failing.lock().unwrap().insert(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the calls that change something on Spotify.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Add(..) | Call::RemoveAt(..) | Call::RemoveLiked(..)))
            .collect()
    }

    fn record(&self, call: Call) -> ProviderResult<()> {
        self.calls.lock().unwrap().push(call.clone());
        if self.failing.lock().unwrap().contains(&call) {
            return Err(ProviderError::Status {
                status: 502,
                message: format!("scripted failure of {:?}", call),
            });
        }
        Ok(())
    }

    fn page<T: Clone>(pages: &[Vec<T>], next: Option<String>) -> Page<T> {
        let index = next
            .as_deref()
            .and_then(|n| n.strip_prefix("page:"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        let items = pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < pages.len()).then(|| format!("page:{}", index + 1));
        Page {
            items,
            next,
            total: Some(pages.iter().map(Vec::len).sum::<usize>() as u64),
        }
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> ProviderResult<User> {
        self.record(Call::CurrentUser)?;
        Ok(User {
            id: self.user_id.clone(),
            display_name: Some("Tester".to_string()),
        })
    }

    async fn playlists_page(&self, next: Option<String>) -> ProviderResult<Page<Playlist>> {
        self.record(Call::PlaylistsPage(next.clone()))?;
        Ok(Self::page(&self.playlist_pages, next))
    }

    async fn playlist(&self, playlist_id: &str) -> ProviderResult<Playlist> {
        self.record(Call::Playlist(playlist_id.to_string()))?;
        self.playlist_pages
            .iter()
            .flatten()
            .find(|p| p.id == playlist_id)
            .cloned()
            .ok_or(ProviderError::Status {
                status: 404,
                message: "Not found.".to_string(),
            })
    }

    async fn items_page(
        &self,
        source: &SourceRef,
        next: Option<String>,
    ) -> ProviderResult<Page<PlaylistItem>> {
        self.record(Call::ItemsPage(source.to_string(), next.clone()))?;
        Ok(Self::page(&self.item_pages, next))
    }

    async fn add_item(&self, playlist_id: &str, uri: &str) -> ProviderResult<()> {
        self.record(Call::Add(playlist_id.to_string(), uri.to_string()))
    }

    async fn remove_item_at(
        &self,
        playlist_id: &str,
        uri: &str,
        position: usize,
    ) -> ProviderResult<()> {
        self.record(Call::RemoveAt(
            playlist_id.to_string(),
            uri.to_string(),
            position,
        ))
    }

    async fn remove_liked_item(&self, track_id: &str) -> ProviderResult<()> {
        self.record(Call::RemoveLiked(track_id.to_string()))
    }

    async fn album(&self, album_id: &str) -> ProviderResult<Album> {
        self.record(Call::Album(album_id.to_string()))?;
        Ok(Album {
            id: album_id.to_string(),
            name: format!("Album {}", album_id),
            label: Some("Test Records".to_string()),
        })
    }

    async fn artist(&self, artist_id: &str) -> ProviderResult<Artist> {
        self.record(Call::Artist(artist_id.to_string()))?;
        Ok(Artist {
            id: artist_id.to_string(),
            name: format!("Artist {}", artist_id),
            genres: self.genres.get(artist_id).cloned().unwrap_or_default(),
        })
    }

    async fn audio_features(&self, track_id: &str) -> ProviderResult<Option<AudioFeatures>> {
        self.record(Call::AudioFeatures(track_id.to_string()))?;
        Ok(self.features.clone())
    }
}

pub fn media(id: &str, media_type: &str) -> Media {
    Media {
        media_type: media_type.to_string(),
        id: Some(id.to_string()),
        uri: Some(format!("spotify:{}:{}", media_type, id)),
        name: format!("Song {}", id),
        artists: vec![ArtistRef {
            id: Some(format!("artist-{}", id)),
            name: format!("Artist {}", id),
        }],
        album: Some(AlbumRef {
            id: Some(format!("album-{}", id)),
            name: format!("Album {}", id),
            album_type: Some("album".to_string()),
            release_date: Some("2020-01-01".to_string()),
            images: Vec::new(),
        }),
        duration_ms: 215_000,
        popularity: Some(42),
    }
}

pub fn track_item(id: &str) -> PlaylistItem {
    PlaylistItem {
        added_at: None,
        is_local: false,
        track: Some(media(id, "track")),
    }
}

pub fn episode_item(id: &str) -> PlaylistItem {
    PlaylistItem {
        added_at: None,
        is_local: false,
        track: Some(media(id, "episode")),
    }
}

pub fn local_item(id: &str) -> PlaylistItem {
    PlaylistItem {
        added_at: None,
        is_local: true,
        track: Some(media(id, "track")),
    }
}

pub fn unavailable_item() -> PlaylistItem {
    PlaylistItem {
        added_at: None,
        is_local: false,
        track: None,
    }
}

pub fn playlist(id: &str, owner: &str, collaborative: bool) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: format!("Playlist {}", id),
        description: None,
        public: Some(false),
        collaborative,
        owner: PlaylistOwner {
            id: owner.to_string(),
            display_name: None,
        },
        images: None,
        snapshot_id: None,
    }
}

pub fn entry(id: &str, is_track: bool) -> TrackEntry {
    TrackEntry {
        track_id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        is_track,
        media: Some(media(id, "track")),
    }
}

/// Sequence from a pattern such as `"TxTT"`: `T` is a track, anything else
/// a non-track entry. Ids are the positions.
pub fn sequence(pattern: &str) -> Vec<TrackEntry> {
    pattern
        .chars()
        .enumerate()
        .map(|(i, c)| entry(&i.to_string(), c == 'T'))
        .collect()
}
