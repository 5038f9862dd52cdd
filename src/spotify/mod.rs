//! # Spotify Integration Module
//!
//! This module is the boundary between spodivide and the Spotify Web API.
//! Everything the divide workflow needs from the platform is expressed by
//! the [`SpotifyApi`] trait; [`SpotifyClient`] implements it over HTTP with
//! `reqwest`, and tests substitute an in-memory fake.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! Divide workflow (divide)
//!          ↓
//! SpotifyApi trait
//!     ├── SpotifyClient (reqwest, JSON)
//!     └── test fakes
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth 2.0 authorization code flow with PKCE: authorize URL,
//!   code exchange and token refresh
//! - [`client`] - The HTTP implementation of [`SpotifyApi`]
//!
//! ## Pagination
//!
//! Listings are exposed page by page. Each page carries the URL of the next
//! page; callers pass it back in to continue and stop when it is absent.
//! The walk itself lives in [`crate::divide::fetcher`].
//!
//! ## Error Handling
//!
//! Every call returns a [`ProviderError`]. There is no retry layer: a failed
//! call surfaces immediately so a half-applied move is never repeated behind
//! the user's back.
//!
//! ## API Coverage
//!
//! - `GET /me` - Current user
//! - `GET /me/playlists` - User's playlists
//! - `GET /playlists/{id}` - Playlist metadata and ownership
//! - `GET /playlists/{id}/tracks` - Playlist items
//! - `GET /me/tracks` - Liked Songs
//! - `POST /playlists/{id}/tracks` - Add an item
//! - `DELETE /playlists/{id}/tracks` - Remove an item at a position
//! - `DELETE /me/tracks` - Remove a liked track
//! - `GET /albums/{id}`, `GET /artists/{id}`, `GET /audio-features` - Track
//!   view metadata

pub mod auth;
pub mod client;

use async_trait::async_trait;

use crate::{
    error::ProviderResult,
    types::{Album, Artist, AudioFeatures, Page, Playlist, PlaylistItem, SourceRef, User},
};

pub use client::SpotifyClient;

/// Operations spodivide consumes from the streaming platform.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// The profile of the user the access token belongs to.
    async fn current_user(&self) -> ProviderResult<User>;

    /// A page of the current user's playlists. `next` is the continuation
    /// URL of the previous page, `None` for the first page.
    async fn playlists_page(&self, next: Option<String>) -> ProviderResult<Page<Playlist>>;

    /// Metadata of one playlist, including its owner and collaborative
    /// flag.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Status`](crate::error::ProviderError::Status) with 404
    /// when the playlist does not exist or is not visible to the user.
    async fn playlist(&self, playlist_id: &str) -> ProviderResult<Playlist>;

    /// A page of items of `source`, in the provider's order.
    async fn items_page(
        &self,
        source: &SourceRef,
        next: Option<String>,
    ) -> ProviderResult<Page<PlaylistItem>>;

    /// Appends `uri` to the end of a playlist.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - The target playlist
    /// * `uri` - Spotify URI of the track, e.g. `spotify:track:<id>`
    async fn add_item(&self, playlist_id: &str, uri: &str) -> ProviderResult<()>;

    /// Removes the single occurrence of `uri` at `position`.
    async fn remove_item_at(&self, playlist_id: &str, uri: &str, position: usize)
    -> ProviderResult<()>;

    /// Removes a track from the user's Liked Songs.
    async fn remove_liked_item(&self, track_id: &str) -> ProviderResult<()>;

    /// Full album object, used for the record label.
    async fn album(&self, album_id: &str) -> ProviderResult<Album>;

    /// Full artist object, used for the genre list.
    async fn artist(&self, artist_id: &str) -> ProviderResult<Artist>;

    /// Audio features of a track; `None` when Spotify has none.
    async fn audio_features(&self, track_id: &str) -> ProviderResult<Option<AudioFeatures>>;
}
