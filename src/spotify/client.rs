use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::{ProviderError, ProviderResult},
    info,
    spotify::SpotifyApi,
    types::{
        AddItemsRequest, Album, Artist, AudioFeatures, AudioFeaturesResponse, Page, Playlist,
        PlaylistItem, RemoveItem, RemoveItemsRequest, RemoveLikedRequest, SnapshotResponse,
        SourceRef, User,
    },
    warning,
};

const PLAYLIST_PAGE_LIMIT: u32 = 50;
const PLAYLIST_ITEMS_PAGE_LIMIT: u32 = 100;
const SAVED_TRACKS_PAGE_LIMIT: u32 = 50;

/// Spotify Web API client acting on behalf of one logged-in user.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, access_token: String) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> ProviderResult<Response> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        check_status(response).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ProviderResult<T> {
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Maps non-success responses onto [`ProviderError`].
async fn check_status(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(ProviderError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0);
            warning!("Spotify rate limit hit, retry after {} seconds.", retry_after);
            Err(ProviderError::RateLimited { retry_after })
        }
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> ProviderResult<User> {
        self.get(&self.url("/me")).await
    }

    async fn playlists_page(&self, next: Option<String>) -> ProviderResult<Page<Playlist>> {
        let url = next.unwrap_or_else(|| {
            self.url(&format!("/me/playlists?limit={}", PLAYLIST_PAGE_LIMIT))
        });
        self.get(&url).await
    }

    async fn playlist(&self, playlist_id: &str) -> ProviderResult<Playlist> {
        self.get(&self.url(&format!(
            "/playlists/{id}?fields=id,name,description,public,collaborative,owner,images,snapshot_id",
            id = playlist_id
        )))
        .await
    }

    async fn items_page(
        &self,
        source: &SourceRef,
        next: Option<String>,
    ) -> ProviderResult<Page<PlaylistItem>> {
        let url = match (next, source) {
            (Some(next), _) => next,
            (None, SourceRef::LikedSongs) => {
                self.url(&format!("/me/tracks?limit={}", SAVED_TRACKS_PAGE_LIMIT))
            }
            // episodes only report type "episode" when explicitly requested
            (None, SourceRef::Playlist(id)) => self.url(&format!(
                "/playlists/{id}/tracks?limit={limit}&additional_types=track,episode",
                id = id,
                limit = PLAYLIST_ITEMS_PAGE_LIMIT
            )),
        };
        self.get(&url).await
    }

    async fn add_item(&self, playlist_id: &str, uri: &str) -> ProviderResult<()> {
        let body = AddItemsRequest {
            uris: vec![uri.to_string()],
        };
        let response = self
            .send(
                self.http
                    .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
                    .json(&body),
            )
            .await?;
        let snapshot = response.json::<SnapshotResponse>().await?;
        info!(
            "Added {} to playlist {} (snapshot {}).",
            uri, playlist_id, snapshot.snapshot_id
        );
        Ok(())
    }

    async fn remove_item_at(
        &self,
        playlist_id: &str,
        uri: &str,
        position: usize,
    ) -> ProviderResult<()> {
        let body = RemoveItemsRequest {
            tracks: vec![RemoveItem {
                uri: uri.to_string(),
                positions: vec![position],
            }],
        };
        self.send(
            self.http
                .delete(self.url(&format!("/playlists/{}/tracks", playlist_id)))
                .json(&body),
        )
        .await?;
        info!(
            "Removed {} at position {} from playlist {}.",
            uri, position, playlist_id
        );
        Ok(())
    }

    async fn remove_liked_item(&self, track_id: &str) -> ProviderResult<()> {
        let body = RemoveLikedRequest {
            ids: vec![track_id.to_string()],
        };
        self.send(self.http.delete(self.url("/me/tracks")).json(&body))
            .await?;
        info!("Removed {} from Liked Songs.", track_id);
        Ok(())
    }

    async fn album(&self, album_id: &str) -> ProviderResult<Album> {
        self.get(&self.url(&format!("/albums/{}", album_id))).await
    }

    async fn artist(&self, artist_id: &str) -> ProviderResult<Artist> {
        self.get(&self.url(&format!("/artists/{}", artist_id))).await
    }

    async fn audio_features(&self, track_id: &str) -> ProviderResult<Option<AudioFeatures>> {
        let response: AudioFeaturesResponse = self
            .get(&self.url(&format!("/audio-features?ids={}", track_id)))
            .await?;
        Ok(response.audio_features.into_iter().next().flatten())
    }
}
