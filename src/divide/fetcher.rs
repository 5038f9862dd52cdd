use std::future::Future;

use crate::{
    error::ProviderResult,
    spotify::SpotifyApi,
    types::{Page, Playlist, PlaylistItem, SourceRef},
};

/// Walks a paginated listing from its head, following the continuation URL
/// until a page reports none, and concatenates the items in page order.
///
/// Any failed page aborts the walk; no local retry is attempted.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> ProviderResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut next: Option<String> = None;

    loop {
        let page = fetch_page(next.take()).await?;
        items.extend(page.items);

        match page.next {
            Some(url) => next = Some(url),
            None => break,
        }
    }

    Ok(items)
}

/// Every item of `source`. An empty vector is a valid result.
pub async fn fetch_all<P>(provider: &P, source: &SourceRef) -> ProviderResult<Vec<PlaylistItem>>
where
    P: SpotifyApi + ?Sized,
{
    collect_pages(move |next| provider.items_page(source, next)).await
}

/// Every playlist of the current user.
pub async fn fetch_all_playlists<P>(provider: &P) -> ProviderResult<Vec<Playlist>>
where
    P: SpotifyApi + ?Sized,
{
    collect_pages(move |next| provider.playlists_page(next)).await
}
