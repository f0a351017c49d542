//! # Spotify Integration Module
//!
//! This module is the only place that talks HTTP. Everything above it sees the
//! catalog through the [`CatalogApi`] trait, which the pipeline stages take as
//! `&dyn CatalogApi` so tests can hand in a fake that serves canned responses.
//!
//! ## Architecture
//!
//! ```text
//! Pipeline (resolver, hydrator, enrichers)
//!          ↓
//!     CatalogApi trait
//!          ↓
//! SpotifyClient
//!     ├── auth     (client-credentials token exchange)
//!     ├── artists  (search, artist albums, several artists)
//!     ├── albums   (several albums, album tracks)
//!     └── tracks   (several tracks, audio features)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client-credentials grant
//! - `GET /search?type=artist` - artist lookup by name
//! - `GET /artists/{id}/albums` - paginated discography
//! - `GET /albums?ids=` - up to 20 full albums with embedded tracks
//! - `GET /albums/{id}/tracks` - remaining tracks of long albums
//! - `GET /tracks?ids=` - up to 50 tracks
//! - `GET /audio-features?ids=` - up to 100 feature vectors
//! - `GET /artists?ids=` - up to 50 artists
//!
//! ## Error Handling
//!
//! Requests are not retried except for two transient cases: a `429 Too Many
//! Requests` with a `Retry-After` of at most two minutes is waited out, and a
//! `502 Bad Gateway` is retried after ten seconds. Both are bounded by
//! `max_retries`. Every other failure becomes an
//! [`EtlError::RemoteFetch`](crate::error::EtlError::RemoteFetch) that ends
//! the run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::Config,
    error::{EtlError, Result},
    types::{
        AlbumRef, ArtistRef, AudioFeatures, FullAlbum, FullArtist, FullTrack, Paging,
        SimplifiedTrack, Token,
    },
    utils::AlbumGroups,
    warning,
};

pub mod albums;
pub mod artists;
pub mod auth;
pub mod tracks;

const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

/// Read access to the music catalog.
///
/// Batch methods return one entry per requested id in request order, with
/// `None` for ids the catalog could not resolve.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Top search match for an artist name, if any.
    async fn resolve_artist(&self, name: &str) -> Result<Option<ArtistRef>>;

    async fn artist_albums(
        &self,
        artist_id: &str,
        groups: &AlbumGroups,
        offset: u32,
        limit: u32,
    ) -> Result<Paging<AlbumRef>>;

    async fn fetch_albums(&self, ids: &[String]) -> Result<Vec<Option<FullAlbum>>>;

    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Paging<SimplifiedTrack>>;

    async fn fetch_tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>>;

    async fn fetch_features(&self, ids: &[String]) -> Result<Vec<Option<AudioFeatures>>>;

    async fn fetch_artists(&self, ids: &[String]) -> Result<Vec<Option<FullArtist>>>;
}

/// HTTP client for the Spotify Web API bound to one bearer token.
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    token: Token,
    max_retries: u32,
}

impl SpotifyClient {
    pub fn new(config: &Config, token: Token) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            max_retries: config.max_retries,
        }
    }

    /// Issues a `GET` against `path` (relative to the API base URL) and
    /// decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        let endpoint = path.split('?').next().unwrap_or(path).to_string();
        let mut attempts = 0;

        loop {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token.access_token)
                .send()
                .await
                .map_err(|e| EtlError::remote(&endpoint, None, e))?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS && attempts < self.max_retries {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                if retry_after <= MAX_RETRY_AFTER_SECS {
                    attempts += 1;
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                warning!(
                    "Retry after has reached an abnormal high of {} seconds for {}",
                    retry_after,
                    endpoint
                );
            }

            if status == StatusCode::BAD_GATEWAY && attempts < self.max_retries {
                attempts += 1;
                sleep(BAD_GATEWAY_DELAY).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let mut message = if body.is_empty() {
                    status.to_string()
                } else {
                    body
                };
                if status == StatusCode::UNAUTHORIZED && self.token.is_expired() {
                    message.push_str(" (access token has expired, rerun to fetch a new one)");
                }
                return Err(EtlError::remote(endpoint, Some(status.as_u16()), message));
            }

            return response
                .json::<T>()
                .await
                .map_err(|e| EtlError::remote(endpoint, Some(status.as_u16()), e));
        }
    }
}

#[async_trait]
impl CatalogApi for SpotifyClient {
    async fn resolve_artist(&self, name: &str) -> Result<Option<ArtistRef>> {
        self.search_artist(name).await
    }

    async fn artist_albums(
        &self,
        artist_id: &str,
        groups: &AlbumGroups,
        offset: u32,
        limit: u32,
    ) -> Result<Paging<AlbumRef>> {
        self.get_artist_albums(artist_id, groups, offset, limit)
            .await
    }

    async fn fetch_albums(&self, ids: &[String]) -> Result<Vec<Option<FullAlbum>>> {
        self.get_several_albums(ids).await
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Paging<SimplifiedTrack>> {
        self.get_album_tracks(album_id, offset, limit).await
    }

    async fn fetch_tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>> {
        self.get_several_tracks(ids).await
    }

    async fn fetch_features(&self, ids: &[String]) -> Result<Vec<Option<AudioFeatures>>> {
        self.get_audio_features(ids).await
    }

    async fn fetch_artists(&self, ids: &[String]) -> Result<Vec<Option<FullArtist>>> {
        self.get_several_artists(ids).await
    }
}

/// Joins ids into the `ids=` query value.
pub(crate) fn ids_param(ids: &[String]) -> String {
    urlencoding::encode(&ids.join(",")).into_owned()
}
