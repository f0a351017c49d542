#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use spotetl::{
    error::Result,
    spotify::CatalogApi,
    types::{
        AlbumRef, ArtistRef, AudioFeatures, Followers, FullAlbum, FullArtist, FullTrack, Paging,
        SimplifiedTrack,
    },
    utils::AlbumGroups,
};

/// In-memory catalog serving canned responses and recording every call.
#[derive(Default)]
pub struct FakeCatalog {
    artists_by_name: HashMap<String, String>,
    albums_by_artist: HashMap<String, Vec<String>>,
    albums: HashMap<String, FullAlbum>,
    extra_tracks: HashMap<String, Vec<SimplifiedTrack>>,
    features: HashMap<String, AudioFeatures>,
    tracks: HashMap<String, FullTrack>,
    artist_details: HashMap<String, FullArtist>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an artist, its detail record and the ids of its albums.
    pub fn with_artist(mut self, name: &str, id: &str, album_ids: &[&str]) -> Self {
        self.artists_by_name.insert(name.to_string(), id.to_string());
        self.albums_by_artist
            .insert(id.to_string(), album_ids.iter().map(|a| a.to_string()).collect());
        self.artist_details.insert(id.to_string(), artist(id, name));
        self
    }

    /// Registers an album plus feature and track records for each of its tracks.
    pub fn with_album(mut self, album: FullAlbum) -> Self {
        for track in album.tracks.iter().flat_map(|p| p.items.iter()) {
            if let Some(id) = &track.id {
                self.features.insert(id.clone(), features(id));
                self.tracks.insert(id.clone(), full_track(id));
            }
        }
        self.albums.insert(album.id.clone(), album);
        self
    }

    /// Tracks served by the album tracks endpoint after the embedded page.
    pub fn with_extra_tracks(mut self, album_id: &str, track_ids: &[&str]) -> Self {
        let tracks: Vec<SimplifiedTrack> = track_ids.iter().map(|id| track(id)).collect();
        for id in track_ids {
            self.features.insert(id.to_string(), features(id));
            self.tracks.insert(id.to_string(), full_track(id));
        }
        self.extra_tracks.insert(album_id.to_string(), tracks);
        self
    }

    pub fn without_features(mut self, track_id: &str) -> Self {
        self.features.remove(track_id);
        self
    }

    pub fn without_artist_detail(mut self, artist_id: &str) -> Self {
        self.artist_details.remove(artist_id);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(&format!("{endpoint}:")))
            .collect()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

fn page<T: Clone>(items: &[T], offset: u32, limit: u32) -> Paging<T> {
    let start = (offset as usize).min(items.len());
    let end = (start + limit as usize).min(items.len());
    Paging {
        items: items[start..end].to_vec(),
        next: (end < items.len()).then(|| format!("offset={end}")),
        total: Some(items.len() as u64),
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn resolve_artist(&self, name: &str) -> Result<Option<ArtistRef>> {
        self.record(format!("search:{name}"));
        Ok(self.artists_by_name.get(name).map(|id| ArtistRef {
            id: id.clone(),
            name: Some(name.to_string()),
        }))
    }

    async fn artist_albums(
        &self,
        artist_id: &str,
        _groups: &AlbumGroups,
        offset: u32,
        limit: u32,
    ) -> Result<Paging<AlbumRef>> {
        self.record(format!("artist_albums:{artist_id}:{offset}"));
        let refs: Vec<AlbumRef> = self
            .albums_by_artist
            .get(artist_id)
            .map(|ids| {
                ids.iter()
                    .map(|id| AlbumRef {
                        id: id.clone(),
                        name: None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(page(&refs, offset, limit))
    }

    async fn fetch_albums(&self, ids: &[String]) -> Result<Vec<Option<FullAlbum>>> {
        self.record(format!("albums:{}", ids.len()));
        Ok(ids.iter().map(|id| self.albums.get(id).cloned()).collect())
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Paging<SimplifiedTrack>> {
        self.record(format!("album_tracks:{album_id}:{offset}"));
        let embedded = self
            .albums
            .get(album_id)
            .and_then(|a| a.tracks.as_ref())
            .map(|p| p.items.clone())
            .unwrap_or_default();
        let mut all = embedded;
        all.extend(self.extra_tracks.get(album_id).cloned().unwrap_or_default());
        Ok(page(&all, offset, limit))
    }

    async fn fetch_tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>> {
        self.record(format!("tracks:{}", ids.len()));
        Ok(ids.iter().map(|id| self.tracks.get(id).cloned()).collect())
    }

    async fn fetch_features(&self, ids: &[String]) -> Result<Vec<Option<AudioFeatures>>> {
        self.record(format!("features:{}", ids.len()));
        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }

    async fn fetch_artists(&self, ids: &[String]) -> Result<Vec<Option<FullArtist>>> {
        self.record(format!("artists:{}", ids.len()));
        Ok(ids
            .iter()
            .map(|id| self.artist_details.get(id).cloned())
            .collect())
    }
}

pub fn track(id: &str) -> SimplifiedTrack {
    SimplifiedTrack {
        id: Some(id.to_string()),
        name: Some(format!("Song {id}")),
        uri: Some(format!("spotify:track:{id}")),
        duration_ms: Some(180_000),
        explicit: Some(false),
        track_number: Some(1),
        disc_number: Some(1),
    }
}

pub fn album(id: &str, artist_id: &str, track_ids: &[&str]) -> FullAlbum {
    FullAlbum {
        id: id.to_string(),
        name: Some(format!("Album {id}")),
        uri: Some(format!("spotify:album:{id}")),
        album_type: Some("album".to_string()),
        release_date: Some("2020-01-01".to_string()),
        popularity: Some(50),
        label: Some("Label".to_string()),
        total_tracks: Some(track_ids.len() as u32),
        artists: vec![ArtistRef {
            id: artist_id.to_string(),
            name: Some(format!("Artist {artist_id}")),
        }],
        tracks: Some(Paging::last(track_ids.iter().map(|t| track(t)).collect())),
    }
}

pub fn features(id: &str) -> AudioFeatures {
    AudioFeatures {
        id: id.to_string(),
        danceability: Some(0.5),
        energy: Some(0.7),
        tempo: Some(120.0),
        valence: Some(0.3),
        ..AudioFeatures::default()
    }
}

pub fn full_track(id: &str) -> FullTrack {
    FullTrack {
        id: id.to_string(),
        name: Some(format!("Song {id}")),
        popularity: Some(60),
        explicit: Some(false),
        duration_ms: Some(180_000),
    }
}

pub fn artist(id: &str, name: &str) -> FullArtist {
    FullArtist {
        id: id.to_string(),
        name: Some(name.to_string()),
        genres: vec!["pop".to_string(), "dance pop".to_string()],
        popularity: Some(80),
        followers: Some(Followers {
            total: Some(1_000),
        }),
    }
}
