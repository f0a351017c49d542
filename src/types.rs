use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// One page of an offset-paginated endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Paging<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next: None,
            total: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: Paging<ArtistRef>,
}

/// An artist name together with the catalog id it resolved to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistQuery {
    pub name: String,
    pub artist_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralAlbumsResponse {
    #[serde(default)]
    pub albums: Vec<Option<FullAlbum>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAlbum {
    pub id: String,
    pub name: Option<String>,
    pub uri: Option<String>,
    pub album_type: Option<String>,
    pub release_date: Option<String>,
    pub popularity: Option<u32>,
    pub label: Option<String>,
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub tracks: Option<Paging<SimplifiedTrack>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    pub uri: Option<String>,
    pub duration_ms: Option<u64>,
    pub explicit: Option<bool>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralTracksResponse {
    #[serde(default)]
    pub tracks: Vec<Option<FullTrack>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullTrack {
    pub id: String,
    pub name: Option<String>,
    pub popularity: Option<u32>,
    pub explicit: Option<bool>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub key: Option<i32>,
    pub loudness: Option<f64>,
    pub mode: Option<i32>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub duration_ms: Option<u64>,
    pub time_signature: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralArtistsResponse {
    #[serde(default)]
    pub artists: Vec<Option<FullArtist>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullArtist {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
    pub followers: Option<Followers>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followers {
    pub total: Option<u64>,
}

/// A track flattened together with the album it was listed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumTrackRow {
    pub track_id: Option<String>,
    pub track_name: Option<String>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    pub duration_ms: Option<u64>,
    pub explicit: Option<bool>,
    pub track_uri: Option<String>,
    pub album_id: String,
    pub album_uri: Option<String>,
    pub album_name: Option<String>,
    pub album_type: Option<String>,
    pub release_date: Option<String>,
    pub album_popularity: Option<u32>,
    pub label: Option<String>,
    pub total_tracks: Option<u32>,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
}

/// A deduplicated track row, written to `albums.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub track_id: String,
    pub track_name: Option<String>,
    pub duration_ms: Option<u64>,
    pub explicit: Option<bool>,
    pub album_id: String,
    pub album_name: Option<String>,
    pub release_date: Option<String>,
    pub album_popularity: Option<u32>,
    pub label: Option<String>,
    pub artist_id: Option<String>,
}

/// Audio descriptors of one track, written to `features.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub track_id: String,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub key: Option<i32>,
    pub loudness: Option<f64>,
    pub mode: Option<i32>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub duration_ms: Option<u64>,
    pub time_signature: Option<i32>,
}

impl From<AudioFeatures> for FeatureRow {
    fn from(f: AudioFeatures) -> Self {
        FeatureRow {
            track_id: f.id,
            danceability: f.danceability,
            energy: f.energy,
            key: f.key,
            loudness: f.loudness,
            mode: f.mode,
            speechiness: f.speechiness,
            acousticness: f.acousticness,
            instrumentalness: f.instrumentalness,
            liveness: f.liveness,
            valence: f.valence,
            tempo: f.tempo,
            duration_ms: f.duration_ms,
            time_signature: f.time_signature,
        }
    }
}

/// Album-independent track metadata, written to `tracks.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRow {
    pub track_id: String,
    pub track_name: Option<String>,
    pub track_popularity: Option<u32>,
    pub explicit: Option<bool>,
    pub duration_ms: Option<u64>,
}

impl From<FullTrack> for TrackRow {
    fn from(t: FullTrack) -> Self {
        TrackRow {
            track_id: t.id,
            track_name: t.name,
            track_popularity: t.popularity,
            explicit: t.explicit,
            duration_ms: t.duration_ms,
        }
    }
}

/// Artist metadata, written to `artists.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRow {
    pub artist_id: String,
    pub artist_name: Option<String>,
    pub artist_genres: String,
    pub artist_popularity: Option<u32>,
    pub followers: Option<u64>,
}

impl From<FullArtist> for ArtistRow {
    fn from(a: FullArtist) -> Self {
        ArtistRow {
            artist_genres: crate::utils::join_genres(&a.genres),
            artist_id: a.id,
            artist_name: a.name,
            artist_popularity: a.popularity,
            followers: a.followers.and_then(|f| f.total),
        }
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct OutputTableRow {
    pub file: String,
    pub rows: usize,
}
