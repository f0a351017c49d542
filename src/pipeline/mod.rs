//! # Pipeline Module
//!
//! The ETL stages, run strictly one after the other:
//!
//! ```text
//! artist names
//!     ↓ resolver    search, then page through each artist's albums
//! album ids
//!     ↓ hydrator    batch album lookups, one row per track
//! album/track rows
//!     ↓ normalizer  dedup on track id, fixed column allow-list
//! normalized rows ──→ enricher: features, track details, artists
//!     ↓
//! Tables (albums, features, tracks, artists)
//! ```
//!
//! Every stage takes the catalog as `&dyn CatalogApi` and its settings from
//! the [`Config`]. Writing the tables is left to
//! [`crate::management::CsvSink`].

use std::fmt;

use crate::{
    config::Config,
    error::Result,
    spotify::CatalogApi,
    types::{ArtistRow, FeatureRow, NormalizedRow, TrackRow},
};

pub mod enricher;
pub mod hydrator;
pub mod normalizer;
pub mod resolver;

/// The stage a run is currently in, reported through [`Pipeline::run_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingArtists,
    CollectingAlbums,
    HydratingAlbums,
    Normalizing,
    FetchingFeatures,
    FetchingTracks,
    FetchingArtists,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::ResolvingArtists => "Resolving artists...",
            Stage::CollectingAlbums => "Collecting album ids...",
            Stage::HydratingAlbums => "Fetching albums and tracks...",
            Stage::Normalizing => "Removing duplicate tracks...",
            Stage::FetchingFeatures => "Fetching audio features...",
            Stage::FetchingTracks => "Fetching track details...",
            Stage::FetchingArtists => "Fetching artist details...",
        };
        f.write_str(s)
    }
}

/// The four output tables of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub albums: Vec<NormalizedRow>,
    pub features: Vec<FeatureRow>,
    pub tracks: Vec<TrackRow>,
    pub artists: Vec<ArtistRow>,
}

/// One configured ETL run against a catalog.
///
/// # Example
///
/// ```
/// let client = SpotifyClient::new(&config, token);
/// let tables = Pipeline::new(&client, &config).run().await?;
/// CsvSink::new(&config.output_dir).persist(&tables).await?;
/// ```
pub struct Pipeline<'a> {
    api: &'a dyn CatalogApi,
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(api: &'a dyn CatalogApi, config: &'a Config) -> Self {
        Self { api, config }
    }

    /// Runs every stage without progress reporting.
    pub async fn run(&self) -> Result<Tables> {
        self.run_with(|_| {}).await
    }

    /// Runs every stage and calls `report` when a stage starts.
    ///
    /// Stages run strictly in order and the first error ends the run; nothing
    /// is written by the pipeline itself.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage, see the stage modules for which
    /// errors each one produces.
    pub async fn run_with<F>(&self, mut report: F) -> Result<Tables>
    where
        F: FnMut(Stage),
    {
        let (api, config) = (self.api, self.config);

        report(Stage::ResolvingArtists);
        let artists = resolver::resolve_artists(api, &config.artists, config.strict).await?;

        report(Stage::CollectingAlbums);
        let album_ids = resolver::collect_album_ids(api, &artists, config).await?;

        report(Stage::HydratingAlbums);
        let rows = hydrator::hydrate(api, &album_ids, config).await?;

        report(Stage::Normalizing);
        let albums = normalizer::normalize(&rows);
        let track_ids = normalizer::track_ids(&albums);
        let artist_ids = normalizer::artist_ids(&albums);

        report(Stage::FetchingFeatures);
        let features = enricher::features(api, &track_ids, config).await?;

        report(Stage::FetchingTracks);
        let tracks = enricher::track_details(api, &track_ids, config).await?;

        report(Stage::FetchingArtists);
        let artists = enricher::artists(api, &artist_ids, config).await?;

        Ok(Tables {
            albums,
            features,
            tracks,
            artists,
        })
    }
}
