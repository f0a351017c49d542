//! Configuration management for the catalog ETL pipeline.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files, and end up in an explicit [`Config`] that is passed into every
//! component. Nothing in the pipeline reads process-wide state on its own.
//!
//! The lookup order for `.env` files is:
//! 1. `spotetl/.env` in the platform-specific local data directory
//! 2. `.env` in the current working directory
//!
//! Variables that are already set in the process environment win over both.

use std::{env, path::PathBuf};

use crate::{
    error::{EtlError, Result},
    utils::AlbumGroups,
};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Artists queried when neither `--artist` nor `SPOTETL_ARTISTS` is given.
pub const DEFAULT_ARTISTS: [&str; 11] = [
    "One Direction",
    "Taylor Swift",
    "Little Mix",
    "Ed Sheeran",
    "Ariana Grande",
    "Olivia Rodrigo",
    "BTS",
    "Sabrina Carpenter",
    "Billie Eilish",
    "Lauv",
    "Jeremy Zucker",
];

/// Loads environment variables from `.env` files.
///
/// Creates the `spotetl` directory in the local data directory if it does not
/// exist yet, so users have an obvious place to drop their credentials. A
/// missing `.env` file in either location is not an error.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> std::result::Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotetl/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Client credentials for the token exchange.
///
/// Both values are opaque. They are only checked for presence, right before
/// the exchange happens.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Creates credentials from an explicit client id and secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads `SPOTIFY_API_AUTH_CLIENT_ID` and `SPOTIFY_API_AUTH_CLIENT_SECRET`.
    ///
    /// Unset variables become empty strings so the missing credential is
    /// reported as an authentication failure rather than a panic.
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("SPOTIFY_API_AUTH_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("SPOTIFY_API_AUTH_CLIENT_SECRET").unwrap_or_default(),
        }
    }

    /// Checks that both credentials are present.
    ///
    /// Whitespace-only values count as missing. Whether the endpoint accepts
    /// them is only known once the token exchange runs.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Auth`] naming the environment variable of the first
    /// missing value.
    ///
    /// # Example
    ///
    /// ```
    /// let credentials = Credentials::new("client-id", "");
    /// assert!(credentials.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(EtlError::Auth(
                "missing client id (SPOTIFY_API_AUTH_CLIENT_ID)".to_string(),
            ));
        }
        if self.client_secret.trim().is_empty() {
            return Err(EtlError::Auth(
                "missing client secret (SPOTIFY_API_AUTH_CLIENT_SECRET)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-request identifier limits of the catalog endpoints.
///
/// The defaults match the limits the Spotify Web API enforces. Lower values
/// are allowed, higher ones are rejected by [`BatchLimits::validate`] because
/// the API would answer with a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// `GET /albums?ids=`
    pub albums: usize,
    /// `GET /tracks?ids=`
    pub tracks: usize,
    /// `GET /audio-features?ids=`
    pub features: usize,
    /// `GET /artists?ids=`
    pub artists: usize,
    /// page size of `GET /artists/{id}/albums`
    pub album_page: u32,
    /// page size of `GET /albums/{id}/tracks`
    pub track_page: u32,
}

impl BatchLimits {
    pub const MAX: BatchLimits = BatchLimits {
        albums: 20,
        tracks: 50,
        features: 100,
        artists: 50,
        album_page: 50,
        track_page: 50,
    };

    /// Checks every limit against the range `1..=MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Config`] for the first limit that is zero or above
    /// what the endpoint accepts.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("album batch", self.albums, Self::MAX.albums),
            ("track batch", self.tracks, Self::MAX.tracks),
            ("feature batch", self.features, Self::MAX.features),
            ("artist batch", self.artists, Self::MAX.artists),
            (
                "album page",
                self.album_page as usize,
                Self::MAX.album_page as usize,
            ),
            (
                "track page",
                self.track_page as usize,
                Self::MAX.track_page as usize,
            ),
        ];

        for (name, value, max) in checks {
            if value == 0 || value > max {
                return Err(EtlError::Config(format!(
                    "{name} size must be between 1 and {max}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self::MAX
    }
}

/// Everything a pipeline run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub api_url: String,
    pub token_url: String,
    pub artists: Vec<String>,
    pub output_dir: PathBuf,
    pub limits: BatchLimits,
    pub album_groups: AlbumGroups,
    /// Fail instead of warning on unmatched artists and short enrichment batches.
    pub strict: bool,
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            artists: DEFAULT_ARTISTS.iter().map(|a| a.to_string()).collect(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            limits: BatchLimits::default(),
            album_groups: AlbumGroups::default(),
            strict: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Config {
    /// Builds a configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `SPOTIFY_API_AUTH_CLIENT_ID` | empty |
    /// | `SPOTIFY_API_AUTH_CLIENT_SECRET` | empty |
    /// | `SPOTIFY_API_URL` | `https://api.spotify.com/v1` |
    /// | `SPOTIFY_API_TOKEN_URL` | `https://accounts.spotify.com/api/token` |
    /// | `SPOTETL_ARTISTS` | built-in list |
    /// | `SPOTETL_OUTPUT_DIR` | `data` |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            credentials: Credentials::from_env(),
            api_url: env::var("SPOTIFY_API_URL").unwrap_or(defaults.api_url),
            token_url: env::var("SPOTIFY_API_TOKEN_URL").unwrap_or(defaults.token_url),
            artists: env::var("SPOTETL_ARTISTS")
                .map(|list| parse_artist_list(&list))
                .unwrap_or(defaults.artists),
            output_dir: env::var("SPOTETL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            ..defaults
        }
    }

    /// Replaces the artist list, keeping every other setting.
    ///
    /// # Arguments
    ///
    /// * `artists` - artist names in query order; an empty iterator yields a
    ///   run without artists
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::default().with_artists(["Lauv", "BTS"]);
    /// assert_eq!(config.artists, vec!["Lauv", "BTS"]);
    /// ```
    pub fn with_artists<I, S>(mut self, artists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artists = artists.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the configuration before any request is made.
    ///
    /// Credentials are not checked here; they are validated right before the
    /// token exchange so a run without artists never needs them.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Config`] when no album group is selected, an artist
    /// name is blank, or a batch limit is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.album_groups.is_empty() {
            return Err(EtlError::Config(
                "at least one album group is required".to_string(),
            ));
        }
        if let Some(blank) = self.artists.iter().position(|a| a.trim().is_empty()) {
            return Err(EtlError::Config(format!(
                "artist name at position {} is empty",
                blank + 1
            )));
        }
        self.limits.validate()
    }
}

/// Splits a comma separated artist list, dropping blank entries.
///
/// An empty string yields an empty list, which runs the pipeline without
/// artists and produces header-only files.
pub fn parse_artist_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
